//! Adam optimizer with optional decoupled weight decay

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// Adam optimizer
///
/// With `weight_decay > 0` the decay is applied directly to the parameters
/// (AdamW): θ_t = (1 - lr * λ) * θ_{t-1} - lr_t * m_t / (√v_t + ε)
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    weight_decay: f32,
    t: u64,
    m: Vec<Option<Array1<f32>>>, // First moment
    v: Vec<Option<Array1<f32>>>, // Second moment
}

impl Adam {
    /// Create a new Adam optimizer
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self { lr, beta1, beta2, epsilon, weight_decay: 0.0, t: 0, m: Vec::new(), v: Vec::new() }
    }

    /// Adam with the usual defaults (β1 = 0.9, β2 = 0.999)
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8)
    }

    /// Enable decoupled weight decay
    #[must_use]
    pub fn with_weight_decay(mut self, weight_decay: f32) -> Self {
        self.weight_decay = weight_decay;
        self
    }

    /// Number of steps taken
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.t
    }

    #[must_use]
    pub fn beta1(&self) -> f32 {
        self.beta1
    }

    #[must_use]
    pub fn beta2(&self) -> f32 {
        self.beta2
    }
}

impl Optimizer for Adam {
    fn step_refs(&mut self, params: &mut [&mut Tensor]) {
        if self.m.len() < params.len() {
            self.m.resize(params.len(), None);
            self.v.resize(params.len(), None);
        }
        self.t += 1;

        // Bias correction folded into the step size
        let lr_t = self.lr
            * ((1.0 - self.beta2.powi(self.t as i32)).sqrt()
                / (1.0 - self.beta1.powi(self.t as i32)));

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad() else {
                continue;
            };

            // m_t = β1 * m_{t-1} + (1 - β1) * g
            let m_t = match &self.m[i] {
                Some(m) => m * self.beta1 + &grad * (1.0 - self.beta1),
                None => &grad * (1.0 - self.beta1),
            };

            // v_t = β2 * v_{t-1} + (1 - β2) * g²
            let grad_sq = &grad * &grad;
            let v_t = match &self.v[i] {
                Some(v) => v * self.beta2 + &grad_sq * (1.0 - self.beta2),
                None => &grad_sq * (1.0 - self.beta2),
            };

            let adaptive_update = &m_t / &(v_t.mapv(f32::sqrt) + self.epsilon) * lr_t;
            let decay = 1.0 - self.lr * self.weight_decay;
            let updated = param.data() * decay - &adaptive_update;
            *param.data_mut() = updated;

            self.m[i] = Some(m_t);
            self.v[i] = Some(v_t);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn name(&self) -> &'static str {
        if self.weight_decay > 0.0 {
            "adamw"
        } else {
            "adam"
        }
    }
}
