//! Activation function autograd operations: relu, leaky_relu, sigmoid, tanh

use super::{pointwise, record, tracks_grad};
use crate::autograd::{BackwardOp, GradCell, Tensor};

/// ReLU activation
pub fn relu(a: &Tensor) -> Tensor {
    pointwise(a, |x| x.max(0.0), |x, _| if x > 0.0 { 1.0 } else { 0.0 })
}

/// Leaky ReLU with a configurable negative slope
pub fn leaky_relu(a: &Tensor, slope: f32) -> Tensor {
    let data = a.data().mapv(|x| if x > 0.0 { x } else { slope * x });
    let mut result = Tensor::new(data, tracks_grad(&[a]));
    if result.requires_grad() {
        let op = LeakyReluBackward { a: a.clone(), slope, result_grad: result.grad_cell() };
        record(&mut result, op);
    }
    result
}

struct LeakyReluBackward {
    a: Tensor,
    slope: f32,
    result_grad: GradCell,
}

impl BackwardOp for LeakyReluBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                let mask = leaky_relu_mask(self.a.data().as_slice().unwrap_or(&[]), self.slope);
                self.a.accumulate_grad(grad * &ndarray::Array1::from(mask));
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

/// Local derivative of leaky ReLU at each pre-activation value
pub fn leaky_relu_mask(pre_activation: &[f32], slope: f32) -> Vec<f32> {
    pre_activation.iter().map(|&x| if x > 0.0 { 1.0 } else { slope }).collect()
}

/// Numerically stable logistic sigmoid
pub fn stable_sigmoid(v: f32) -> f32 {
    if v >= 0.0 {
        1.0 / (1.0 + (-v).exp())
    } else {
        let exp_v = v.exp();
        exp_v / (1.0 + exp_v)
    }
}

/// Sigmoid activation
pub fn sigmoid(a: &Tensor) -> Tensor {
    pointwise(a, stable_sigmoid, |_, y| y * (1.0 - y))
}

/// Hyperbolic tangent
pub fn tanh(a: &Tensor) -> Tensor {
    pointwise(a, f32::tanh, |_, y| 1.0 - y * y)
}
