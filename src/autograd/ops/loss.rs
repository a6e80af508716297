//! Binary cross-entropy with logits against a constant target
//!
//! Numerically stable computation:
//! ```text
//! L_i = max(x_i, 0) - x_i * t + log(1 + exp(-|x_i|))
//! L = mean(L_i)
//! ```
//!
//! Gradient: `∂L/∂x_i = (σ(x_i) - t) / N`

use super::activations::stable_sigmoid;
use super::{record, tracks_grad};
use crate::autograd::{BackwardOp, GradCell, Tensor};
use ndarray::Array1;

fn stable_bce(logit: f32, target: f32) -> f32 {
    logit.max(0.0) - logit * target + (1.0 + (-logit.abs()).exp()).ln()
}

/// Mean binary cross-entropy of `logits` against a single target value
pub fn bce_with_logits(logits: &Tensor, target: f32) -> Tensor {
    assert!(!logits.is_empty(), "bce_with_logits: empty logits");
    let n = logits.len() as f32;
    let total: f32 = logits.data().iter().map(|&x| stable_bce(x, target)).sum();

    let mut loss = Tensor::from_vec(vec![total / n], tracks_grad(&[logits]));
    if loss.requires_grad() {
        let op = BceBackward { logits: logits.clone(), target, result_grad: loss.grad_cell() };
        record(&mut loss, op);
    }
    loss
}

struct BceBackward {
    logits: Tensor,
    target: f32,
    result_grad: GradCell,
}

impl BackwardOp for BceBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.logits.requires_grad() {
                let n = self.logits.len() as f32;
                let scale = grad[0] / n;
                let grad_x: Array1<f32> =
                    self.logits.data().mapv(|x| (stable_sigmoid(x) - self.target) * scale);
                self.logits.accumulate_grad(grad_x);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.logits.clone()]
    }
}
