//! Autograd operations with backward passes
//!
//! This module provides differentiable operations for automatic differentiation.

mod activations;
mod basic;
mod loss;
mod matmul;
mod shape;

use crate::autograd::{is_grad_enabled, BackwardOp, GradCell, Tensor};
use std::rc::Rc;

// Re-export all public operations
pub use activations::{leaky_relu, leaky_relu_mask, relu, sigmoid, stable_sigmoid, tanh};
pub use basic::{abs, add, add_scalar, mean, mul, scale, sqrt, square, sub, sum};
pub use loss::bce_with_logits;
pub use matmul::{matmul, matmul_compute, transpose, transpose_tensor};
pub use shape::{broadcast_rows, gather_rows, row_sum};

/// Whether an op over `inputs` should record a backward op
pub(crate) fn tracks_grad(inputs: &[&Tensor]) -> bool {
    is_grad_enabled() && inputs.iter().any(|t| t.requires_grad())
}

pub(crate) fn record(result: &mut Tensor, op: impl BackwardOp + 'static) {
    result.set_backward_op(Rc::new(op));
}

/// Element-wise op `y = f(x)` whose derivative is `df(x, y)`
pub(crate) fn pointwise(a: &Tensor, f: fn(f32) -> f32, df: fn(f32, f32) -> f32) -> Tensor {
    let mut result = Tensor::new(a.data().mapv(f), tracks_grad(&[a]));
    if result.requires_grad() {
        let op = PointwiseBackward {
            a: a.clone(),
            output: result.data().clone(),
            df,
            result_grad: result.grad_cell(),
        };
        record(&mut result, op);
    }
    result
}

struct PointwiseBackward {
    a: Tensor,
    output: ndarray::Array1<f32>,
    df: fn(f32, f32) -> f32,
    result_grad: GradCell,
}

impl BackwardOp for PointwiseBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                let local = ndarray::Zip::from(self.a.data())
                    .and(&self.output)
                    .map_collect(|&x, &y| (self.df)(x, y));
                self.a.accumulate_grad(grad * &local);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}
