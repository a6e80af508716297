//! Basic autograd operations: add, sub, mul, scale, reductions, pointwise math

use super::{record, tracks_grad};
use crate::autograd::{BackwardOp, GradCell, Tensor};
use ndarray::Array1;

/// Add two tensors
pub fn add(a: &Tensor, b: &Tensor) -> Tensor {
    assert_eq!(a.len(), b.len(), "add: length mismatch");
    let mut result = Tensor::new(a.data() + b.data(), tracks_grad(&[a, b]));
    if result.requires_grad() {
        let op = AddBackward { a: a.clone(), b: b.clone(), sign: 1.0, result_grad: result.grad_cell() };
        record(&mut result, op);
    }
    result
}

/// Subtract `b` from `a`
pub fn sub(a: &Tensor, b: &Tensor) -> Tensor {
    assert_eq!(a.len(), b.len(), "sub: length mismatch");
    let mut result = Tensor::new(a.data() - b.data(), tracks_grad(&[a, b]));
    if result.requires_grad() {
        let op =
            AddBackward { a: a.clone(), b: b.clone(), sign: -1.0, result_grad: result.grad_cell() };
        record(&mut result, op);
    }
    result
}

struct AddBackward {
    a: Tensor,
    b: Tensor,
    sign: f32,
    result_grad: GradCell,
}

impl BackwardOp for AddBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                self.a.accumulate_grad(grad.clone());
            }
            if self.b.requires_grad() {
                self.b.accumulate_grad(grad * self.sign);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }
}

/// Multiply two tensors element-wise
pub fn mul(a: &Tensor, b: &Tensor) -> Tensor {
    assert_eq!(a.len(), b.len(), "mul: length mismatch");
    let mut result = Tensor::new(a.data() * b.data(), tracks_grad(&[a, b]));
    if result.requires_grad() {
        let op = MulBackward { a: a.clone(), b: b.clone(), result_grad: result.grad_cell() };
        record(&mut result, op);
    }
    result
}

struct MulBackward {
    a: Tensor,
    b: Tensor,
    result_grad: GradCell,
}

impl BackwardOp for MulBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                // ∂L/∂a = ∂L/∂out * b
                self.a.accumulate_grad(grad * self.b.data());
            }
            if self.b.requires_grad() {
                // ∂L/∂b = ∂L/∂out * a
                self.b.accumulate_grad(grad * self.a.data());
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }
}

/// Scale tensor by a scalar
pub fn scale(a: &Tensor, factor: f32) -> Tensor {
    let mut result = Tensor::new(a.data() * factor, tracks_grad(&[a]));
    if result.requires_grad() {
        let op = ScaleBackward { a: a.clone(), factor, result_grad: result.grad_cell() };
        record(&mut result, op);
    }
    result
}

/// Add a scalar to every element
pub fn add_scalar(a: &Tensor, value: f32) -> Tensor {
    let mut result = Tensor::new(a.data() + value, tracks_grad(&[a]));
    if result.requires_grad() {
        let op = ScaleBackward { a: a.clone(), factor: 1.0, result_grad: result.grad_cell() };
        record(&mut result, op);
    }
    result
}

struct ScaleBackward {
    a: Tensor,
    factor: f32,
    result_grad: GradCell,
}

impl BackwardOp for ScaleBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                self.a.accumulate_grad(grad * self.factor);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

/// Sum all elements into a one-element tensor
pub fn sum(a: &Tensor) -> Tensor {
    reduce(a, 1.0)
}

/// Mean of all elements; the batch reduction used by every GAN loss
pub fn mean(a: &Tensor) -> Tensor {
    assert!(!a.is_empty(), "mean of an empty tensor");
    reduce(a, 1.0 / a.len() as f32)
}

fn reduce(a: &Tensor, weight: f32) -> Tensor {
    let data = Array1::from(vec![a.data().sum() * weight]);
    let mut result = Tensor::new(data, tracks_grad(&[a]));
    if result.requires_grad() {
        let op = ReduceBackward { a: a.clone(), weight, result_grad: result.grad_cell() };
        record(&mut result, op);
    }
    result
}

struct ReduceBackward {
    a: Tensor,
    weight: f32,
    result_grad: GradCell,
}

impl BackwardOp for ReduceBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                let grad_a = Array1::from_elem(self.a.len(), grad[0] * self.weight);
                self.a.accumulate_grad(grad_a);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }
}

/// Element-wise square
pub fn square(a: &Tensor) -> Tensor {
    mul(a, a)
}

/// Element-wise absolute value (subgradient 0 at 0)
pub fn abs(a: &Tensor) -> Tensor {
    super::pointwise(a, f32::abs, |x, _| {
        if x > 0.0 {
            1.0
        } else if x < 0.0 {
            -1.0
        } else {
            0.0
        }
    })
}

/// Element-wise square root; the gradient is zero where the input is zero
pub fn sqrt(a: &Tensor) -> Tensor {
    super::pointwise(a, f32::sqrt, |_, y| if y > 0.0 { 0.5 / y } else { 0.0 })
}
