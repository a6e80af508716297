//! Tape-based autograd engine
//!
//! Provides automatic differentiation over flat `f32` tensors. Every operation
//! records a [`BackwardOp`] holding its inputs; [`backward`] walks the recorded
//! graph in reverse topological order.
//!
//! ```
//! use pidgan::autograd::{backward, mean, mul, Tensor};
//!
//! let w = Tensor::from_vec(vec![2.0, -1.0], true);
//! let x = Tensor::from_vec(vec![1.0, 3.0], false);
//! let loss = mean(&mul(&w, &x));
//! backward(&loss, None);
//! assert_eq!(w.grad().unwrap().to_vec(), vec![0.5, 1.5]);
//! ```

mod backward;
mod context;
mod ops;
mod tensor;

#[cfg(test)]
mod tests;

pub use backward::{backward, BackwardOp};
pub use context::{is_grad_enabled, no_grad, Context};
pub use ops::*;
pub use tensor::{GradCell, Tensor};
