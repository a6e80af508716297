//! Optimizers for training the generator and discriminator

mod adam;
mod clip;
mod optimizer;
mod sgd;

pub use adam::Adam;
pub use clip::{clip_grad_norm, clip_grad_norm_refs, clip_grad_value_refs};
pub use optimizer::Optimizer;
pub use sgd::SGD;
