//! Configuration validation
//!
//! Checks a run specification for values the trainer cannot run with.

mod error;
mod validator;

#[cfg(test)]
mod tests;

pub use error::ValidationError;
pub use validator::validate_config;
