//! Execution context: training mode and gradient recording mode

use std::cell::Cell;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// Whether new operations record backward ops on this thread
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

/// Run `f` with gradient recording disabled.
///
/// Tensors produced inside carry no backward op, whatever their inputs.
/// The previous mode is restored even if `f` panics.
pub fn no_grad<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    struct Restore(bool);
    impl Drop for Restore {
        fn drop(&mut self) {
            GRAD_ENABLED.with(|g| g.set(self.0));
        }
    }

    let _restore = Restore(GRAD_ENABLED.with(|g| g.replace(false)));
    f()
}

/// Training/evaluation flag carried by every network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    training: bool,
}

impl Context {
    /// Create a new context in training mode
    pub fn new() -> Self {
        Self { training: true }
    }

    /// Set training mode
    pub fn train(&mut self) {
        self.training = true;
    }

    /// Set evaluation mode
    pub fn eval(&mut self) {
        self.training = false;
    }

    /// Check if in training mode
    pub fn is_training(&self) -> bool {
        self.training
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
