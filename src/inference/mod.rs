//! Inference scoping: gradient tracking flag and model mode guards.
//!
//! Evaluation is read-only with respect to the model. [`InferenceGuard`]
//! switches a model into eval mode with gradient tracking disabled and puts
//! both back when dropped, so every exit path (including `?` returns and
//! panics) restores the previous state.
//!
//! # Example
//!
//! ```
//! use lign::inference::{is_grad_enabled, no_grad};
//!
//! assert!(is_grad_enabled());
//! let seen = no_grad(|| is_grad_enabled());
//! assert!(!seen);
//! assert!(is_grad_enabled());
//! ```

use crate::embed::EmbeddingModel;
use std::cell::Cell;
use std::ops::{Deref, DerefMut};

thread_local! {
    /// Flag to disable gradient tracking (for inference).
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// Check if gradient tracking is currently enabled on this thread.
#[must_use]
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

/// Execute a closure without gradient tracking.
///
/// The previous setting is restored even if `f` panics.
pub fn no_grad<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = NoGradGuard::new();
    f()
}

/// RAII guard that disables gradient tracking until dropped.
#[derive(Debug)]
#[must_use = "gradient tracking is re-enabled as soon as the guard is dropped"]
pub struct NoGradGuard {
    prev: bool,
}

impl NoGradGuard {
    /// Disables gradient tracking, remembering the previous setting.
    pub fn new() -> Self {
        let prev = GRAD_ENABLED.with(|enabled| enabled.replace(false));
        Self { prev }
    }
}

impl Default for NoGradGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NoGradGuard {
    fn drop(&mut self) {
        GRAD_ENABLED.with(|enabled| enabled.set(self.prev));
    }
}

/// Exclusive handle on a model held in eval mode without gradients.
///
/// Dereferences to the model. On drop the model returns to training mode if
/// it was training before, and gradient tracking returns to its prior value.
#[must_use = "the model leaves inference mode as soon as the guard is dropped"]
pub struct InferenceGuard<'a, M: EmbeddingModel> {
    model: &'a mut M,
    was_training: bool,
    _no_grad: NoGradGuard,
}

impl<'a, M: EmbeddingModel> InferenceGuard<'a, M> {
    /// Puts `model` into eval mode and disables gradient tracking.
    pub fn enter(model: &'a mut M) -> Self {
        let was_training = model.training();
        model.eval();
        Self {
            model,
            was_training,
            _no_grad: NoGradGuard::new(),
        }
    }
}

impl<M: EmbeddingModel> Deref for InferenceGuard<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        self.model
    }
}

impl<M: EmbeddingModel> DerefMut for InferenceGuard<'_, M> {
    fn deref_mut(&mut self) -> &mut M {
        self.model
    }
}

impl<M: EmbeddingModel> Drop for InferenceGuard<'_, M> {
    fn drop(&mut self) {
        if self.was_training {
            self.model.train();
        }
    }
}

#[cfg(test)]
mod tests;
