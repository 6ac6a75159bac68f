//! Parameter optimizers.
//!
//! An [`Optimizer`] consumes the gradients accumulated on `WithGrad`
//! parameters and updates the parameter values in place. [`Sgd`] is the only
//! implementation; it delegates per-parameter to [`crate::backprop::sgd`],
//! which also resets each gradient buffer after the update.

use crate::tensors::{Ten64, WithGrad};

/// An algorithm that updates parameters from their accumulated gradients.
pub trait Optimizer {
    /// Creates the optimizer with the given learning rate.
    fn with_lr(lr: f64) -> Self;

    /// Applies one update to every parameter, consuming its gradient.
    fn step<'a>(&mut self, params: impl IntoIterator<Item = &'a mut WithGrad<Ten64>>);
}

/// Plain stochastic gradient descent: `param -= lr * grad`.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    lr: f64,
}

impl Sgd {
    /// The configured learning rate.
    pub fn lr(&self) -> f64 {
        self.lr
    }
}

impl Optimizer for Sgd {
    fn with_lr(lr: f64) -> Self {
        Self { lr }
    }

    fn step<'a>(&mut self, params: impl IntoIterator<Item = &'a mut WithGrad<Ten64>>) {
        for p in params {
            crate::backprop::sgd(p, self.lr);
        }
    }
}
