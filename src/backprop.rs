//! Differentiable operations and autograd utilities.
//!
//! # Backpropagation and Optimization Primitives
//!
//! Provides core operations with built-in autograd support for training
//! linear models.
//!
//! **Key Features:**
//! - **Matrix Multiplication:** m×k · k×n implementation with gradient closures.
//! - **Bias Addition:** Row-broadcast add with column-sum bias gradients.
//! - **Loss Computation (MSE):** Mean Squared Error with gradient generator.
//! - **Optimizer (SGD):** In-place parameter update with gradient reset.
//!
//! ## Autograd Pattern
//!
//! Each operation follows a simple pattern:
//! 1. **Inputs** are references to `WithGrad<Ten64>` for tensor ops.
//! 2. **Forward Pass** computes an output `Ten64`.
//! 3. **Backward Pass** returns a closure capturing minimal cloned data to compute gradients.
//! 4. **Gradient Application** uses these results to update `WithGrad` wrappers.
//!
//! ## Usage Guidelines
//!
//! - Operations **panic** on shape mismatches; ensure consistent tensor dimensions.
//! - The backward closures implement `Fn`, allowing multiple invocations if needed.
//! - For performance-critical use, replace loops with optimized BLAS or SIMD kernels.

use crate::tensors::{Ten64, WithGrad};

/// A backward closure mapping `dL/dout` to gradients for two inputs.
pub type FnToDoubleTen64 = dyn Fn(&Ten64) -> (Ten64, Ten64);

/// A backward closure mapping an upstream scalar gradient to a tensor.
pub type FnF64Ten64 = dyn Fn(f64) -> Ten64;

/// Performs matrix multiplication of two 2D tensors: `a` (m×k) · `b` (k×n).
///
/// # Returns
/// - `out`: Product tensor (m×n).
/// - `back`: Closure that given `dL/d(out)` returns `(dL/d(a), dL/d(b))`.
///
/// # Panics
/// Panics if internal dimensions do not match (`a.shape[1] != b.shape[0]`).
///
/// # Performance
/// Uses AVX2 if compiled with `simd` feature. Uses Rayon for outer parallelism.
pub fn matmul(a: &WithGrad<Ten64>, b: &WithGrad<Ten64>) -> (Ten64, Box<FnToDoubleTen64>) {
    crate::ops::cpu::matmul(a, b)
}

/// Adds a bias vector to every row of a 2D tensor: `out = x + bias`.
///
/// # Returns
/// - `out`: Tensor of the same shape as `x`.
/// - `back`: Closure that given `dL/d(out)` returns `(dL/d(x), dL/d(bias))`,
///   where the bias gradient sums the upstream gradient over rows.
///
/// # Panics
/// Panics if the bias length does not match the row width of `x`.
pub fn add_bias(x: &WithGrad<Ten64>, bias: &WithGrad<Ten64>) -> (Ten64, Box<FnToDoubleTen64>) {
    crate::ops::cpu::add_bias(x, bias)
}

/// Computes Mean Squared Error (MSE) loss: `mean((prediction - target)^2)`.
///
/// # Returns
/// - Scalar loss value
/// - Closure that maps `dL/dloss` into gradient tensor shape
///
/// # Panics
/// Panics if shapes of `prediction` and `target` differ.
pub fn mse_loss(prediction: &WithGrad<Ten64>, target: &Ten64) -> (f64, Box<FnF64Ten64>) {
    assert_eq!(prediction.value.shape, target.shape);
    crate::ops::cpu::mse_loss(prediction, target)
}

/// Performs an in-place Stochastic Gradient Descent (SGD) update.
///
/// Applies: `param = param - learning_rate * gradient` and then zeros gradient.
///
/// # Example
/// ```rust
/// use gradstep::backprop::sgd;
/// use gradstep::tensor;
/// use gradstep::tensors::WithGrad;
///
/// let mut weights = WithGrad::new(tensor!([3.0, 5.0, 4.0]));
/// sgd(&mut weights, 0.01);
/// ```
pub fn sgd(w: &mut WithGrad<Ten64>, lr: f64) {
    crate::ops::cpu::sgd(w, lr)
}
