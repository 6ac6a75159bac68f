//! Parallel CPU backend tensor operations
//!
//! # CPU Backend
//!
//! This module provides high-performance CPU implementations of the core
//! tensor operations used for linear-model training.
//!
//! These CPU functions back the public `backprop::xyz` surface.
//!
//! ## Features
//!
//! - Parallel execution using [`rayon`](https://docs.rs/rayon)
//! - Optional SIMD acceleration using AVX2 (enabled via `simd` feature flag)
//! - Pure Rust fallback path when SIMD is disabled or unavailable
//!
//! ## Implemented Ops
//!
//! - `matmul`: Matrix multiplication with SIMD and multithreading
//! - `add_bias`: Row-broadcast bias addition with forward and backward pass
//! - `mse_loss`: Mean squared error loss with autograd
//! - `sgd`: In-place stochastic gradient descent step
//!
//! ## Design Goals
//!
//! - Deterministic results (given deterministic input and scheduling)
//! - Zero dependencies beyond `rayon`
//! - Modular: kernels are separate from the public op surface
//!
//! ## Safety
//!
//! - SIMD paths use `unsafe` blocks and assume 64-bit AVX2-capable CPUs
//! - Shape checks live in the `backprop` wrappers, not in this module

use crate::backprop::{FnF64Ten64, FnToDoubleTen64};
use crate::tensors::{Ten64, Tensor, WithGrad};
use rayon::prelude::*;

#[cfg(all(feature = "simd", target_arch = "x86_64", target_feature = "avx2"))]
use core::arch::x86_64::*;

/// Performs a matrix multiplication `C = A × B` on two 2D tensors (`A: m×k`, `B: k×n`),
/// returning the result tensor and a closure for backpropagation.
///
/// # Requirements
/// - Shapes must be compatible: `A.shape = [m, k]` and `B.shape = [k, n]`.
///
/// # Optimizations
/// - Uses `rayon` for parallel row computation
/// - Uses AVX2 SIMD for fused multiply-adds (if enabled via `--features=simd`)
///
/// # Returns
/// - Output tensor of shape `[m, n]`
/// - Backward function computing gradients w.r.t. `A` and `B`
///
/// # Panics
/// - If the inner dimensions of `A` and `B` do not match.
///
/// # Example
/// ```rust
/// use gradstep::backprop::matmul;
/// use gradstep::{tensor, tensors::WithGrad};
///
/// let a = WithGrad::new(gradstep::tensor!([[5.0, 1.0], [6.0, 3.0]]));
/// let b = WithGrad::new(gradstep::tensor!([[1.0, 2.0], [5.0, 1.9]]));
/// let grad_output = tensor!([[1.0, 2.0], [3.0, 2.0]]);
/// let (c, back) = matmul(&a, &b);
/// let (grad_a, grad_b) = back(&grad_output);
/// ```
pub fn matmul(a: &WithGrad<Ten64>, b: &WithGrad<Ten64>) -> (Ten64, Box<FnToDoubleTen64>) {
    let m = a.value.shape[0];
    let k = a.value.shape[1];
    let n = b.value.shape[1];
    assert_eq!(k, b.value.shape[0], "matmul shape mismatch");

    let a_data = &a.value.data;
    let b_data = &b.value.data;

    let mut out_data = vec![0.0; m * n];

    out_data.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
        for j in 0..n {
            let sum = {
                #[cfg(all(feature = "simd", target_arch = "x86_64", target_feature = "avx2"))]
                {
                    let mut acc = unsafe { _mm256_setzero_pd() };
                    let mut idx = 0;
                    while idx + 4 <= k {
                        unsafe {
                            let a_chunk = _mm256_loadu_pd(&a_data[i * k + idx]);
                            let b_chunk = _mm256_set_pd(
                                b_data[(idx + 3) * n + j],
                                b_data[(idx + 2) * n + j],
                                b_data[(idx + 1) * n + j],
                                b_data[(idx) * n + j],
                            );
                            acc = _mm256_fmadd_pd(a_chunk, b_chunk, acc);
                        }
                        idx += 4;
                    }

                    let mut temp = [0.0; 4];
                    unsafe { _mm256_storeu_pd(temp.as_mut_ptr(), acc) };
                    let mut sum: f64 = temp.iter().sum();

                    for l in idx..k {
                        sum += a_data[i * k + l] * b_data[l * n + j];
                    }

                    sum
                }

                #[cfg(not(all(feature = "simd", target_arch = "x86_64", target_feature = "avx2")))]
                {
                    let mut sum = 0.0;
                    for l in 0..k {
                        sum += a_data[i * k + l] * b_data[l * n + j];
                    }
                    sum
                }
            };
            row[j] = sum;
        }
    });

    let out = Tensor::new(vec![m, n], out_data);

    let a_val = a.value.clone();
    let b_val = b.value.clone();

    // dL/dA = dL/dC · Bᵀ, dL/dB = Aᵀ · dL/dC
    let back = move |grad: &Ten64| {
        assert_eq!(grad.shape, vec![m, n], "matmul gradient shape mismatch");

        let mut grad_a = vec![0.0; m * k];
        grad_a.par_chunks_mut(k).enumerate().for_each(|(i, row)| {
            for (l, slot) in row.iter_mut().enumerate() {
                let mut sum = 0.0;
                for j in 0..n {
                    sum += grad.data[i * n + j] * b_val.data[l * n + j];
                }
                *slot = sum;
            }
        });

        let mut grad_b = vec![0.0; k * n];
        grad_b.par_chunks_mut(n).enumerate().for_each(|(l, row)| {
            for (j, slot) in row.iter_mut().enumerate() {
                let mut sum = 0.0;
                for i in 0..m {
                    sum += a_val.data[i * k + l] * grad.data[i * n + j];
                }
                *slot = sum;
            }
        });

        (
            Tensor::new(vec![m, k], grad_a),
            Tensor::new(vec![k, n], grad_b),
        )
    };

    (out, Box::new(back))
}

/// Adds a bias vector to every row of a 2D tensor (`X: m×n`, `bias: n`),
/// returning the result and a closure for backpropagation.
///
/// # Returns
/// - Output tensor of shape `[m, n]`
/// - Backward function mapping `dL/dout` to `(dL/dX, dL/dbias)`; the bias
///   gradient is the column sum of the upstream gradient
///
/// # Panics
/// - If the bias length does not match the row width of `X`.
pub fn add_bias(x: &WithGrad<Ten64>, bias: &WithGrad<Ten64>) -> (Ten64, Box<FnToDoubleTen64>) {
    let m = x.value.shape[0];
    let n = x.value.shape[1];
    assert_eq!(n, bias.value.data.len(), "bias length mismatch");

    let bias_data = bias.value.data.clone();

    let mut out_data = x.value.data.clone();
    out_data.par_chunks_mut(n).for_each(|row| {
        for (v, b) in row.iter_mut().zip(&bias_data) {
            *v += b;
        }
    });

    let out = Tensor::new(vec![m, n], out_data);

    let back = move |grad: &Ten64| {
        assert_eq!(grad.shape, vec![m, n], "add_bias gradient shape mismatch");

        let grad_bias: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|j| (0..m).map(|i| grad.data[i * n + j]).sum())
            .collect();

        (
            Tensor::new(vec![m, n], grad.data.clone()),
            Tensor::new(vec![n], grad_bias),
        )
    };

    (out, Box::new(back))
}

/// Computes the mean squared error (MSE) between predictions and targets,
/// returning both the scalar loss and a gradient function.
///
/// # Formula
/// $$ L = \\frac{1}{n} \\sum_i (y_i - t_i)^2 $$
///
/// # Returns
/// - Scalar loss `f64`
/// - Backward function mapping upstream scalar gradient `dL` to a tensor of shape `prediction`
///
/// # Notes
/// - The backward pass is parallelized with `rayon`; the forward reduction
///   is sequential so the scalar loss is reproducible
/// - Suitable for batch or scalar regression losses
///
/// # Example
/// ```rust
/// use gradstep::backprop::mse_loss;
/// use gradstep::tensors::WithGrad;
/// use gradstep::tensor;
///
/// let y_pred = WithGrad::new(tensor!([1.0, 2.0, 3.0]));
/// let y_true = tensor!([1.0, 3.0, 2.0]);
/// let (loss, back) = mse_loss(&y_pred, &y_true);
/// let grad_tensor = back(1.0); // ∂L/∂y_pred
/// ```
pub fn mse_loss(prediction: &WithGrad<Ten64>, target: &Ten64) -> (f64, Box<FnF64Ten64>) {
    let n = prediction.value.data.len() as f64;

    // sequential reduction: rayon's split points vary between runs, and the
    // scalar loss must be bit-reproducible under a fixed seed
    let loss = prediction
        .value
        .data
        .iter()
        .zip(&target.data)
        .map(|(&y, &t)| (y - t).powi(2))
        .sum::<f64>()
        / n;

    let shape = prediction.value.shape.clone();
    let pred_data = prediction.value.data.clone();
    let target_data = target.data.clone();

    // parallel backward pass
    let back = move |grad_output: f64| {
        let grad: Vec<f64> = pred_data
            .par_iter()
            .zip(&target_data)
            .map(|(&y, &t)| 2.0 * (y - t) * grad_output / n)
            .collect();

        Tensor::new(shape.clone(), grad)
    };

    (loss, Box::new(back))
}

/// Performs one step of stochastic gradient descent (SGD) on the given parameter tensor.
///
/// # Formula
/// $$ w := w - \\text{lr} \\cdot \\frac{\\partial L}{\\partial w} $$
///
/// # Behavior
/// - Updates `w.value` in-place
/// - Zeros out `w.grad` after the update (gradient reset step)
pub fn sgd(w: &mut WithGrad<Ten64>, lr: f64) {
    for (param, grad) in w.value.data.iter_mut().zip(&w.grad.data) {
        *param -= lr * *grad;
    }
    for grad in &mut w.grad.data {
        *grad = 0.0;
    }
}
