//! gradstep: A lightweight single-step autodiff engine in Rust.
//!
//! Designed to demonstrate one forward/backward training step for a linear
//! regression model, end to end, with a focus on minimal dependencies and
//! maximal clarity.
//!
//! # Features
//!
//! - Multi-dimensional tensor management with gradient support.
//! - Core linear-model operations with manual backpropagation closures.
//! - A linear layer and SGD optimizer composing those operations.
//!
//! # Goals
//!
//! - Show the full mechanics of one training step: tensor construction,
//!   forward pass, loss, backpropagation, and the parameter update.
//! - Prioritize correctness, explicitness, and extensibility over black-box
//!   abstraction.
//!
//! # Modules
//!
//! - [`tensors`] — Core tensor data structures and `WithGrad` wrappers.
//! - [`backprop`] — Differentiable operations and autograd utilities.
//! - [`layers`] — The linear model `y = xW + b`.
//! - [`optim`] — SGD parameter updates.
//!
//! # Example
//!
//! One full training step, seeded for reproducibility:
//!
//! ```rust
//! use gradstep::backprop::mse_loss;
//! use gradstep::layers::Linear;
//! use gradstep::optim::{Optimizer, Sgd};
//! use gradstep::tensors::{Tensor, WithGrad};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let x = WithGrad::new(Tensor::random(vec![4, 3], &mut rng));
//! let mut model = Linear::new(3, 2, &mut rng);
//! let y_true = Tensor::random(vec![4, 2], &mut rng);
//!
//! let (y_pred, back) = model.forward(&x);
//! let (loss, loss_back) = mse_loss(&WithGrad::new(y_pred), &y_true);
//!
//! let grads = back(&loss_back(1.0));
//! model.accumulate(&grads);
//!
//! Sgd::with_lr(0.01).step(model.params_mut());
//! assert!(loss.is_finite() && loss >= 0.0);
//! ```
pub mod backprop;
pub mod layers;
pub mod ops;
pub mod optim;
pub mod tensors;
