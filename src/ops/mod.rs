//! # Operation Kernels
//!
//! This module holds the backend implementations of the tensor operations
//! exposed through [`crate::backprop`].
//!
//! ## Submodules
//!
//! - [`cpu`] — Multi-threaded + SIMD CPU operations (the only backend)
//!
//! ## Extending the Backend
//!
//! To add a new operation:
//!
//! 1. Implement it in `cpu` with a forward value and a backward closure
//! 2. Expose it through `backprop` with the shape checks done there
//!
//! ## Notes
//!
//! - SIMD acceleration is only used when the `simd` feature flag is enabled
//! - Operations must return both forward values and backward closures
//!
//! ## Feature Flags
//!
//! - `simd` — Enables AVX2-accelerated CPU paths
pub mod cpu;
