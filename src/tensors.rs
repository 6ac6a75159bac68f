//! Core tensor data structures.
//!
//! This module defines the core logic for representing multi-dimensional
//! arrays, or tensors, and pairing them with gradient buffers for autograd.
//!
//! It supports:
//! - Construction of N-dimensional tensors with shape and row-major data layout
//! - Zero-filled and randomly initialized tensors
//! - Autograd-compatible `WithGrad` wrappers with zeroed gradient buffers
//! - Compile-time tensor macros
//!
//! ## Design Highlights
//! - Tensors are strongly typed: `Tensor<T>` for any element type; [`Ten64`]
//!   is the `f64` working alias used by all differentiable operations
//! - Shape is stored as a `Vec<usize>` and enforced at runtime
//! - `WithGrad<T>` pairs any value with its gradient for autograd
//! - The `tensor!` macro supports ergonomic tensor creation from nested arrays
//! - Randomness flows through a caller-supplied [`rand::Rng`], so a seeded
//!   `StdRng` produces bit-reproducible tensors
//!
//! ## Limitations
//! - Row-major only
//! - No broadcasting, slicing, or shape inference
//!
//! ## Example
//!
//! ```rust
//! use gradstep::tensors::Tensor;
//! let t = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! assert_eq!(t.shape, vec![2, 3]);
//! ```

use rand::Rng;

/// Represents an N-dimensional tensor with a shape and flat row-major data.
///
/// - All elements must be the same type (`T`).
/// - `shape` defines the structure, e.g., `[2, 3]` for a 2×3 matrix.
/// - `data` holds the flattened content in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

/// The `f64` tensor every differentiable operation works on.
pub type Ten64 = Tensor<f64>;

impl<T> Tensor<T> {
    /// Creates a new tensor with the given shape and flat data.
    ///
    /// # Panics
    /// Panics if the number of elements in `data` does not match the shape product.
    pub fn new(shape: impl Into<Vec<usize>>, data: Vec<T>) -> Self {
        let shape = shape.into();
        assert_eq!(
            shape.iter().product::<usize>(),
            data.len(),
            "shape {:?} is incompatible with {} data elements",
            shape,
            data.len()
        );
        Self { shape, data }
    }
}

impl Ten64 {
    /// Creates a zero-filled tensor of the given shape.
    pub fn zeros(shape: impl Into<Vec<usize>>) -> Self {
        let shape = shape.into();
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![0.0; len],
        }
    }

    /// Creates a tensor of the given shape with elements drawn uniformly
    /// from `[-1, 1)`.
    ///
    /// # Example
    /// ```
    /// use gradstep::tensors::Tensor;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let t = Tensor::random(vec![4, 3], &mut rng);
    /// assert_eq!(t.data.len(), 12);
    /// ```
    pub fn random(shape: impl Into<Vec<usize>>, rng: &mut impl Rng) -> Self {
        let shape = shape.into();
        let len = shape.iter().product();
        let data = (0..len).map(|_| rng.random::<f64>() * 2.0 - 1.0).collect();
        Self { shape, data }
    }
}

/// A container for tracking gradients of values (used in autograd).
///
/// Typically used as `WithGrad<Ten64>`.
#[derive(Debug, Clone)]
pub struct WithGrad<T> {
    pub value: T,
    pub grad: T,
}

impl WithGrad<Ten64> {
    /// Wraps a tensor with a zero-filled gradient buffer of the same shape.
    pub fn new(value: Ten64) -> Self {
        let grad = Ten64::zeros(value.shape.clone());
        Self { value, grad }
    }
}

/// Defines a tensor from nested literal arrays.
///
/// Supports arbitrary dimensionality as long as sublists are uniform in shape.
///
/// # Example
/// ```
/// use gradstep::tensor;
/// let t = tensor!([[1.0, 2.0], [3.0, 4.0]]);
/// assert_eq!(t.shape, vec![2, 2]);
/// ```
#[macro_export]
macro_rules! tensor {
    ($lit:literal) => {
        $crate::tensors::Tensor::new(Vec::<usize>::new(), vec![$lit])
    };

    (- $lit:literal) => {
        $crate::tensors::Tensor::new(Vec::<usize>::new(), vec![- $lit])
    };

    ([ $( [ $($inner:tt)* ] ),+ $(,)? ]) => {{
        let children = vec![ $( tensor!([ $($inner)* ]) ),+ ];
        let first_shape = &children[0].shape;
        assert!(children.iter().all(|c| c.shape == *first_shape),
            "ragged tensor literal (rows have mismatched shapes)");
        let mut shape = vec![children.len()];
        shape.extend_from_slice(first_shape);
        let mut data = Vec::with_capacity(children.len() * children[0].data.len());
        for c in children { data.extend(c.data); }
        $crate::tensors::Tensor::new(shape, data)
    }};

    ([ $( $elem:expr ),+ $(,)? ]) => {{
        let data = vec![ $( $elem ),+ ];
        let shape = vec![data.len()];
        $crate::tensors::Tensor::new(shape, data)
    }};
}
