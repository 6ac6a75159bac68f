//! Linear model layer.
//!
//! A [`Linear`] owns a weight matrix and a bias vector wrapped in
//! [`WithGrad`], computes the affine transform `y = xW + b`, and returns a
//! backward closure in the same pattern as the [`crate::backprop`] ops.
//!
//! The layer composes `matmul` and `add_bias`, so its backward pass produces
//! gradients for the input, the weights, and the bias in one call. Parameter
//! gradients are accumulated explicitly via [`Linear::accumulate`], keeping
//! the forward pass free of interior mutability.

use crate::backprop::{add_bias, matmul};
use crate::tensors::{Ten64, Tensor, WithGrad};
use rand::Rng;

/// An affine transform `y = xW + b` with trainable parameters.
///
/// - `weight` has shape `[in_features, out_features]`
/// - `bias` has shape `[out_features]`
///
/// Parameters are owned by the layer for its whole lifetime and are mutated
/// in place by the optimizer step.
#[derive(Debug, Clone)]
pub struct Linear {
    pub weight: WithGrad<Ten64>,
    pub bias: WithGrad<Ten64>,
}

/// Gradients produced by one backward pass through a [`Linear`].
#[derive(Debug, Clone)]
pub struct LinearGrads {
    /// `dL/d(input)`, shape `[batch, in_features]`.
    pub input: Ten64,
    /// `dL/d(weight)`, shape `[in_features, out_features]`.
    pub weight: Ten64,
    /// `dL/d(bias)`, shape `[out_features]`.
    pub bias: Ten64,
}

impl Linear {
    /// Creates a layer with weights and bias drawn uniformly from
    /// `±1/sqrt(in_features)` and zeroed gradient buffers.
    ///
    /// # Example
    /// ```
    /// use gradstep::layers::Linear;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let model = Linear::new(3, 2, &mut rng);
    /// assert_eq!(model.weight.value.shape, vec![3, 2]);
    /// assert_eq!(model.bias.value.shape, vec![2]);
    /// ```
    pub fn new(in_features: usize, out_features: usize, rng: &mut impl Rng) -> Self {
        let bound = 1.0 / (in_features as f64).sqrt();
        let weight_data = (0..in_features * out_features)
            .map(|_| rng.random_range(-bound..bound))
            .collect();
        let bias_data = (0..out_features)
            .map(|_| rng.random_range(-bound..bound))
            .collect();

        Self {
            weight: WithGrad::new(Tensor::new(vec![in_features, out_features], weight_data)),
            bias: WithGrad::new(Tensor::new(vec![out_features], bias_data)),
        }
    }

    /// Runs the forward pass `y = xW + b` on a `[batch, in_features]` input.
    ///
    /// # Returns
    /// - `out`: Tensor of shape `[batch, out_features]`.
    /// - `back`: Closure that given `dL/d(out)` returns a [`LinearGrads`].
    ///
    /// # Panics
    /// Panics if `input.shape[1] != in_features`.
    pub fn forward(&self, input: &WithGrad<Ten64>) -> (Ten64, Box<dyn Fn(&Ten64) -> LinearGrads>) {
        let (z, back_mat) = matmul(input, &self.weight);
        let z = WithGrad::new(z);
        let (out, back_bias) = add_bias(&z, &self.bias);

        let back = move |grad_out: &Ten64| {
            // y = z + b, so dL/dz is dL/dout unchanged
            let (grad_z, grad_bias) = back_bias(grad_out);
            let (grad_input, grad_weight) = back_mat(&grad_z);
            LinearGrads {
                input: grad_input,
                weight: grad_weight,
                bias: grad_bias,
            }
        };

        (out, Box::new(back))
    }

    /// Adds a backward pass's parameter gradients into the stored buffers.
    ///
    /// # Panics
    /// Panics if the gradient shapes do not match the parameter shapes.
    pub fn accumulate(&mut self, grads: &LinearGrads) {
        assert_eq!(self.weight.value.shape, grads.weight.shape);
        assert_eq!(self.bias.value.shape, grads.bias.shape);

        for (g, dg) in self.weight.grad.data.iter_mut().zip(&grads.weight.data) {
            *g += dg;
        }
        for (g, dg) in self.bias.grad.data.iter_mut().zip(&grads.bias.data) {
            *g += dg;
        }
    }

    /// The layer's trainable parameters, for the optimizer step.
    pub fn params_mut(&mut self) -> [&mut WithGrad<Ten64>; 2] {
        [&mut self.weight, &mut self.bias]
    }
}
