//! One forward/backward training step for a linear regression model.
//!
//! Builds a random (4, 3) input batch, runs it through a Linear(3 -> 2)
//! model, measures mean-squared error against a random (4, 2) target,
//! backpropagates, applies one SGD update, and prints the loss.

use gradstep::backprop::mse_loss;
use gradstep::layers::Linear;
use gradstep::optim::{Optimizer, Sgd};
use gradstep::tensors::{Tensor, WithGrad};

fn main() {
    let mut rng = rand::rng();

    // random input batch (batch_size=4, features=3)
    let x = WithGrad::new(Tensor::random(vec![4, 3], &mut rng));

    // a simple linear model: y = xW + b
    let mut model = Linear::new(3, 2, &mut rng);

    let mut optimizer = Sgd::with_lr(0.01);

    // forward pass: compute predictions
    let (y_pred, back) = model.forward(&x);

    // random target, same shape as the output
    let y_true = Tensor::random(vec![4, 2], &mut rng);

    // compute loss
    let (loss, loss_back) = mse_loss(&WithGrad::new(y_pred), &y_true);

    // backpropagation: compute gradients
    let grad_pred = loss_back(1.0);
    let grads = back(&grad_pred);
    model.accumulate(&grads);

    // update model parameters
    optimizer.step(model.params_mut());

    println!("Loss: {loss}");
}
