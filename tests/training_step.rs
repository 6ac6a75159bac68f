//! End-to-end checks of one forward/backward training step, mirroring the
//! `linear_step` demo with a seeded RNG.

use gradstep::backprop::mse_loss;
use gradstep::layers::Linear;
use gradstep::optim::{Optimizer, Sgd};
use gradstep::tensors::{Ten64, Tensor, WithGrad};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Runs the demo's step with a fixed seed, returning the loss and the model
/// after the parameter update.
fn run_step(seed: u64) -> (f64, Linear) {
    let mut rng = StdRng::seed_from_u64(seed);

    let x = WithGrad::new(Tensor::random(vec![4, 3], &mut rng));
    let mut model = Linear::new(3, 2, &mut rng);
    let y_true = Tensor::random(vec![4, 2], &mut rng);

    let (y_pred, back) = model.forward(&x);
    let (loss, loss_back) = mse_loss(&WithGrad::new(y_pred), &y_true);

    let grads = back(&loss_back(1.0));
    model.accumulate(&grads);

    Sgd::with_lr(0.01).step(model.params_mut());

    (loss, model)
}

#[test]
fn test_step_loss_is_finite_and_non_negative() {
    for seed in 0..8 {
        let (loss, _) = run_step(seed);
        assert!(loss.is_finite(), "loss {loss} not finite (seed {seed})");
        assert!(loss >= 0.0, "loss {loss} negative (seed {seed})");
    }
}

#[test]
fn test_step_is_deterministic_under_fixed_seed() {
    let (loss_a, model_a) = run_step(42);
    let (loss_b, model_b) = run_step(42);

    assert_eq!(loss_a, loss_b);
    assert_eq!(model_a.weight.value, model_b.weight.value);
    assert_eq!(model_a.bias.value, model_b.bias.value);
}

#[test]
fn test_step_moves_parameters() {
    let mut rng = StdRng::seed_from_u64(7);

    let x = WithGrad::new(Tensor::random(vec![4, 3], &mut rng));
    let mut model = Linear::new(3, 2, &mut rng);
    let y_true = Tensor::random(vec![4, 2], &mut rng);

    let weight_before = model.weight.value.clone();
    let bias_before = model.bias.value.clone();

    let (y_pred, back) = model.forward(&x);
    let (_loss, loss_back) = mse_loss(&WithGrad::new(y_pred), &y_true);
    let grads = back(&loss_back(1.0));

    let zero_grad = grads.weight.data.iter().all(|&g| g == 0.0)
        && grads.bias.data.iter().all(|&g| g == 0.0);

    model.accumulate(&grads);
    Sgd::with_lr(0.01).step(model.params_mut());

    if !zero_grad {
        assert!(
            model.weight.value != weight_before || model.bias.value != bias_before,
            "SGD step left all parameters unchanged"
        );
    }
}

#[test]
fn test_step_zeroes_gradients() {
    let (_, model) = run_step(3);
    let all_zero = |t: &Ten64| t.data.iter().all(|&g| g == 0.0);
    assert!(all_zero(&model.weight.grad));
    assert!(all_zero(&model.bias.grad));
}

#[test]
fn test_gradient_shapes_match_parameters() {
    let mut rng = StdRng::seed_from_u64(11);

    let x = WithGrad::new(Tensor::random(vec![4, 3], &mut rng));
    let model = Linear::new(3, 2, &mut rng);
    let y_true = Tensor::random(vec![4, 2], &mut rng);

    let (y_pred, back) = model.forward(&x);
    let (_loss, loss_back) = mse_loss(&WithGrad::new(y_pred), &y_true);
    let grads = back(&loss_back(1.0));

    assert_eq!(grads.input.shape, x.value.shape);
    assert_eq!(grads.weight.shape, model.weight.value.shape);
    assert_eq!(grads.bias.shape, model.bias.value.shape);
}
