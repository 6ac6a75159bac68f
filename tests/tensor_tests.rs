use gradstep::backprop::{add_bias, matmul, mse_loss, sgd};
use gradstep::tensor;
use gradstep::tensors::{Tensor, WithGrad};

#[test]
fn test_tensor_creation() {
    let t = Tensor::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(t.shape, vec![2, 2]);
    assert_eq!(t.data, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_tensor_macro() {
    let t = tensor!([[1.0, 2.0], [3.0, 4.0]]);
    assert_eq!(t.shape, vec![2, 2]);
    assert_eq!(t.data, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_tensor_zeros() {
    let t = Tensor::zeros(vec![3, 2]);
    assert_eq!(t.shape, vec![3, 2]);
    assert!(t.data.iter().all(|&v| v == 0.0));
}

#[test]
fn test_with_grad_zeroed() {
    let w = WithGrad::new(tensor!([[1.0, 2.0], [3.0, 4.0]]));
    assert_eq!(w.grad.shape, w.value.shape);
    assert!(w.grad.data.iter().all(|&g| g == 0.0));
}

#[test]
fn test_matmul_forward_values() {
    let a = WithGrad::new(tensor!([[1.0, 2.0], [3.0, 4.0]]));
    let b = WithGrad::new(tensor!([[5.0, 6.0], [7.0, 8.0]]));

    let (out, _back) = matmul(&a, &b);
    assert_eq!(out.shape, vec![2, 2]);
    assert_eq!(out.data, vec![19.0, 22.0, 43.0, 50.0]);
}

#[test]
fn test_matmul_backprop_values() {
    let a = WithGrad::new(tensor!([[1.0, 2.0], [3.0, 4.0]]));
    let b = WithGrad::new(tensor!([[5.0, 6.0], [7.0, 8.0]]));

    let (_out, back) = matmul(&a, &b);
    let grad_output = tensor!([[1.0, 1.0], [1.0, 1.0]]);
    let (grad_a, grad_b) = back(&grad_output);

    // dL/dA = dL/dC · Bᵀ
    assert_eq!(grad_a.data, vec![11.0, 15.0, 11.0, 15.0]);
    // dL/dB = Aᵀ · dL/dC
    assert_eq!(grad_b.data, vec![4.0, 4.0, 6.0, 6.0]);
}

#[test]
fn test_add_bias_backprop() {
    let x = WithGrad::new(tensor!([[1.0, 2.0], [3.0, 4.0]]));
    let bias = WithGrad::new(tensor!([10.0, 20.0]));

    let (out, back) = add_bias(&x, &bias);
    assert_eq!(out.data, vec![11.0, 22.0, 13.0, 24.0]);

    let grad_output = tensor!([[1.0, 1.0], [1.0, 1.0]]);
    let (grad_x, grad_bias) = back(&grad_output);
    assert_eq!(grad_x.data, grad_output.data);
    assert_eq!(grad_bias.shape, vec![2]);
    assert_eq!(grad_bias.data, vec![2.0, 2.0]);
}

#[test]
fn test_mse_loss_values() {
    let pred = WithGrad::new(tensor!([1.0, 2.0]));
    let target = tensor!([0.0, 0.0]);

    let (loss, back) = mse_loss(&pred, &target);
    assert_eq!(loss, 2.5);

    let grad = back(1.0);
    assert_eq!(grad.data, vec![1.0, 2.0]);
}

#[test]
fn test_sgd_update_values() {
    let mut w = WithGrad::new(tensor!([1.0, 2.0]));
    w.grad.data = vec![0.5, 0.5];

    sgd(&mut w, 0.5);
    assert_eq!(w.value.data, vec![0.75, 1.75]);
    assert!(w.grad.data.iter().all(|&g| g == 0.0));
}
