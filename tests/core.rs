use approx::assert_abs_diff_eq;
use bernoulli_jsd::backend::{Backend, set_backend};
use bernoulli_jsd::backprop;
use bernoulli_jsd::stability::entropy;
use bernoulli_jsd::tensors::{Tensor, WithGrad};
use bernoulli_jsd::{
    Error, OperatorRegistry, TensorFloat, bernoulli_jsd, bernoulli_jsd_gradient,
    bernoulli_jsd_gradient_into, bernoulli_jsd_into,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_identical_halves_have_zero_divergence() {
    init();
    assert_eq!(bernoulli_jsd(&[0.5], &[0.5]).unwrap(), vec![0.0]);
}

#[test]
fn test_opposite_point_masses_reach_ln_two() {
    init();
    let out = bernoulli_jsd(&[1e-25], &[1.0 - 1e-25]).unwrap();
    assert_eq!(out.len(), 1);
    assert_abs_diff_eq!(out[0], entropy(0.5), epsilon = 1e-6);
    assert_abs_diff_eq!(out[0], 0.693_147, epsilon = 1e-5);
}

#[test]
fn test_backward_is_zero_for_equal_inputs() {
    init();
    assert_eq!(bernoulli_jsd_gradient(&[1.0], &[0.5], &[0.5]).unwrap(), vec![0.0]);
}

#[test]
fn test_length_mismatch_writes_nothing() {
    init();
    let mut out = [-1.0; 3];
    let err = bernoulli_jsd_into(&[0.1, 0.2, 0.3], &[0.4, 0.5], &mut out).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { expected: 3, got: 2, .. }));
    assert_eq!(out, [-1.0; 3]);

    let mut grad = [-1.0; 3];
    let err =
        bernoulli_jsd_gradient_into(&[1.0, 1.0, 1.0], &[0.1, 0.2, 0.3], &[0.4, 0.5], &mut grad)
            .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
    assert_eq!(grad, [-1.0; 3]);

    assert!(bernoulli_jsd(&[0.1, 0.2, 0.3], &[0.4, 0.5]).is_err());
}

#[test]
fn test_known_values() {
    init();
    let out = bernoulli_jsd(&[0.1, 0.2], &[0.9, 0.4]).unwrap();
    // H(0.5) - H(0.1)
    assert_abs_diff_eq!(out[0], 0.693_147 - 0.325_083, epsilon = 1e-5);
    // H(0.3) - (H(0.2) + H(0.4)) / 2
    assert_abs_diff_eq!(out[1], 0.610_864 - (0.500_402 + 0.673_012) / 2.0, epsilon = 1e-5);

    let grad = bernoulli_jsd_gradient(&[2.0], &[0.1], &[0.9]).unwrap();
    // 2 * (logit(0.1) - logit(0.5)) / 2 = ln(1/9)
    assert_abs_diff_eq!(grad[0], (1.0 as TensorFloat / 9.0).ln(), epsilon = 1e-5);
}

#[test]
fn test_gradient_matches_finite_difference() {
    init();
    let x = [0.2, 0.35, 0.6, 0.05];
    let t = [0.7, 0.1, 0.55, 0.5];
    let grad = bernoulli_jsd_gradient(&[1.0; 4], &x, &t).unwrap();

    let h = 1e-3;
    for i in 0..x.len() {
        let plus = bernoulli_jsd(&[x[i] + h], &[t[i]]).unwrap()[0];
        let minus = bernoulli_jsd(&[x[i] - h], &[t[i]]).unwrap()[0];
        let numeric = (plus - minus) / (2.0 * h);
        assert_abs_diff_eq!(grad[i], numeric, epsilon = 2e-3);
    }
}

#[test]
fn test_out_of_range_probabilities_stay_finite() {
    init();
    let x = [-0.5, 0.0, 1.0, 1.5, 3.0];
    let t = [0.5, 1.0, 0.0, -2.0, 0.25];
    let out = bernoulli_jsd(&x, &t).unwrap();
    let grad = bernoulli_jsd_gradient(&[1.0; 5], &x, &t).unwrap();
    assert!(out.iter().all(|v| v.is_finite()));
    assert!(grad.iter().all(|v| v.is_finite()));
}

#[test]
fn test_backends_agree() {
    init();
    let x: Vec<TensorFloat> = (0..10_000).map(|i| i as TensorFloat / 10_000.0).collect();
    let t: Vec<TensorFloat> = x.iter().rev().copied().collect();
    let go: Vec<TensorFloat> = (0..10_000).map(|i| ((i % 5) as TensorFloat) - 2.0).collect();

    set_backend(Backend::Sequential);
    let seq_out = bernoulli_jsd(&x, &t).unwrap();
    let seq_grad = bernoulli_jsd_gradient(&go, &x, &t).unwrap();
    set_backend(Backend::Cpu);
    let par_out = bernoulli_jsd(&x, &t).unwrap();
    let par_grad = bernoulli_jsd_gradient(&go, &x, &t).unwrap();

    assert_eq!(seq_out, par_out);
    assert_eq!(seq_grad, par_grad);
}

#[test]
fn test_registry_round_trip_through_gradient_def() {
    init();
    let registry = OperatorRegistry::default();
    let x: &[TensorFloat] = &[0.1, 0.8, 0.5];
    let t: &[TensorFloat] = &[0.9, 0.3, 0.5];

    let mut loss = [0.0; 3];
    registry.run("BernoulliJSD", &[x, t], &mut loss).unwrap();
    assert_eq!(loss.to_vec(), bernoulli_jsd(x, t).unwrap());

    let grads = registry
        .run_gradient("BernoulliJSD", &[x, t], &[&[1.0, 1.0, 1.0]])
        .unwrap();
    assert_eq!(grads[0].as_deref(), Some(&bernoulli_jsd_gradient(&[1.0; 3], x, t).unwrap()[..]));
    assert_eq!(grads[1], None);

    let schema = &registry.get("BernoulliJSD").unwrap().schema;
    assert_eq!(schema.inputs, &["X", "T"]);
    assert_eq!(schema.outputs, &["L"]);
    assert!(schema.doc.contains("Jensen-Shannon"));
}

#[test]
fn test_tensor_backprop_accumulates_into_prediction() {
    init();
    let mut pred = WithGrad::new(Tensor::new(vec![2, 2], vec![0.1, 0.4, 0.6, 0.9]));
    let target = Tensor::new(vec![4], vec![0.9, 0.4, 0.2, 0.9]);

    let grad = {
        let (out, back) = backprop::bernoulli_jsd(&pred, &target).unwrap();
        assert_eq!(out.shape, vec![2, 2]);
        assert_eq!(out.data[1], 0.0);
        assert_eq!(out.data[3], 0.0);
        back(&Tensor::new(vec![2, 2], vec![1.0; 4])).unwrap()
    };

    pred.accumulate(&grad).unwrap();
    assert!(pred.grad.data[0] < 0.0);
    assert_eq!(pred.grad.data[1], 0.0);
    assert!(pred.grad.data[2] > 0.0);
    assert_eq!(pred.grad.data[3], 0.0);
}
