// src/autograd/grad_check_test.rs

use super::*;
use crate::autograd::res::Res;
use crate::autograd::var::VarSet;
use crate::ops::{mul_op, tanh_op};

/// Doubles its input but propagates the upstream unchanged.
#[derive(Debug)]
struct WrongDouble {
    input: Node<f64>,
    out: Vector<f64>,
}

impl Res<f64> for WrongDouble {
    fn output(&self) -> Vector<f64> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        self.input.vars()
    }

    fn propagate(&self, upstream: Vector<f64>, grad: &mut Grad<f64>) -> Result<(), SeqDiffError> {
        self.input.propagate(upstream, grad)
    }
}

#[test]
fn test_correct_gradient_passes() {
    let x = Var::<f64>::from_f64(&[0.3, -0.7, 1.1]);
    let node = x.as_node();
    let result = check_res_grad(
        || mul_op(&tanh_op(&node)?, &node),
        &[x.clone()],
        &GradCheckConfig::default(),
    );
    assert_eq!(result, Ok(()));
}

#[test]
fn test_wrong_gradient_is_reported() {
    let x = Var::<f64>::from_f64(&[0.5, 2.0]);
    let node = x.as_node();
    let config = GradCheckConfig {
        upstream: UpstreamPolicy::Ones,
        ..GradCheckConfig::default()
    };
    let result = check_res_grad(
        || -> Result<Node<f64>, SeqDiffError> {
            Ok(Arc::new(WrongDouble {
                input: node.clone(),
                out: node.output().scale(2.0),
            }))
        },
        &[x.clone()],
        &config,
    );
    match result {
        Err(GradCheckError::GradientMismatch {
            var_index,
            element_index,
            analytic,
            numeric,
            ..
        }) => {
            assert_eq!((var_index, element_index), (0, 0));
            approx::assert_abs_diff_eq!(analytic, 1.0, epsilon = 1e-12);
            approx::assert_abs_diff_eq!(numeric, 2.0, epsilon = 1e-6);
        }
        other => panic!("expected a gradient mismatch, got {:?}", other),
    }
}

#[test]
fn test_variable_restored_after_check() {
    let x = Var::<f64>::from_f64(&[0.25, -1.5]);
    let node = x.as_node();
    check_res_grad(|| tanh_op(&node), &[x.clone()], &GradCheckConfig::default())
        .unwrap_or_else(|e| panic!("tanh grad check failed: {}", e));
    assert_eq!(x.value().to_f64_vec(), vec![0.25, -1.5]);
}

#[test]
fn test_forward_error_is_wrapped() {
    let x = Var::<f64>::from_f64(&[1.0]);
    let result = check_res_grad(
        || -> Result<Node<f64>, SeqDiffError> { Err(SeqDiffError::EmptyBatch) },
        &[x],
        &GradCheckConfig::default(),
    );
    assert_eq!(result, Err(GradCheckError::ForwardPassError(SeqDiffError::EmptyBatch)));
}

#[test]
fn test_default_config() {
    let config = GradCheckConfig::default();
    assert_eq!(config.delta, 1e-5);
    assert_eq!(config.tolerance, 1e-4);
    assert_eq!(config.upstream, UpstreamPolicy::Random);
}

fn two_step_seq(steps: &[Arc<Var<f64>>]) -> Result<SeqRef<f64>, SeqDiffError> {
    crate::seq::res_seq(vec![
        crate::seq::ResBatch {
            packed: steps[0].as_node(),
            present: vec![true, true],
        },
        crate::seq::ResBatch {
            packed: steps[1].as_node(),
            present: vec![true, false],
        },
    ])
}

#[test]
fn test_seq_check_rebuilt_from_vars_passes() {
    let steps = vec![
        Var::<f64>::from_f64(&[0.2, -0.4, 0.9, 1.3]),
        Var::<f64>::from_f64(&[-0.8, 0.5]),
    ];
    let result = check_seq_grad(
        || crate::seq::map(&two_step_seq(&steps)?, |v, _| tanh_op(&v)),
        &steps,
        &GradCheckConfig::default(),
    );
    assert_eq!(result, Ok(()));
}

#[test]
fn test_seq_check_detects_captured_sequence() {
    // A sequence built outside `f` does not see perturbations of its steps.
    let steps = vec![
        Var::<f64>::from_f64(&[0.2, -0.4, 0.9, 1.3]),
        Var::<f64>::from_f64(&[-0.8, 0.5]),
    ];
    let captured = two_step_seq(&steps).unwrap();
    let config = GradCheckConfig {
        upstream: UpstreamPolicy::Ones,
        ..Default::default()
    };
    let result = check_seq_grad(|| crate::seq::map(&captured, |v, _| tanh_op(&v)), &steps, &config);
    assert!(matches!(
        result,
        Err(GradCheckError::GradientMismatch { var_index: 0, element_index: 0, .. })
    ));
}
