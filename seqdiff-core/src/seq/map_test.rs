// src/seq/map_test.rs

use super::*;
use crate::autograd::grad_check::{check_seq_grad, GradCheckConfig};
use crate::ops::{matmul_op, scale_repeated_op, tanh_op, Matrix};
use crate::seq::const_seq_from_lanes;
use crate::utils::testing::random_seq;

const LANES: [usize; 3] = [3, 1, 2];

#[test]
fn test_map_keeps_masks() -> Result<(), SeqDiffError> {
    let seq = random_seq::<f64>(&LANES, 6).seq()?;
    let mapped = map(&seq, |v, _| tanh_op(&v))?;
    assert_eq!(mapped.output().len(), seq.output().len());
    for (a, b) in mapped.output().iter().zip(seq.output()) {
        assert_eq!(a.present, b.present);
        assert_eq!(a.packed.len(), b.packed.len());
    }
    assert_eq!(mapped.vars(), seq.vars());
    Ok(())
}

#[test]
fn test_map_passes_present_count() -> Result<(), SeqDiffError> {
    let seq = random_seq::<f64>(&LANES, 2).seq()?;
    let mut counts = Vec::new();
    map(&seq, |v, n| {
        counts.push(n);
        Ok(v)
    })?;
    assert_eq!(counts, vec![3, 2, 1]);
    Ok(())
}

#[test]
fn test_map_same_size_grad_check() -> Result<(), SeqDiffError> {
    let steps = random_seq::<f64>(&LANES, 6);
    check_seq_grad(
        || map(&steps.seq()?, |v, _| tanh_op(&v)),
        &steps.vars,
        &GradCheckConfig::default(),
    )
        .unwrap_or_else(|e| panic!("map grad check failed: {}", e));
    Ok(())
}

#[test]
fn test_map_different_size_grad_check() -> Result<(), SeqDiffError> {
    let steps = random_seq::<f64>(&LANES, 6);
    let comb = Var::new(crate::vector::randn::<f64>(6));
    let mut vars = steps.vars.clone();
    vars.insert(0, comb.clone());
    check_seq_grad(
        || {
            let combiner = Matrix::from_var(&comb, 6, 1)?;
            map(&steps.seq()?, |v, n| {
                let m = Matrix::new(tanh_op(&v)?, n, 6)?;
                Ok(matmul_op(false, false, &m, &combiner)?.data)
            })
        },
        &vars,
        &GradCheckConfig::default(),
    )
    .unwrap_or_else(|e| panic!("map grad check failed: {}", e));
    Ok(())
}

#[test]
fn test_map_rejects_lane_splitting_output() -> Result<(), SeqDiffError> {
    let seq = random_seq::<f64>(&LANES, 2).seq()?;
    // One value per timestep cannot be split across three present lanes.
    let result = map(&seq, |v, _| crate::ops::sum_op(&v));
    assert!(matches!(result, Err(SeqDiffError::InvalidSequence(_))));
    Ok(())
}

#[test]
fn test_map_n_combines_stages_grad_check() -> Result<(), SeqDiffError> {
    let steps = random_seq::<f64>(&LANES, 6);
    let comb = Var::new(crate::vector::randn::<f64>(12));
    let mut vars = steps.vars.clone();
    vars.push(comb.clone());
    check_seq_grad(
        || {
            let combiner = Matrix::from_var(&comb, 2, 6)?;
            let seq = steps.seq()?;
            let reduced = map(&seq, |v, n| {
                let m = Matrix::new(tanh_op(&v)?, n, 6)?;
                Ok(matmul_op(false, true, &combiner, &m)?.data)
            })?;
            map_n(|_, v| scale_repeated_op(&v[1], &v[0]), &[reduced, seq.clone()])
        },
        &vars,
        &GradCheckConfig::default(),
    )
    .unwrap_or_else(|e| panic!("map_n grad check failed: {}", e));
    Ok(())
}

#[test]
fn test_map_n_rejects_mismatched_masks() -> Result<(), SeqDiffError> {
    let a = random_seq::<f64>(&[2, 1], 3).seq()?;
    let b = random_seq::<f64>(&[1, 2], 3).seq()?;
    assert_eq!(a.output().len(), b.output().len());
    let result = map_n(|_, v| Ok(v[0].clone()), &[a, b]);
    assert!(matches!(result, Err(SeqDiffError::MisalignedSequences { .. })));
    Ok(())
}

#[test]
fn test_map_n_rejects_mismatched_lengths() -> Result<(), SeqDiffError> {
    let a = random_seq::<f64>(&[2, 2], 3).seq()?;
    let b = random_seq::<f64>(&[3, 3], 3).seq()?;
    let result = map_n(|_, v| Ok(v[0].clone()), &[a, b]);
    assert!(matches!(result, Err(SeqDiffError::MisalignedSequences { .. })));
    Ok(())
}

#[test]
fn test_map_n_rejects_empty_input() {
    let result = map_n::<f64, _>(|_, v| Ok(v[0].clone()), &[]);
    assert!(matches!(result, Err(SeqDiffError::InvalidSequence(_))));
}

#[test]
fn test_map_over_constant_sequence() -> Result<(), SeqDiffError> {
    let seq = const_seq_from_lanes(&[vec![Vector::<f64>::from_f64(&[0.0, 1.0])]])?;
    let w = Var::<f64>::from_f64(&[2.0, 3.0]);
    let wn = w.as_node();
    let mapped = map(&seq, |v, _| crate::ops::mul_op(&v, &wn))?;
    let mut grad = Grad::for_vars([&w]);
    mapped.propagate(vec![Vector::from_f64(&[1.0, 1.0])], &mut grad)?;
    assert_eq!(grad.get_var(&w).unwrap().to_f64_vec(), vec![0.0, 1.0]);
    assert_eq!(grad.len(), 1);
    Ok(())
}
