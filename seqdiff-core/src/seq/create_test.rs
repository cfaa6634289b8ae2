// src/seq/create_test.rs

use super::*;
use crate::autograd::Var;
use crate::utils::testing::check_vector_near;

#[test]
fn test_const_seq_from_lanes_packs_present_lanes() -> Result<(), SeqDiffError> {
    let lanes = vec![
        vec![Vector::<f64>::from_f64(&[1.0, 2.0]), Vector::from_f64(&[3.0, 4.0])],
        vec![Vector::from_f64(&[5.0, 6.0])],
        vec![
            Vector::from_f64(&[7.0, 8.0]),
            Vector::from_f64(&[9.0, 10.0]),
            Vector::from_f64(&[11.0, 12.0]),
        ],
    ];
    let seq = const_seq_from_lanes(&lanes)?;
    let out = seq.output();
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].present, vec![true, true, true]);
    assert_eq!(out[1].present, vec![true, false, true]);
    assert_eq!(out[2].present, vec![false, false, true]);
    check_vector_near(&out[0].packed, &[1.0, 2.0, 5.0, 6.0, 7.0, 8.0], 0.0);
    check_vector_near(&out[1].packed, &[3.0, 4.0, 9.0, 10.0], 0.0);
    check_vector_near(&out[2].packed, &[11.0, 12.0], 0.0);
    assert!(seq.vars().is_empty());
    Ok(())
}

#[test]
fn test_const_seq_from_lanes_width_mismatch() {
    let lanes = vec![
        vec![Vector::<f64>::from_f64(&[1.0, 2.0])],
        vec![Vector::<f64>::from_f64(&[3.0])],
    ];
    assert!(matches!(
        const_seq_from_lanes(&lanes),
        Err(SeqDiffError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_const_seq_from_no_lanes_is_empty() -> Result<(), SeqDiffError> {
    let seq = const_seq_from_lanes::<f64>(&[])?;
    assert!(seq.output().is_empty());
    Ok(())
}

#[test]
fn test_res_seq_propagates_per_timestep() -> Result<(), SeqDiffError> {
    let v0 = Var::<f64>::from_f64(&[1.0, 2.0]);
    let v1 = Var::<f64>::from_f64(&[3.0]);
    let seq = res_seq(vec![
        ResBatch {
            packed: v0.as_node(),
            present: vec![true, true],
        },
        ResBatch {
            packed: v1.as_node(),
            present: vec![true, false],
        },
    ])?;
    assert_eq!(seq.vars().len(), 2);

    let mut grad = Grad::for_vars([&v0, &v1]);
    seq.propagate(vec![Vector::from_f64(&[0.5, -1.0]), Vector::from_f64(&[2.0])], &mut grad)?;
    check_vector_near(grad.get_var(&v0).unwrap(), &[0.5, -1.0], 0.0);
    check_vector_near(grad.get_var(&v1).unwrap(), &[2.0], 0.0);
    Ok(())
}

#[test]
fn test_res_seq_rejects_reappearing_lane() {
    let v0 = Var::<f64>::from_f64(&[1.0]);
    let v1 = Var::<f64>::from_f64(&[2.0, 3.0]);
    let result = res_seq(vec![
        ResBatch {
            packed: v0.as_node(),
            present: vec![false, true],
        },
        ResBatch {
            packed: v1.as_node(),
            present: vec![true, true],
        },
    ]);
    assert!(matches!(result, Err(SeqDiffError::InvalidSequence(_))));
}

#[test]
fn test_const_seq_rejects_unevenly_packed_batch() {
    let uneven = Batch {
        packed: Vector::<f64>::from_f64(&[1.0]),
        present: vec![true, true],
    };
    assert!(matches!(
        const_seq(vec![uneven]),
        Err(SeqDiffError::InvalidSequence(_))
    ));
}

#[test]
fn test_const_seq_rejects_batch_without_present_lanes() {
    let first = Batch::new(Vector::<f64>::from_f64(&[1.0, 2.0]), vec![true, false]).unwrap();
    let empty = Batch {
        packed: Vector::<f64>::from_f64(&[]),
        present: vec![false, false],
    };
    assert!(matches!(
        const_seq(vec![first, empty]),
        Err(SeqDiffError::InvalidSequence(_))
    ));
}
