mod common;

use common::{random_var, setup_logger};
use seqdiff_core::autograd::grad_check::{check_seq_grad, GradCheckConfig};
use seqdiff_core::autograd::Grad;
use seqdiff_core::ops::{matmul_op, mul_op, scale_repeated_op, tanh_op, Matrix};
use seqdiff_core::seq::{const_seq_from_lanes, map, map_n, pool, sum_each, tail};
use seqdiff_core::utils::testing::{check_vector_near, random_seq};
use seqdiff_core::{backward, gradients, SeqDiffError, SeqRef, Vector};

fn lanes_of(lengths: &[usize], width: usize) -> Vec<Vec<Vector<f64>>> {
    lengths
        .iter()
        .map(|&len| (0..len).map(|_| seqdiff_core::vector::randn(width)).collect())
        .collect()
}

/// `tanh(x W)` at every timestep, with `x` read as `n x 3`.
fn project(seq: &SeqRef<f64>, w: &Matrix<f64>) -> Result<SeqRef<f64>, SeqDiffError> {
    map(seq, |v, n| {
        let x = Matrix::new(v, n, 3)?;
        tanh_op(&matmul_op(false, false, &x, w)?.data)
    })
}

#[test]
fn test_padding_does_not_contaminate_lanes() -> Result<(), SeqDiffError> {
    setup_logger();
    let lanes = lanes_of(&[4, 1, 3, 2], 3);
    let w_var = random_var(6);
    let w = Matrix::from_var(&w_var, 3, 2)?;

    let batched = sum_each(&project(&const_seq_from_lanes(&lanes)?, &w)?)?;
    let batched_out = batched.output();
    let batched_grad = gradients(&batched, &[w_var.clone()])?;

    let mut summed_grad = vec![0.0; 6];
    for (l, lane) in lanes.iter().enumerate() {
        let single = sum_each(&project(&const_seq_from_lanes(&[lane.clone()])?, &w)?)?;
        check_vector_near(
            &single.output(),
            &batched_out.as_slice()[l * 2..(l + 1) * 2],
            1e-12,
        );
        let grad = gradients(&single, &[w_var.clone()])?;
        for (acc, g) in summed_grad.iter_mut().zip(grad.get_var(&w_var).unwrap().as_slice()) {
            *acc += g;
        }
    }
    check_vector_near(batched_grad.get_var(&w_var).unwrap(), &summed_grad, 1e-12);
    Ok(())
}

#[test]
fn test_ended_lane_isolated_from_later_timesteps() -> Result<(), SeqDiffError> {
    setup_logger();
    // Lane 1 ends after the first timestep; its gradient must come only from there.
    let steps = random_seq::<f64>(&[3, 1], 2);
    let vars = &steps.vars;
    let last = tail(&map(&steps.seq()?, |v, _| tanh_op(&v))?)?;
    let mut grad = Grad::for_vars(vars);
    backward(&last, Vector::from_f64(&[0.0, 0.0, 1.0, 1.0]), &mut grad)?;

    let first = grad.get_var(&vars[0]).unwrap().as_slice();
    assert_eq!(&first[..2], &[0.0, 0.0]);
    assert!(first[2] != 0.0 && first[3] != 0.0);
    for var in &vars[1..] {
        assert!(grad.get_var(var).unwrap().as_slice().iter().all(|&g| g == 0.0));
    }
    Ok(())
}

#[test]
fn test_recurrent_summary_grad_check() {
    setup_logger();
    // A per-timestep summary is combined with the original input and the
    // result is shared by two consumers.
    let steps = random_seq::<f64>(&[3, 2, 2, 1], 4);
    let w_var = random_var(8);
    let c_var = random_var(8);
    let mut vars = steps.vars.clone();
    vars.push(w_var.clone());
    vars.push(c_var.clone());

    check_seq_grad(
        || {
            let w = Matrix::from_var(&w_var, 4, 2)?;
            let c = Matrix::from_var(&c_var, 2, 4)?;
            let seq = steps.seq()?;
            // 2 x n summary per timestep, repeated across the n x 4 input.
            let summary = map(&seq, |v, n| {
                let x = Matrix::new(tanh_op(&v)?, n, 4)?;
                Ok(matmul_op(true, true, &w, &x)?.data)
            })?;
            let combined = map_n(|_, v| scale_repeated_op(&v[1], &v[0]), &[summary, seq.clone()])?;
            let gated = pool(&combined, |s| map_n(|_, v| mul_op(&v[0], &v[1]), &[s.clone(), s]))?;
            map(&gated, |v, n| {
                let x = Matrix::new(v, n, 4)?;
                Ok(matmul_op(false, true, &x, &c)?.data)
            })
        },
        &vars,
        &GradCheckConfig::default(),
    )
    .unwrap_or_else(|e| panic!("recurrent summary grad check failed: {}", e));
}

#[test]
fn test_map_n_rejects_misaligned_masks() -> Result<(), SeqDiffError> {
    let a = const_seq_from_lanes(&lanes_of(&[2, 2], 3))?;
    let b = const_seq_from_lanes(&lanes_of(&[2, 1], 3))?;
    let result = map_n(|_, v| mul_op(&v[0], &v[1]), &[a, b]);
    assert!(matches!(result, Err(SeqDiffError::MisalignedSequences { .. })));
    Ok(())
}
