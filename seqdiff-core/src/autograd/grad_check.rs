// src/autograd/grad_check.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{backward, Node};
use crate::autograd::var::Var;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::seq::SeqRef;
use crate::vector::Vector;
use log::debug;
use std::sync::Arc;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for variable {var_index}, element {element_index}: analytic {analytic:?} != numeric {numeric:?} (difference {difference:?})")]
    GradientMismatch {
        var_index: usize,
        element_index: usize,
        analytic: f64,
        numeric: f64,
        difference: f64,
    },
    #[error("Forward function failed during gradient check: {0}")]
    ForwardPassError(SeqDiffError),
    #[error("Backward pass failed during gradient check: {0}")]
    BackwardPassError(SeqDiffError),
    #[error("Engine error during gradient check: {0}")]
    EngineError(SeqDiffError),
    #[error("Variable {var_index} has no gradient after the backward pass")]
    MissingAnalyticalGrad { var_index: usize },
    #[error("Numerical gradient is NaN or infinite for variable {var_index}, element {element_index} (loss+ {loss_plus:?}, loss- {loss_minus:?})")]
    NumericalGradNaNOrInfinite {
        var_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is NaN or infinite for variable {var_index}, element {element_index}: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        var_index: usize,
        element_index: usize,
        value: f64,
    },
    #[error("Output structure changed under perturbation: expected lengths {expected:?}, got {actual:?}")]
    StructureChanged {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

impl From<SeqDiffError> for GradCheckError {
    fn from(err: SeqDiffError) -> Self {
        GradCheckError::EngineError(err)
    }
}

/// How the upstream gradient of a check is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamPolicy {
    /// Every upstream element is one: checks the gradient of `sum(output)`.
    Ones,
    /// Standard normal upstream, so that errors which cancel under a sum
    /// still show up.
    Random,
}

/// Options for [`check_res_grad`] and [`check_seq_grad`].
#[derive(Debug, Clone, PartialEq)]
pub struct GradCheckConfig {
    /// Half-width of the centered difference.
    pub delta: f64,
    /// Accepted error, relative to `1 + max(|analytic|, |numeric|)`.
    pub tolerance: f64,
    pub upstream: UpstreamPolicy,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        GradCheckConfig {
            delta: 1e-5,
            tolerance: 1e-4,
            upstream: UpstreamPolicy::Random,
        }
    }
}

fn make_upstream<T: Numeric>(lens: &[usize], policy: UpstreamPolicy) -> Vec<Vector<T>> {
    lens.iter()
        .map(|&len| match policy {
            UpstreamPolicy::Ones => Vector::ones(len),
            UpstreamPolicy::Random => crate::vector::randn(len),
        })
        .collect()
}

/// `sum_t dot(outputs[t], upstream[t])`, computed in `f64`.
fn weighted_loss<T: Numeric>(outputs: &[Vector<T>], upstream: &[Vector<T>]) -> Result<f64, GradCheckError> {
    let actual: Vec<usize> = outputs.iter().map(Vector::len).collect();
    let expected: Vec<usize> = upstream.iter().map(Vector::len).collect();
    if actual != expected {
        return Err(GradCheckError::StructureChanged { expected, actual });
    }
    let mut total = 0.0;
    for (out, up) in outputs.iter().zip(upstream) {
        total += out.dot(up)?.as_f64();
    }
    Ok(total)
}

/// Evaluates the loss with one element of `var` perturbed, restoring the
/// element before returning, even on failure.
fn perturbed_loss<T, E>(
    evaluate: &E,
    upstream: &[Vector<T>],
    var: &Var<T>,
    index: usize,
    value: f64,
    original: T,
) -> Result<f64, GradCheckError>
where
    T: Numeric,
    E: Fn() -> Result<Vec<Vector<T>>, SeqDiffError>,
{
    var.set_element(index, T::of(value))?;
    let loss = evaluate()
        .map_err(GradCheckError::ForwardPassError)
        .and_then(|outputs| weighted_loss(&outputs, upstream));
    var.set_element(index, original)?;
    loss
}

fn compare_gradients<T, E>(
    evaluate: E,
    analytic: &Grad<T>,
    upstream: &[Vector<T>],
    vars: &[Arc<Var<T>>],
    config: &GradCheckConfig,
) -> Result<(), GradCheckError>
where
    T: Numeric,
    E: Fn() -> Result<Vec<Vector<T>>, SeqDiffError>,
{
    for (var_index, var) in vars.iter().enumerate() {
        let analytic_grad = analytic
            .get_var(var)
            .ok_or(GradCheckError::MissingAnalyticalGrad { var_index })?;
        let value = var.value();
        debug!("grad check: variable {} ({} elements)", var_index, value.len());

        for (element_index, &original) in value.as_slice().iter().enumerate() {
            let x = original.as_f64();
            let loss_plus = perturbed_loss(&evaluate, upstream, var, element_index, x + config.delta, original)?;
            let loss_minus = perturbed_loss(&evaluate, upstream, var, element_index, x - config.delta, original)?;
            let numeric = (loss_plus - loss_minus) / (2.0 * config.delta);
            if !numeric.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    var_index,
                    element_index,
                    loss_plus,
                    loss_minus,
                });
            }

            let analytic_value = analytic_grad.as_slice()[element_index].as_f64();
            if !analytic_value.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    var_index,
                    element_index,
                    value: analytic_value,
                });
            }

            let difference = (analytic_value - numeric).abs();
            let scale = 1.0 + analytic_value.abs().max(numeric.abs());
            if difference > config.tolerance * scale {
                return Err(GradCheckError::GradientMismatch {
                    var_index,
                    element_index,
                    analytic: analytic_value,
                    numeric,
                    difference,
                });
            }
        }
    }
    Ok(())
}

/// Checks the gradients propagated by the node `f` builds against centered
/// finite differences.
///
/// `f` is called once for the analytic pass and twice per element of every
/// variable in `vars`, each time after that element has been perturbed, so
/// it must rebuild the graph from the variables' current values.
///
/// # Errors
/// `GradientMismatch` for the first element outside tolerance, or the error
/// raised while building or propagating the graph.
pub fn check_res_grad<T, F>(f: F, vars: &[Arc<Var<T>>], config: &GradCheckConfig) -> Result<(), GradCheckError>
where
    T: Numeric,
    F: Fn() -> Result<Node<T>, SeqDiffError>,
{
    let root = f().map_err(GradCheckError::ForwardPassError)?;
    let upstream = make_upstream::<T>(&[root.output().len()], config.upstream);

    let mut grad = Grad::for_vars(vars);
    backward(&root, upstream[0].clone(), &mut grad).map_err(GradCheckError::BackwardPassError)?;

    compare_gradients(|| Ok(vec![f()?.output()]), &grad, &upstream, vars, config)
}

/// Sequence counterpart of [`check_res_grad`]: the loss is the sum over
/// timesteps of the packed outputs weighted by the upstream.
///
/// Sequence batches hold the values their steps had when the sequence was
/// built, so `f` must build the input sequence itself from `vars` (e.g. with
/// [`res_seq`](crate::seq::res_seq)) rather than capture one built earlier.
pub fn check_seq_grad<T, F>(f: F, vars: &[Arc<Var<T>>], config: &GradCheckConfig) -> Result<(), GradCheckError>
where
    T: Numeric,
    F: Fn() -> Result<SeqRef<T>, SeqDiffError>,
{
    let seq = f().map_err(GradCheckError::ForwardPassError)?;
    let lens: Vec<usize> = seq.output().iter().map(|b| b.packed.len()).collect();
    let upstream = make_upstream::<T>(&lens, config.upstream);

    let mut grad = Grad::for_vars(vars);
    seq.propagate(upstream.clone(), &mut grad)
        .map_err(GradCheckError::BackwardPassError)?;

    compare_gradients(
        || Ok(f()?.output().iter().map(|b| b.packed.clone()).collect()),
        &grad,
        &upstream,
        vars,
        config,
    )
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
