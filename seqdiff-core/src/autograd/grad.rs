// src/autograd/grad.rs

use crate::autograd::var::{Var, VarId, VarSet};
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use std::collections::HashMap;

/// Gradient accumulator for one propagation.
///
/// A `Grad` only holds slots for the variables it was created for; gradient
/// reaching any other variable is discarded. It is threaded explicitly through
/// every `propagate` call, so independent propagations never share state.
#[derive(Debug, Clone, Default)]
pub struct Grad<T: Numeric> {
    slots: HashMap<VarId, Vector<T>>,
}

impl<T: Numeric> Grad<T> {
    /// An accumulator that tracks nothing.
    pub fn new() -> Self {
        Grad {
            slots: HashMap::new(),
        }
    }

    /// An accumulator with a zeroed slot for each of `vars`.
    pub fn for_vars<'a, I>(vars: I) -> Self
    where
        I: IntoIterator<Item = &'a std::sync::Arc<Var<T>>>,
    {
        let mut grad = Grad::new();
        for var in vars {
            grad.track(var.id(), var.value().zeros_like());
        }
        grad
    }

    /// Starts tracking `id` with an initial value (normally zeros).
    /// An existing slot is replaced.
    pub(crate) fn track(&mut self, id: VarId, initial: Vector<T>) {
        self.slots.insert(id, initial);
    }

    /// Stops tracking `id`, returning its accumulated value.
    pub(crate) fn take(&mut self, id: VarId) -> Result<Vector<T>, SeqDiffError> {
        self.slots.remove(&id).ok_or_else(|| {
            SeqDiffError::InternalError(format!("gradient slot {:?} disappeared during propagation", id))
        })
    }

    pub fn get(&self, id: VarId) -> Option<&Vector<T>> {
        self.slots.get(&id)
    }

    /// The gradient accumulated for `var`, if it is tracked.
    pub fn get_var(&self, var: &Var<T>) -> Option<&Vector<T>> {
        self.get(var.id())
    }

    pub fn contains(&self, id: VarId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Whether any variable in `vars` is tracked here.
    pub fn intersects(&self, vars: &VarSet) -> bool {
        if vars.len() < self.slots.len() {
            vars.iter().any(|id| self.slots.contains_key(&id))
        } else {
            self.slots.keys().any(|&id| vars.contains(id))
        }
    }

    /// Adds `contribution` into the slot for `id`. Untracked ids are ignored.
    pub fn accumulate(&mut self, id: VarId, contribution: &Vector<T>) -> Result<(), SeqDiffError> {
        if let Some(slot) = self.slots.get_mut(&id) {
            if slot.len() != contribution.len() {
                return Err(SeqDiffError::GradientAccumulationShapeMismatch {
                    expected: vec![slot.len()],
                    actual: vec![contribution.len()],
                });
            }
            slot.add_assign(contribution)?;
        }
        Ok(())
    }

    /// Multiplies every accumulated gradient by `scaler`.
    pub fn scale(&mut self, scaler: T) {
        for slot in self.slots.values_mut() {
            slot.scale_inplace(scaler);
        }
    }

    /// Resets every slot to zero, keeping the tracked set.
    pub fn clear(&mut self) {
        for slot in self.slots.values_mut() {
            *slot = slot.zeros_like();
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Vector<T>)> {
        self.slots.iter().map(|(&id, v)| (id, v))
    }
}

#[cfg(test)]
#[path = "grad_test.rs"]
mod tests;
