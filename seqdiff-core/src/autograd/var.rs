// src/autograd/var.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, Node, Res};
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`Var`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

impl VarId {
    pub(crate) fn fresh() -> Self {
        VarId(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The set of variables a node (or sequence) depends on.
///
/// Propagation uses it to skip inputs that cannot reach any variable the
/// caller asked a gradient for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarSet {
    ids: HashSet<VarId>,
}

impl VarSet {
    pub fn new() -> Self {
        VarSet::default()
    }

    pub fn single(id: VarId) -> Self {
        let mut ids = HashSet::with_capacity(1);
        ids.insert(id);
        VarSet { ids }
    }

    /// Union of several sets.
    pub fn merge<'a, I>(sets: I) -> Self
    where
        I: IntoIterator<Item = &'a VarSet>,
    {
        let mut ids = HashSet::new();
        for set in sets {
            ids.extend(set.ids.iter().copied());
        }
        VarSet { ids }
    }

    pub fn insert(&mut self, id: VarId) {
        self.ids.insert(id);
    }

    pub fn remove(&mut self, id: VarId) {
        self.ids.remove(&id);
    }

    pub fn contains(&self, id: VarId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = VarId> + '_ {
        self.ids.iter().copied()
    }
}

/// A leaf of the graph and a target of differentiation.
///
/// Propagating into a `Var` adds the incoming gradient to the accumulator
/// slot keyed by its [`VarId`], if the accumulator tracks it. The value can be
/// replaced between graph constructions (gradient checking perturbs it);
/// graphs already built keep the snapshot they were created from.
pub struct Var<T: Numeric> {
    id: VarId,
    value: RwLock<Vector<T>>,
    vars: VarSet,
}

impl<T: Numeric> Debug for Var<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Var")
            .field("id", &self.id)
            .field("len", &self.value().len())
            .finish()
    }
}

impl<T: Numeric> Var<T> {
    /// Creates a new variable with a fresh identity.
    pub fn new(value: Vector<T>) -> Arc<Self> {
        let id = VarId::fresh();
        Arc::new(Var {
            id,
            value: RwLock::new(value),
            vars: VarSet::single(id),
        })
    }

    /// Creates a variable from literal values.
    pub fn from_f64(values: &[f64]) -> Arc<Self> {
        Var::new(Vector::from_f64(values))
    }

    pub fn id(&self) -> VarId {
        self.id
    }

    /// Returns a snapshot of the current value.
    pub fn value(&self) -> Vector<T> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the value. The length may not change.
    pub fn set_value(&self, value: Vector<T>) -> Result<(), SeqDiffError> {
        let mut guard = self.value.write().unwrap_or_else(PoisonError::into_inner);
        if guard.len() != value.len() {
            return Err(SeqDiffError::length_mismatch(guard.len(), value.len(), "Var::set_value"));
        }
        *guard = value;
        Ok(())
    }

    /// Overwrites one element of the value.
    pub fn set_element(&self, index: usize, value: T) -> Result<(), SeqDiffError> {
        self.value
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(index, value)
    }

    /// This variable as a graph node.
    pub fn as_node(self: &Arc<Self>) -> Node<T> {
        self.clone()
    }
}

impl<T: Numeric> Res<T> for Var<T> {
    fn output(&self) -> Vector<T> {
        self.value()
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.value().len(), "var")?;
        grad.accumulate(self.id, &upstream)
    }
}

#[cfg(test)]
#[path = "var_test.rs"]
mod tests;
