use std::fmt;

use accrete_compiler::compile::WorkingMemory;
use accrete_core::{Tuple, Value};
use indexmap::IndexMap;
use serde::Serialize;

/// Identity of an inserted fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FactHandle(u64);

impl FactHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A source match folded into the accumulators.
#[derive(Debug)]
pub(super) struct Matched {
    /// Left tuple extended with the source objects.
    pub(super) tuple: Tuple,
    /// The accumulated fact: the last object of the source match.
    pub(super) fact: Value,
}

/// Accumulation state for one partial match.
///
/// Holds one working memory per accumulator, and the matches folded into
/// them so non-reversible accumulators can be recomputed.
pub struct AccumulateMemory {
    pub(super) contexts: Vec<WorkingMemory>,
    pub(super) matches: IndexMap<FactHandle, Matched>,
}

impl AccumulateMemory {
    /// Handles of the facts currently accumulated, in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = FactHandle> + '_ {
        self.matches.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn contains(&self, handle: FactHandle) -> bool {
        self.matches.contains_key(&handle)
    }
}

impl fmt::Debug for AccumulateMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccumulateMemory")
            .field("contexts", &self.contexts.len())
            .field("matches", &self.matches)
            .finish()
    }
}
