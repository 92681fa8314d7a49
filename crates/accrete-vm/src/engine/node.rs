use accrete_compiler::compile::{AccumulateError, WorkingMemory};
use accrete_compiler::{Accumulate, AccumulateKind};
use accrete_core::{Tuple, Value};
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::error::RuntimeError;
use super::memory::{AccumulateMemory, FactHandle, Matched};

fn failed(index: usize) -> impl FnOnce(AccumulateError) -> RuntimeError {
    move |source| RuntimeError::Accumulate { index, source }
}

/// Evaluates a built [`Accumulate`] for partial matches of its rule.
#[derive(Debug)]
pub struct AccumulateNode {
    accumulate: Accumulate,
    /// Tuple offset of the first source pattern.
    source_offset: usize,
}

impl AccumulateNode {
    pub fn new(accumulate: Accumulate) -> Self {
        let source_offset = accumulate.source().first_offset().unwrap_or_default();
        Self {
            accumulate,
            source_offset,
        }
    }

    pub fn accumulate(&self) -> &Accumulate {
        &self.accumulate
    }

    /// Fresh state for the partial match `left`.
    pub fn init(&self, left: &Tuple) -> Result<AccumulateMemory, RuntimeError> {
        let contexts = self.init_contexts(left)?;
        Ok(AccumulateMemory {
            contexts,
            matches: IndexMap::new(),
        })
    }

    fn init_contexts(&self, left: &Tuple) -> Result<Vec<WorkingMemory>, RuntimeError> {
        self.accumulate
            .accumulators()
            .iter()
            .enumerate()
            .map(|(i, acc)| acc.init(left).map_err(failed(i)))
            .collect()
    }

    /// Fold the source match `objects` into `memory`.
    ///
    /// `objects` holds one value per source pattern, in offset order.
    pub fn insert(
        &self,
        memory: &mut AccumulateMemory,
        left: &Tuple,
        handle: FactHandle,
        objects: impl IntoIterator<Item = Value>,
    ) -> Result<(), RuntimeError> {
        if memory.contains(handle) {
            return Err(RuntimeError::DuplicateHandle(handle));
        }
        let matched = self.matched(left, objects);
        if let Err(err) = self.fold(&mut memory.contexts, &matched) {
            debug!(%handle, "insert failed, restoring accumulate state");
            memory.contexts = self.replay(left, memory.matches.values())?;
            return Err(err);
        }
        trace!(%handle, "accumulated fact");
        memory.matches.insert(handle, matched);
        Ok(())
    }

    /// Remove a previously inserted fact.
    ///
    /// Reversible nodes undo the fact in place. Others are re-initialized and
    /// the remaining facts replayed.
    pub fn retract(
        &self,
        memory: &mut AccumulateMemory,
        left: &Tuple,
        handle: FactHandle,
    ) -> Result<(), RuntimeError> {
        let Some(matched) = memory.matches.get(&handle) else {
            return Err(RuntimeError::UnknownHandle(handle));
        };

        if self.reverses() {
            if let Err(err) = self.unfold(&mut memory.contexts, matched) {
                debug!(%handle, "retract failed, restoring accumulate state");
                memory.contexts = self.replay(left, memory.matches.values())?;
                return Err(err);
            }
            trace!(%handle, "reversed fact");
        } else {
            debug!(%handle, remaining = memory.matches.len() - 1, "recomputing accumulate");
            let remaining = memory
                .matches
                .iter()
                .filter(|(other, _)| **other != handle)
                .map(|(_, matched)| matched);
            memory.contexts = self.replay(left, remaining)?;
        }

        memory.matches.shift_remove(&handle);
        Ok(())
    }

    /// The node's result: the single result, or the list of results in
    /// function order.
    pub fn result(&self, memory: &AccumulateMemory, left: &Tuple) -> Result<Value, RuntimeError> {
        match self.accumulate.kind() {
            AccumulateKind::Single(acc) => acc.result(&memory.contexts[0], left).map_err(failed(0)),
            AccumulateKind::Multi(accs) => accs
                .iter()
                .enumerate()
                .map(|(i, acc)| acc.result(&memory.contexts[i], left).map_err(failed(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
        }
    }

    /// The tuple seen by patterns after the accumulate: `left` plus the result.
    pub fn propagate(&self, left: &Tuple, result: Value) -> Tuple {
        left.extended(result)
    }

    /// Fold one match into every accumulator.
    fn fold(&self, contexts: &mut [WorkingMemory], matched: &Matched) -> Result<(), RuntimeError> {
        for (i, acc) in self.accumulate.accumulators().iter().enumerate() {
            acc.accumulate(&mut contexts[i], &matched.tuple, &matched.fact)
                .map_err(failed(i))?;
        }
        Ok(())
    }

    fn unfold(&self, contexts: &mut [WorkingMemory], matched: &Matched) -> Result<(), RuntimeError> {
        for (i, acc) in self.accumulate.accumulators().iter().enumerate() {
            acc.reverse(&mut contexts[i], &matched.tuple, &matched.fact)
                .map_err(failed(i))?;
        }
        Ok(())
    }

    /// Fresh contexts holding exactly `matches`.
    fn replay<'m>(
        &self,
        left: &Tuple,
        matches: impl IntoIterator<Item = &'m Matched>,
    ) -> Result<Vec<WorkingMemory>, RuntimeError> {
        let mut contexts = self.init_contexts(left)?;
        for matched in matches {
            self.fold(&mut contexts, matched)?;
        }
        Ok(contexts)
    }

    fn reverses(&self) -> bool {
        self.accumulate.supports_incremental_retract()
            && self
                .accumulate
                .accumulators()
                .iter()
                .all(|acc| acc.supports_reverse())
    }

    /// Place the source objects at their pattern offsets after `left`.
    fn matched(&self, left: &Tuple, objects: impl IntoIterator<Item = Value>) -> Matched {
        let mut tuple = left.clone();
        while tuple.len() < self.source_offset {
            tuple.push(Value::Null);
        }
        for object in objects {
            tuple.push(object);
        }
        let fact = tuple.iter().last().cloned().unwrap_or(Value::Null);
        Matched { tuple, fact }
    }
}
