use std::slice;
use std::sync::Arc;

use crate::compile::Accumulator;
use crate::scope::Declaration;
use crate::source::RuleConditionElement;

#[derive(Clone, Debug)]
pub enum AccumulateKind {
    /// One accumulator; its result is the node's result object.
    Single(Arc<dyn Accumulator>),
    /// One accumulator per function; the node's result is the list of their
    /// results in declaration order.
    Multi(Vec<Arc<dyn Accumulator>>),
}

/// A built aggregation node.
#[derive(Clone, Debug)]
pub struct Accumulate {
    source: RuleConditionElement,
    required_declarations: Vec<Declaration>,
    kind: AccumulateKind,
    supports_incremental_retract: bool,
}

impl Accumulate {
    pub fn new(
        source: RuleConditionElement,
        required_declarations: Vec<Declaration>,
        kind: AccumulateKind,
        supports_incremental_retract: bool,
    ) -> Self {
        Self {
            source,
            required_declarations,
            kind,
            supports_incremental_retract,
        }
    }

    pub fn source(&self) -> &RuleConditionElement {
        &self.source
    }

    /// Declarations from the enclosing rule any accumulator reads.
    pub fn required_declarations(&self) -> &[Declaration] {
        &self.required_declarations
    }

    pub fn kind(&self) -> &AccumulateKind {
        &self.kind
    }

    pub fn accumulators(&self) -> &[Arc<dyn Accumulator>] {
        match &self.kind {
            AccumulateKind::Single(accumulator) => slice::from_ref(accumulator),
            AccumulateKind::Multi(accumulators) => accumulators,
        }
    }

    pub fn is_multi_function(&self) -> bool {
        matches!(self.kind, AccumulateKind::Multi(_))
    }

    /// Whether a retraction can be undone in place instead of recomputing.
    pub fn supports_incremental_retract(&self) -> bool {
        self.supports_incremental_retract
    }
}
