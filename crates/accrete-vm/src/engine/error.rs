use accrete_compiler::compile::AccumulateError;
use accrete_core::ReadError;

use super::memory::FactHandle;

/// Errors during aggregation-node evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// An accumulator failed while folding or reading its state.
    #[error("accumulator {index} failed: {source}")]
    Accumulate {
        index: usize,
        #[source]
        source: AccumulateError,
    },

    #[error("fact {0} was never inserted")]
    UnknownHandle(FactHandle),

    #[error("fact {0} is already inserted")]
    DuplicateHandle(FactHandle),

    #[error(transparent)]
    Read(#[from] ReadError),
}
