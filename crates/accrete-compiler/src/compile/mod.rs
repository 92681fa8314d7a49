//! The compilation contract: what the builder asks of an expression compiler
//! and what it gets back.
//!
//! The builder resolves scope and functions; turning code into an executable
//! [`Accumulator`] is the compiler's job.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use accrete_core::{ReadError, Tuple, Value, ValueType};
use indexmap::IndexMap;

use crate::analyze::Attribute;
use crate::registry::{AggregateFunction, FunctionError};
use crate::scope::Declaration;

/// Per-partial-match state of an [`Accumulator`].
pub type WorkingMemory = Box<dyn Any + Send>;

/// Failures while evaluating an accumulator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccumulateError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Function(#[from] FunctionError),

    #[error("accumulator cannot reverse")]
    ReverseUnsupported,
}

/// An executable aggregation unit.
///
/// `init` is called once per partial match and must return state that is
/// not shared with any other call.
pub trait Accumulator: Send + Sync + fmt::Debug {
    fn init(&self, tuple: &Tuple) -> Result<WorkingMemory, AccumulateError>;

    fn accumulate(
        &self,
        memory: &mut WorkingMemory,
        tuple: &Tuple,
        fact: &Value,
    ) -> Result<(), AccumulateError>;

    /// Undo an earlier `accumulate` of the same `tuple`/`fact` pair.
    fn reverse(
        &self,
        memory: &mut WorkingMemory,
        tuple: &Tuple,
        fact: &Value,
    ) -> Result<(), AccumulateError> {
        let _ = (memory, tuple, fact);
        Err(AccumulateError::ReverseUnsupported)
    }

    fn result(&self, memory: &WorkingMemory, tuple: &Tuple) -> Result<Value, AccumulateError>;

    fn supports_reverse(&self) -> bool;

    fn result_type(&self) -> ValueType;
}

/// The four code fragments of an inline accumulate, after local hoisting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineBody {
    pub init_code: String,
    /// Locals hoisted out of `init_code`.
    pub attributes: Vec<Attribute>,
    pub action_code: String,
    pub reverse_code: Option<String>,
    pub result_code: String,
}

#[derive(Clone, Debug)]
pub enum CompileKind {
    /// Feed `expression`, evaluated per fact, into `function`.
    FunctionCall {
        function: Arc<dyn AggregateFunction>,
        expression: String,
    },
    Inline(InlineBody),
}

/// Everything a compiler needs to produce one accumulator.
#[derive(Clone, Debug)]
pub struct CompileRequest {
    /// Build-unique name: `accumulateExpression{n}` or `Accumulate{n}`.
    pub unit_name: String,
    pub kind: CompileKind,
    /// Declarations from the enclosing rule the unit reads, in reference order.
    pub required_declarations: Vec<Declaration>,
    pub required_globals: IndexMap<String, ValueType>,
    /// Declarations bound inside the accumulate source, sorted by identifier.
    pub inner_declarations: Vec<Declaration>,
    /// Read inner declarations from the tuple instead of the accumulated fact.
    pub read_locals_from_tuple: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("`{unit}` cannot be compiled: {reason}")]
    Unsupported { unit: String, reason: String },

    #[error("invalid expression in `{unit}`: {message}")]
    Invalid { unit: String, message: String },
}

/// Turns a [`CompileRequest`] into an executable [`Accumulator`].
pub trait ExpressionCompiler {
    fn compile(&self, request: CompileRequest) -> Result<Arc<dyn Accumulator>, CompileError>;
}
