//! Reference expression compiler.
//!
//! [`PathCompiler`] compiles function-call accumulates whose argument is a
//! literal, a declaration, a global, or a field path on one of those.
//! Inline accumulate bodies need a host-language compiler and are rejected.

mod path;


use std::sync::Arc;

use accrete_compiler::compile::{
    AccumulateError, Accumulator, CompileError, CompileKind, CompileRequest, ExpressionCompiler,
    WorkingMemory,
};
use accrete_compiler::registry::AggregateFunction;
use accrete_compiler::scope::Declaration;
use accrete_core::{Tuple, Value, ValueType};
use indexmap::IndexMap;
use tracing::trace;

use path::{CompiledPath, Root};

pub use path::PathExpr;

/// Compiles function-call accumulates over path expressions.
#[derive(Clone, Debug, Default)]
pub struct PathCompiler {
    globals: IndexMap<String, Value>,
}

impl PathCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide the runtime value of a global.
    pub fn with_global(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.globals.insert(name.into(), value.into());
        self
    }

    fn resolve(
        &self,
        request: &CompileRequest,
        expression: &str,
    ) -> Result<CompiledPath, CompileError> {
        let invalid = |message: String| CompileError::Invalid {
            unit: request.unit_name.clone(),
            message,
        };

        let (root, fields) = match PathExpr::parse(expression).map_err(invalid)? {
            PathExpr::Literal(value) => (Root::Literal(value), Vec::new()),
            PathExpr::Path { root, fields } => {
                let find = |declarations: &[Declaration]| {
                    declarations
                        .iter()
                        .find(|d| d.identifier() == root)
                        .cloned()
                };
                let resolved = if let Some(d) = find(&request.inner_declarations) {
                    Root::Inner(d)
                } else if let Some(d) = find(&request.required_declarations) {
                    Root::Outer(d)
                } else if request.required_globals.contains_key(&root) {
                    let value = self
                        .globals
                        .get(&root)
                        .cloned()
                        .ok_or_else(|| invalid(format!("global `{root}` has no value")))?;
                    Root::Global(value)
                } else {
                    return Err(invalid(format!("unknown name `{root}`")));
                };
                (resolved, fields)
            }
        };

        Ok(CompiledPath {
            root,
            fields,
            read_locals_from_tuple: request.read_locals_from_tuple,
        })
    }
}

impl ExpressionCompiler for PathCompiler {
    fn compile(&self, request: CompileRequest) -> Result<Arc<dyn Accumulator>, CompileError> {
        match &request.kind {
            CompileKind::Inline(_) => Err(CompileError::Unsupported {
                unit: request.unit_name.clone(),
                reason: "inline accumulate code needs a host expression compiler".into(),
            }),
            CompileKind::FunctionCall {
                function,
                expression,
            } => {
                let argument = self.resolve(&request, expression)?;
                trace!(unit = %request.unit_name, %expression, "compiled path accumulator");
                Ok(Arc::new(FunctionCallAccumulator {
                    function: Arc::clone(function),
                    argument,
                }))
            }
        }
    }
}

/// Feeds one evaluated argument per fact into an aggregate function.
#[derive(Debug)]
struct FunctionCallAccumulator {
    function: Arc<dyn AggregateFunction>,
    argument: CompiledPath,
}

impl Accumulator for FunctionCallAccumulator {
    fn init(&self, _tuple: &Tuple) -> Result<WorkingMemory, AccumulateError> {
        Ok(self.function.init())
    }

    fn accumulate(
        &self,
        memory: &mut WorkingMemory,
        tuple: &Tuple,
        fact: &Value,
    ) -> Result<(), AccumulateError> {
        let value = self.argument.evaluate(tuple, fact)?;
        self.function.accumulate(memory, &value)?;
        Ok(())
    }

    fn reverse(
        &self,
        memory: &mut WorkingMemory,
        tuple: &Tuple,
        fact: &Value,
    ) -> Result<(), AccumulateError> {
        let value = self.argument.evaluate(tuple, fact)?;
        self.function.reverse(memory, &value)?;
        Ok(())
    }

    fn result(&self, memory: &WorkingMemory, _tuple: &Tuple) -> Result<Value, AccumulateError> {
        Ok(self.function.result(memory)?)
    }

    fn supports_reverse(&self) -> bool {
        self.function.supports_reverse()
    }

    fn result_type(&self) -> ValueType {
        self.function.result_type()
    }
}
