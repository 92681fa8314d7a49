//! Test collaborators and fixtures for accumulate builds.

use std::cell::RefCell;
use std::sync::Arc;

use accrete_core::{ReadAccessor, Tuple, Value, ValueType};

use crate::accumulate::{Accumulate, AccumulateBuilder, AccumulateDescr};
use crate::analyze::{
    AnalysisResult, AnalyzeError, AvailableBindings, ExpressionAnalyzer, FragmentKind,
    LexicalAnalyzer,
};
use crate::compile::{
    AccumulateError, Accumulator, CompileError, CompileKind, CompileRequest, ExpressionCompiler,
    WorkingMemory,
};
use crate::config::BuilderConfig;
use crate::context::{Package, RuleBuildContext};
use crate::diagnostics::Diagnostics;
use crate::scope::Pattern;
use crate::source::{ConditionDescr, PatternDescr, PatternSourceBuilder, RuleConditionElement, SourceBuilder};

/// Accumulator that does nothing and reports the capabilities it was built with.
#[derive(Debug)]
pub struct StubAccumulator {
    pub unit_name: String,
    pub result_type: ValueType,
    pub reverse: bool,
}

impl Accumulator for StubAccumulator {
    fn init(&self, _tuple: &Tuple) -> Result<WorkingMemory, AccumulateError> {
        Ok(Box::new(()))
    }

    fn accumulate(
        &self,
        _memory: &mut WorkingMemory,
        _tuple: &Tuple,
        _fact: &Value,
    ) -> Result<(), AccumulateError> {
        Ok(())
    }

    fn result(&self, _memory: &WorkingMemory, _tuple: &Tuple) -> Result<Value, AccumulateError> {
        Ok(Value::Null)
    }

    fn supports_reverse(&self) -> bool {
        self.reverse
    }

    fn result_type(&self) -> ValueType {
        self.result_type.clone()
    }
}

/// Compiler that records every request and returns [`StubAccumulator`]s.
#[derive(Debug, Default)]
pub struct MockCompiler {
    requests: RefCell<Vec<CompileRequest>>,
    fail_on: Option<String>,
}

impl MockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the unit with the given name.
    pub fn failing_on(unit_name: &str) -> Self {
        Self {
            fail_on: Some(unit_name.to_owned()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<CompileRequest> {
        self.requests.borrow().clone()
    }

    pub fn unit_names(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| r.unit_name.clone())
            .collect()
    }
}

impl ExpressionCompiler for MockCompiler {
    fn compile(&self, request: CompileRequest) -> Result<Arc<dyn Accumulator>, CompileError> {
        self.requests.borrow_mut().push(request.clone());
        if self.fail_on.as_deref() == Some(request.unit_name.as_str()) {
            return Err(CompileError::Invalid {
                unit: request.unit_name,
                message: "rejected by test compiler".into(),
            });
        }
        let (result_type, reverse) = match &request.kind {
            CompileKind::FunctionCall { function, .. } => {
                (function.result_type(), function.supports_reverse())
            }
            CompileKind::Inline(body) => (ValueType::Any, body.reverse_code.is_some()),
        };
        Ok(Arc::new(StubAccumulator {
            unit_name: request.unit_name,
            result_type,
            reverse,
        }))
    }
}

/// Analyzer that rejects every fragment.
#[derive(Debug, Default)]
pub struct RejectingAnalyzer;

impl ExpressionAnalyzer for RejectingAnalyzer {
    fn analyze(
        &self,
        _code: &str,
        _kind: FragmentKind,
        _available: &AvailableBindings,
    ) -> Result<AnalysisResult, AnalyzeError> {
        Err(AnalyzeError::Syntax {
            offset: 0,
            message: "rejected by test analyzer".into(),
        })
    }
}

/// Analyzer that reports a fixed declaration reference, whether or not it is
/// available.
#[derive(Debug)]
pub struct FixedAnalyzer(pub &'static str);

impl ExpressionAnalyzer for FixedAnalyzer {
    fn analyze(
        &self,
        _code: &str,
        _kind: FragmentKind,
        _available: &AvailableBindings,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let mut analysis = AnalysisResult::default();
        analysis.bindings.add_declaration(self.0);
        Ok(analysis)
    }
}

/// Source builder that never builds anything.
#[derive(Debug, Default)]
pub struct NoSource;

impl SourceBuilder for NoSource {
    fn build(
        &self,
        _ctx: &mut RuleBuildContext<'_>,
        _descr: &ConditionDescr,
    ) -> Option<RuleConditionElement> {
        None
    }
}

/// `o : Order($amount : amount)`.
pub fn orders() -> PatternDescr {
    PatternDescr::new("Order")
        .bind_as("o")
        .field("$amount", "amount", "double")
}

/// A rule `R1` in package `org.acme` with `$c : Customer()` in scope and a
/// numeric global `rate`.
pub struct Fixture {
    pub config: BuilderConfig,
    pub package: Package,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

/// Output of one accumulate build.
pub struct Built {
    pub node: Option<Accumulate>,
    pub result_pattern: Pattern,
    pub diagnostics: Diagnostics,
}

impl Built {
    pub fn node(&self) -> &Accumulate {
        self.node.as_ref().expect("accumulate should build")
    }

    pub fn accessor(&self, identifier: &str) -> &ReadAccessor {
        self.result_pattern
            .declaration(identifier)
            .unwrap_or_else(|| panic!("`{identifier}` should be bound"))
            .accessor()
    }
}

impl Fixture {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            package: Package::new("org.acme").global("rate", ValueType::Numeric),
        }
    }

    pub fn context(&self) -> RuleBuildContext<'_> {
        let mut ctx = RuleBuildContext::new("R1", &self.config, &self.package);
        let customer_type = ValueType::Object("Customer".into());
        let mut customer = Pattern::new(ctx.allocate_offset(), customer_type.clone());
        customer.add_declaration("$c", ReadAccessor::self_reference(customer_type));
        ctx.scope_mut().declare_pattern(&customer);
        ctx
    }

    /// Build with the reference source builder and analyzer.
    pub fn build(&self, compiler: &MockCompiler, descr: &AccumulateDescr) -> crate::Result<Built> {
        self.build_with(&PatternSourceBuilder, &LexicalAnalyzer, compiler, descr)
    }

    pub fn build_with(
        &self,
        sources: &dyn SourceBuilder,
        analyzer: &dyn ExpressionAnalyzer,
        compiler: &MockCompiler,
        descr: &AccumulateDescr,
    ) -> crate::Result<Built> {
        let mut ctx = self.context();
        let mut result_pattern = Pattern::new(ctx.allocate_offset(), ValueType::Any).with_nested_source();
        let builder = AccumulateBuilder::new(sources, analyzer, compiler);
        let node = builder.build(&mut ctx, descr, &mut result_pattern)?;
        Ok(Built {
            node,
            result_pattern,
            diagnostics: ctx.into_diagnostics(),
        })
    }
}
