//! Per-rule build state.

use std::sync::Arc;

use accrete_core::ValueType;
use indexmap::IndexMap;
use rowan::TextRange;

use crate::config::BuilderConfig;
use crate::diagnostics::{DiagnosticBuilder, DiagnosticKind, Diagnostics};
use crate::registry::{AggregateFunction, FunctionRegistry};
use crate::scope::DeclarationScope;

/// The package a rule is declared in: its local accumulate functions and globals.
#[derive(Clone, Debug, Default)]
pub struct Package {
    name: String,
    functions: FunctionRegistry,
    globals: IndexMap<String, ValueType>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare a package-local accumulate function.
    pub fn function(mut self, name: impl Into<String>, function: Arc<dyn AggregateFunction>) -> Self {
        self.functions.register(name, function);
        self
    }

    /// Declare a global of the given type.
    pub fn global(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.globals.insert(name.into(), value_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn globals(&self) -> &IndexMap<String, ValueType> {
        &self.globals
    }
}

/// Mutable state of one rule build.
///
/// Owns the rule's declaration scope, its diagnostics, and the counters used
/// for unit names and pattern offsets.
#[derive(Debug)]
pub struct RuleBuildContext<'a> {
    rule_name: String,
    config: &'a BuilderConfig,
    package: &'a Package,
    scope: DeclarationScope,
    diagnostics: Diagnostics,
    next_id: usize,
    next_offset: usize,
}

impl<'a> RuleBuildContext<'a> {
    pub fn new(rule_name: impl Into<String>, config: &'a BuilderConfig, package: &'a Package) -> Self {
        Self {
            rule_name: rule_name.into(),
            config,
            package,
            scope: DeclarationScope::new(),
            diagnostics: Diagnostics::new(),
            next_id: 0,
            next_offset: 0,
        }
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    pub fn config(&self) -> &'a BuilderConfig {
        self.config
    }

    pub fn package(&self) -> &'a Package {
        self.package
    }

    pub fn scope(&self) -> &DeclarationScope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut DeclarationScope {
        &mut self.scope
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Report a diagnostic against this rule.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        self.diagnostics.report(&self.rule_name, kind, range)
    }

    /// Look up an accumulate function: configuration first, then the package.
    pub fn resolve_function(&self, name: &str) -> Option<Arc<dyn AggregateFunction>> {
        self.config
            .functions()
            .get(name)
            .or_else(|| self.package.functions().get(name))
            .cloned()
    }

    /// A build-unique id for naming compiled units.
    pub fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reserve the next tuple offset for a pattern.
    pub fn allocate_offset(&mut self) -> usize {
        let offset = self.next_offset;
        self.next_offset += 1;
        offset
    }
}
