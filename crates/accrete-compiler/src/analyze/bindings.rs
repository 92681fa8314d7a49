use accrete_core::ValueType;
use indexmap::{IndexMap, IndexSet};
use rowan::TextRange;

use crate::scope::Declaration;

/// Whether a fragment is a statement block or a single expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentKind {
    /// Statements (`init`, `action`, `reverse`). May declare locals.
    Block,
    /// A single expression (`result`, function arguments).
    Expression,
}

/// Everything a fragment may reference: declaration and global types by name.
#[derive(Clone, Debug, Default)]
pub struct AvailableBindings {
    declarations: IndexMap<String, ValueType>,
    globals: IndexMap<String, ValueType>,
}

impl AvailableBindings {
    pub fn new(
        visible: &IndexMap<String, Declaration>,
        globals: &IndexMap<String, ValueType>,
    ) -> Self {
        Self {
            declarations: visible
                .iter()
                .map(|(name, decl)| (name.clone(), decl.value_type().clone()))
                .collect(),
            globals: globals.clone(),
        }
    }

    pub fn declaration_type(&self, name: &str) -> Option<&ValueType> {
        self.declarations.get(name)
    }

    pub fn global_type(&self, name: &str) -> Option<&ValueType> {
        self.globals.get(name)
    }

    pub fn declarations(&self) -> &IndexMap<String, ValueType> {
        &self.declarations
    }

    pub fn globals(&self) -> &IndexMap<String, ValueType> {
        &self.globals
    }
}

/// The subset of [`AvailableBindings`] a fragment references.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferencedBindings {
    declarations: IndexSet<String>,
    globals: IndexMap<String, ValueType>,
}

impl ReferencedBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_declaration(&mut self, name: impl Into<String>) {
        self.declarations.insert(name.into());
    }

    pub fn add_global(&mut self, name: impl Into<String>, value_type: ValueType) {
        self.globals.insert(name.into(), value_type);
    }

    /// Union `other` into `self`, keeping first-reference order.
    pub fn merge(&mut self, other: &ReferencedBindings) {
        self.declarations
            .extend(other.declarations.iter().cloned());
        for (name, value_type) in &other.globals {
            self.globals
                .entry(name.clone())
                .or_insert_with(|| value_type.clone());
        }
    }

    /// Referenced declaration names, in first-reference order.
    pub fn declarations(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(String::as_str)
    }

    pub fn references_declaration(&self, name: &str) -> bool {
        self.declarations.contains(name)
    }

    pub fn globals(&self) -> &IndexMap<String, ValueType> {
        &self.globals
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.globals.is_empty()
    }
}

/// One identifier of a local declaration: `x = 0` in `int x = 0, y;`.
///
/// `range` spans the name and its initializer, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalIdentifier {
    pub name: String,
    pub range: TextRange,
}

/// A local variable declaration statement found in a block fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalVariable {
    pub type_name: String,
    /// From the start of the type to the end of the last identifier.
    pub range: TextRange,
    pub identifiers: Vec<LocalIdentifier>,
}

/// Analyzer output for one fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    pub bindings: ReferencedBindings,
    /// Local declarations, in source order.
    pub locals: Vec<LocalVariable>,
}

/// Fragment-level failures reported by an analyzer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzeError {
    #[error("unexpected input at offset {offset}: {message}")]
    Syntax { offset: u32, message: String },

    #[error("unbalanced `{delimiter}` at offset {offset}")]
    Unbalanced { delimiter: char, offset: u32 },
}

/// Finds the bindings a code fragment references.
///
/// Implementations must only report names present in `available`; the builder
/// treats anything else as a broken contract.
pub trait ExpressionAnalyzer {
    fn analyze(
        &self,
        code: &str,
        kind: FragmentKind,
        available: &AvailableBindings,
    ) -> Result<AnalysisResult, AnalyzeError>;
}
