//! Rule-level declaration visibility and required-declaration projection.

use indexmap::IndexMap;

use super::{Declaration, Pattern};
use crate::analyze::ReferencedBindings;
use crate::{Error, Result};

/// Declarations visible at the current point of a rule build, in binding order.
#[derive(Clone, Debug, Default)]
pub struct DeclarationScope {
    declarations: IndexMap<String, Declaration>,
}

impl DeclarationScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a single declaration visible. Later declarations shadow earlier ones.
    pub fn declare(&mut self, declaration: Declaration) {
        self.declarations
            .insert(declaration.identifier().to_owned(), declaration);
    }

    /// Make every declaration of `pattern` visible.
    pub fn declare_pattern(&mut self, pattern: &Pattern) {
        for declaration in pattern.declarations() {
            self.declare(declaration.clone());
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&Declaration> {
        self.declarations.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.declarations.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// The name→declaration mapping visible to code in this scope.
    pub fn visible_declarations(&self) -> &IndexMap<String, Declaration> {
        &self.declarations
    }
}

/// The declarations an aggregation node must retain per partial match.
///
/// Unique by identifier, in first-reference order.
#[derive(Clone, Debug, Default)]
pub struct RequiredDeclarations {
    declarations: IndexMap<String, Declaration>,
}

impl RequiredDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `declaration` unless one with the same identifier is already present.
    pub fn insert(&mut self, declaration: &Declaration) {
        if !self.declarations.contains_key(declaration.identifier()) {
            self.declarations
                .insert(declaration.identifier().to_owned(), declaration.clone());
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.declarations.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    pub fn into_vec(self) -> Vec<Declaration> {
        self.declarations.into_values().collect()
    }
}

/// Project the declarations referenced by `bindings` onto concrete declarations.
///
/// Returns the declarations this one fragment needs, in reference order, and
/// merges them into the node-wide `required` set.
///
/// A referenced name missing from `visible` means the analyzer and the scope
/// disagree; that is a defect, reported as [`Error::UnresolvedDeclaration`].
pub fn collect_required(
    bindings: &ReferencedBindings,
    visible: &IndexMap<String, Declaration>,
    required: &mut RequiredDeclarations,
) -> Result<Vec<Declaration>> {
    bindings
        .declarations()
        .map(|name| {
            let declaration = visible
                .get(name)
                .ok_or_else(|| Error::UnresolvedDeclaration(name.to_owned()))?;
            required.insert(declaration);
            Ok(declaration.clone())
        })
        .collect()
}
