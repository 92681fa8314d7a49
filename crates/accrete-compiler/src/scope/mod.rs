//! Declarations and the scopes that make them visible.
//!
//! - `declaration`: named, typed bindings with their read accessor
//! - `pattern`: patterns own the declarations they bind
//! - `resolver`: rule-level visibility and required-declaration projection

mod declaration;
mod pattern;
mod resolver;

#[cfg(test)]
mod resolver_tests;

pub use declaration::Declaration;
pub use pattern::Pattern;
pub use resolver::{DeclarationScope, RequiredDeclarations, collect_required};
