//! Accrete compiler: builds `accumulate` clauses into aggregation nodes.
//!
//! This crate provides the accumulate build pipeline:
//! - `scope` - declarations, patterns, and rule-level visibility
//! - `analyze` - reference analysis of code fragments
//! - `registry` - aggregate functions and their registry
//! - `source` - building input conditions into source elements
//! - `compile` - the accumulator and expression-compiler contracts
//! - `accumulate` - the accumulate builder and the nodes it produces
//! - `diagnostics` - error reporting

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod accumulate;
pub mod analyze;
pub mod compile;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod registry;
pub mod scope;
pub mod source;

#[cfg(test)]
pub mod test_utils;

pub use accumulate::{Accumulate, AccumulateBuilder, AccumulateDescr, AccumulateKind};
pub use config::BuilderConfig;
pub use context::{Package, RuleBuildContext};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};

/// Build failures that indicate a defect rather than a user error.
///
/// User errors (unknown functions, duplicate bindings) are reported as
/// diagnostics and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The analyzer reported a reference the declaration scope cannot resolve.
    #[error("declaration `{0}` is referenced but not in scope")]
    UnresolvedDeclaration(String),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, Error>;
