//! Reference analysis for accumulate code fragments.
//!
//! The builder never interprets aggregate code itself. It hands each fragment
//! to an [`ExpressionAnalyzer`] together with the bindings in scope, and gets
//! back the declarations and globals the fragment actually references:
//! - `bindings`: the analyzer contract and its typed results
//! - `lexical`: a token-level reference analyzer
//! - `init_code`: hoisting of init-code locals into accumulator attributes

mod bindings;
mod init_code;
mod lexical;

#[cfg(test)]
mod lexical_tests;

pub use bindings::{
    AnalysisResult, AnalyzeError, AvailableBindings, ExpressionAnalyzer, FragmentKind,
    LocalIdentifier, LocalVariable, ReferencedBindings,
};
pub use init_code::{Attribute, HoistedInitCode, hoist_locals};
pub use lexical::LexicalAnalyzer;
