#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the Accrete compiler and runtime.
//!
//! - [`ValueType`]: semantic types carried by declarations and aggregate results
//! - [`Value`]: runtime values flowing through accumulators
//! - [`Fact`]: typed objects inserted into working memory
//! - [`Tuple`]: a partial match, one object per pattern offset
//! - [`ReadAccessor`]: how a declaration extracts its value from a tuple object

mod accessor;
mod fact;
mod tuple;
mod types;
mod value;

#[cfg(test)]
mod fact_tests;
#[cfg(test)]
mod types_tests;
#[cfg(test)]
mod value_tests;

pub use accessor::{ReadAccessor, ReadError};
pub use fact::{Fact, FactError};
pub use tuple::Tuple;
pub use types::ValueType;
pub use value::Value;
