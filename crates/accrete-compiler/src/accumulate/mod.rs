//! Accumulate clause construction.
//!
//! [`AccumulateBuilder::build`] takes an [`AccumulateDescr`] through source
//! building, scope resolution, function resolution, compilation and result
//! wiring, and yields an [`Accumulate`] node:
//! - `descr`: the parsed clause
//! - `builder`: pre-flight checks, source building, clause scope
//! - `function_call`: one accumulator per function call, result bindings
//! - `inline`: a single accumulator from init/action/reverse/result code
//! - `wiring`: accessors for result bindings
//! - `node`: the built node

mod builder;
mod descr;
mod function_call;
mod inline;
mod node;
mod wiring;

#[cfg(test)]
mod inline_tests;

pub use builder::AccumulateBuilder;
pub use descr::{AccumulateBody, AccumulateDescr, FunctionCallDescr, InlineDescr};
pub use node::{Accumulate, AccumulateKind};
