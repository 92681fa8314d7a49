//! Runtime for compiled Accrete aggregation nodes.
//!
//! This crate evaluates [`Accumulate`](accrete_compiler::Accumulate) nodes
//! against partial matches, and provides [`PathCompiler`], an expression
//! compiler for function-call arguments of the form `literal`, `name` or
//! `name.field`.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;
pub mod interp;

pub use engine::{AccumulateMemory, AccumulateNode, FactHandle, RuntimeError};
pub use interp::PathCompiler;
