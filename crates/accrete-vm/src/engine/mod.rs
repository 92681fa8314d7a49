//! Incremental evaluation of aggregation nodes.
//!
//! One [`AccumulateMemory`] is kept per partial match of the rule. Facts
//! matched by the accumulate source are inserted and retracted by handle;
//! the node's result can be read at any time.

mod error;
mod memory;
mod node;


pub use error::RuntimeError;
pub use memory::{AccumulateMemory, FactHandle};
pub use node::AccumulateNode;
