use std::any::Any;
use std::fmt;

use accrete_core::{Value, ValueType};

/// Per-accumulation state of an aggregate function.
///
/// Created by [`AggregateFunction::init`] and only ever handed back to the
/// function that created it.
pub type FunctionState = Box<dyn Any + Send>;

/// Failures inside an aggregate function.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FunctionError {
    #[error("`{function}` expects a numeric value, found {found}")]
    NotNumeric { function: String, found: ValueType },

    #[error("`{function}` cannot reverse an accumulated value")]
    ReverseUnsupported { function: String },

    #[error("`{function}` was asked to reverse {value}, which it never accumulated")]
    NotAccumulated { function: String, value: String },

    #[error("state passed to `{function}` was created by another function")]
    StateMismatch { function: String },
}

/// A named aggregate computation, resolved once per rule build.
///
/// Functions are shared across rule builds and threads; all mutable data
/// lives in the [`FunctionState`] returned by [`init`](Self::init).
pub trait AggregateFunction: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Type of the value [`result`](Self::result) produces.
    fn result_type(&self) -> ValueType;

    fn init(&self) -> FunctionState;

    fn accumulate(&self, state: &mut FunctionState, value: &Value) -> Result<(), FunctionError>;

    /// Undo a previous [`accumulate`](Self::accumulate) of `value`.
    ///
    /// Only called when [`supports_reverse`](Self::supports_reverse) is true.
    fn reverse(&self, state: &mut FunctionState, value: &Value) -> Result<(), FunctionError> {
        let _ = (state, value);
        Err(FunctionError::ReverseUnsupported {
            function: self.name().to_owned(),
        })
    }

    fn result(&self, state: &FunctionState) -> Result<Value, FunctionError>;

    fn supports_reverse(&self) -> bool;
}

/// Borrow the concrete state behind a [`FunctionState`].
pub fn state_ref<'s, T: 'static>(
    function: &str,
    state: &'s FunctionState,
) -> Result<&'s T, FunctionError> {
    state
        .downcast_ref::<T>()
        .ok_or_else(|| FunctionError::StateMismatch {
            function: function.to_owned(),
        })
}

/// Mutably borrow the concrete state behind a [`FunctionState`].
pub fn state_mut<'s, T: 'static>(
    function: &str,
    state: &'s mut FunctionState,
) -> Result<&'s mut T, FunctionError> {
    state
        .downcast_mut::<T>()
        .ok_or_else(|| FunctionError::StateMismatch {
            function: function.to_owned(),
        })
}
