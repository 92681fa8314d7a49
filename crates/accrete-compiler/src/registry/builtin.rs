//! Built-in aggregate functions.
//!
//! Numeric functions widen integers to floats. `Null` inputs are skipped by
//! every function except `count` and the collectors.

use std::cmp::Ordering;

use accrete_core::{Value, ValueType};

use super::function::{AggregateFunction, FunctionError, FunctionState, state_mut, state_ref};

fn numeric(function: &str, value: &Value) -> Result<Option<f64>, FunctionError> {
    if value.is_null() {
        return Ok(None);
    }
    value
        .as_f64()
        .map(Some)
        .ok_or_else(|| FunctionError::NotNumeric {
            function: function.to_owned(),
            found: value.value_type(),
        })
}

/// Number of accumulated values, as an integer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl AggregateFunction for Count {
    fn name(&self) -> &str {
        "count"
    }

    fn result_type(&self) -> ValueType {
        ValueType::Integer
    }

    fn init(&self) -> FunctionState {
        Box::new(0i64)
    }

    fn accumulate(&self, state: &mut FunctionState, _value: &Value) -> Result<(), FunctionError> {
        *state_mut::<i64>(self.name(), state)? += 1;
        Ok(())
    }

    fn reverse(&self, state: &mut FunctionState, _value: &Value) -> Result<(), FunctionError> {
        *state_mut::<i64>(self.name(), state)? -= 1;
        Ok(())
    }

    fn result(&self, state: &FunctionState) -> Result<Value, FunctionError> {
        Ok(Value::Int(*state_ref::<i64>(self.name(), state)?))
    }

    fn supports_reverse(&self) -> bool {
        true
    }
}

/// Sum of numeric values, as a float. `0.0` when nothing was accumulated.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum;

impl AggregateFunction for Sum {
    fn name(&self) -> &str {
        "sum"
    }

    fn result_type(&self) -> ValueType {
        ValueType::Numeric
    }

    fn init(&self) -> FunctionState {
        Box::new(0f64)
    }

    fn accumulate(&self, state: &mut FunctionState, value: &Value) -> Result<(), FunctionError> {
        if let Some(n) = numeric(self.name(), value)? {
            *state_mut::<f64>(self.name(), state)? += n;
        }
        Ok(())
    }

    fn reverse(&self, state: &mut FunctionState, value: &Value) -> Result<(), FunctionError> {
        if let Some(n) = numeric(self.name(), value)? {
            *state_mut::<f64>(self.name(), state)? -= n;
        }
        Ok(())
    }

    fn result(&self, state: &FunctionState) -> Result<Value, FunctionError> {
        Ok(Value::Float(*state_ref::<f64>(self.name(), state)?))
    }

    fn supports_reverse(&self) -> bool {
        true
    }
}

#[derive(Debug, Default)]
struct AverageState {
    total: f64,
    count: u64,
}

/// Arithmetic mean of numeric values. `0.0` when nothing was accumulated.
#[derive(Clone, Copy, Debug, Default)]
pub struct Average;

impl AggregateFunction for Average {
    fn name(&self) -> &str {
        "average"
    }

    fn result_type(&self) -> ValueType {
        ValueType::Numeric
    }

    fn init(&self) -> FunctionState {
        Box::new(AverageState::default())
    }

    fn accumulate(&self, state: &mut FunctionState, value: &Value) -> Result<(), FunctionError> {
        if let Some(n) = numeric(self.name(), value)? {
            let state = state_mut::<AverageState>(self.name(), state)?;
            state.total += n;
            state.count += 1;
        }
        Ok(())
    }

    fn reverse(&self, state: &mut FunctionState, value: &Value) -> Result<(), FunctionError> {
        if let Some(n) = numeric(self.name(), value)? {
            let state = state_mut::<AverageState>(self.name(), state)?;
            state.total -= n;
            state.count = state.count.saturating_sub(1);
        }
        Ok(())
    }

    fn result(&self, state: &FunctionState) -> Result<Value, FunctionError> {
        let state = state_ref::<AverageState>(self.name(), state)?;
        if state.count == 0 {
            return Ok(Value::Float(0.0));
        }
        Ok(Value::Float(state.total / state.count as f64))
    }

    fn supports_reverse(&self) -> bool {
        true
    }
}

/// Smallest (`Min`) or largest (`Max`) numeric value, keeping its input
/// representation. `Null` when nothing was accumulated.
///
/// Neither can reverse: the runtime recomputes them from the remaining facts.
#[derive(Clone, Copy, Debug)]
pub struct Extremum {
    name: &'static str,
    keep: Ordering,
}

impl Extremum {
    pub const fn min() -> Self {
        Self {
            name: "min",
            keep: Ordering::Less,
        }
    }

    pub const fn max() -> Self {
        Self {
            name: "max",
            keep: Ordering::Greater,
        }
    }
}

impl AggregateFunction for Extremum {
    fn name(&self) -> &str {
        self.name
    }

    fn result_type(&self) -> ValueType {
        ValueType::Numeric
    }

    fn init(&self) -> FunctionState {
        Box::new(Value::Null)
    }

    fn accumulate(&self, state: &mut FunctionState, value: &Value) -> Result<(), FunctionError> {
        if numeric(self.name, value)?.is_none() {
            return Ok(());
        }
        let best = state_mut::<Value>(self.name, state)?;
        if best.is_null() || value.compare(best) == Some(self.keep) {
            *best = value.clone();
        }
        Ok(())
    }

    fn result(&self, state: &FunctionState) -> Result<Value, FunctionError> {
        Ok(state_ref::<Value>(self.name, state)?.clone())
    }

    fn supports_reverse(&self) -> bool {
        false
    }
}

/// Every accumulated value, in accumulation order.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollectList;

impl AggregateFunction for CollectList {
    fn name(&self) -> &str {
        "collectList"
    }

    fn result_type(&self) -> ValueType {
        ValueType::List
    }

    fn init(&self) -> FunctionState {
        Box::new(Vec::<Value>::new())
    }

    fn accumulate(&self, state: &mut FunctionState, value: &Value) -> Result<(), FunctionError> {
        state_mut::<Vec<Value>>(self.name(), state)?.push(value.clone());
        Ok(())
    }

    fn reverse(&self, state: &mut FunctionState, value: &Value) -> Result<(), FunctionError> {
        let items = state_mut::<Vec<Value>>(self.name(), state)?;
        let Some(pos) = items.iter().position(|item| item == value) else {
            return Err(FunctionError::NotAccumulated {
                function: self.name().to_owned(),
                value: value.to_string(),
            });
        };
        items.remove(pos);
        Ok(())
    }

    fn result(&self, state: &FunctionState) -> Result<Value, FunctionError> {
        Ok(Value::List(
            state_ref::<Vec<Value>>(self.name(), state)?.clone(),
        ))
    }

    fn supports_reverse(&self) -> bool {
        true
    }
}

/// Distinct accumulated values, in first-accumulation order.
///
/// Each value is reference counted so reversing one of several equal inputs
/// keeps it in the set.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollectSet;

impl AggregateFunction for CollectSet {
    fn name(&self) -> &str {
        "collectSet"
    }

    fn result_type(&self) -> ValueType {
        ValueType::List
    }

    fn init(&self) -> FunctionState {
        Box::new(Vec::<(Value, usize)>::new())
    }

    fn accumulate(&self, state: &mut FunctionState, value: &Value) -> Result<(), FunctionError> {
        let entries = state_mut::<Vec<(Value, usize)>>(self.name(), state)?;
        match entries.iter_mut().find(|(item, _)| item == value) {
            Some((_, count)) => *count += 1,
            None => entries.push((value.clone(), 1)),
        }
        Ok(())
    }

    fn reverse(&self, state: &mut FunctionState, value: &Value) -> Result<(), FunctionError> {
        let entries = state_mut::<Vec<(Value, usize)>>(self.name(), state)?;
        let Some(pos) = entries.iter().position(|(item, _)| item == value) else {
            return Err(FunctionError::NotAccumulated {
                function: self.name().to_owned(),
                value: value.to_string(),
            });
        };
        entries[pos].1 -= 1;
        if entries[pos].1 == 0 {
            entries.remove(pos);
        }
        Ok(())
    }

    fn result(&self, state: &FunctionState) -> Result<Value, FunctionError> {
        let entries = state_ref::<Vec<(Value, usize)>>(self.name(), state)?;
        Ok(Value::List(
            entries.iter().map(|(item, _)| item.clone()).collect(),
        ))
    }

    fn supports_reverse(&self) -> bool {
        true
    }
}
