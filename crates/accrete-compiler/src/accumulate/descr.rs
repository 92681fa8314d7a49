use rowan::TextRange;

use crate::source::ConditionDescr;

/// `sum($o.amount)` with an optional result binding: `$total : sum($o.amount)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionCallDescr {
    pub function: String,
    pub params: Vec<String>,
    pub bind: Option<String>,
    pub range: TextRange,
}

impl FunctionCallDescr {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            params: Vec::new(),
            bind: None,
            range: TextRange::default(),
        }
    }

    pub fn param(mut self, expression: impl Into<String>) -> Self {
        self.params.push(expression.into());
        self
    }

    pub fn bind(mut self, identifier: impl Into<String>) -> Self {
        self.bind = Some(identifier.into());
        self
    }

    pub fn at(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }

    /// The accumulated expression. Calls without arguments accumulate an
    /// empty string literal.
    pub fn first_argument(&self) -> &str {
        self.params.first().map_or("\"\"", String::as_str)
    }
}

/// `init(..) action(..) reverse(..) result(..)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineDescr {
    pub init_code: String,
    pub action_code: String,
    pub reverse_code: Option<String>,
    pub result_code: String,
}

impl InlineDescr {
    pub fn new(
        init_code: impl Into<String>,
        action_code: impl Into<String>,
        result_code: impl Into<String>,
    ) -> Self {
        Self {
            init_code: init_code.into(),
            action_code: action_code.into(),
            reverse_code: None,
            result_code: result_code.into(),
        }
    }

    pub fn reverse(mut self, code: impl Into<String>) -> Self {
        self.reverse_code = Some(code.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccumulateBody {
    Functions(Vec<FunctionCallDescr>),
    Inline(InlineDescr),
}

/// An `accumulate` clause as parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccumulateDescr {
    pub input: Option<ConditionDescr>,
    pub body: AccumulateBody,
    pub range: TextRange,
}

impl AccumulateDescr {
    pub fn functions(input: impl Into<ConditionDescr>, calls: Vec<FunctionCallDescr>) -> Self {
        Self {
            input: Some(input.into()),
            body: AccumulateBody::Functions(calls),
            range: TextRange::default(),
        }
    }

    pub fn inline(input: impl Into<ConditionDescr>, body: InlineDescr) -> Self {
        Self {
            input: Some(input.into()),
            body: AccumulateBody::Inline(body),
            range: TextRange::default(),
        }
    }

    pub fn at(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }

    pub fn has_valid_input(&self) -> bool {
        self.input.as_ref().is_some_and(ConditionDescr::is_valid)
    }

    pub fn is_multi_function(&self) -> bool {
        matches!(&self.body, AccumulateBody::Functions(calls) if calls.len() > 1)
    }
}
