//! `literal | name | name.field.field` argument expressions.

use accrete_compiler::compile::AccumulateError;
use accrete_compiler::scope::Declaration;
use accrete_core::{ReadError, Tuple, Value};

/// A parsed argument expression.
#[derive(Clone, Debug, PartialEq)]
pub enum PathExpr {
    Literal(Value),
    Path { root: String, fields: Vec<String> },
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl PathExpr {
    pub fn parse(expression: &str) -> Result<Self, String> {
        let text = expression.trim();
        if text.is_empty() {
            return Err("empty expression".into());
        }

        if let Some(inner) = text
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            if inner.contains('"') {
                return Err(format!("unsupported string literal {text}"));
            }
            return Ok(PathExpr::Literal(Value::Text(inner.to_owned())));
        }
        match text {
            "null" => return Ok(PathExpr::Literal(Value::Null)),
            "true" => return Ok(PathExpr::Literal(Value::Bool(true))),
            "false" => return Ok(PathExpr::Literal(Value::Bool(false))),
            _ => {}
        }
        if text.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(PathExpr::Literal(Value::Int(i)));
            }
            if let Ok(f) = text.parse::<f64>() {
                return Ok(PathExpr::Literal(Value::Float(f)));
            }
            return Err(format!("invalid number `{text}`"));
        }

        let mut segments = text.split('.').map(str::trim);
        let root = segments.next().unwrap_or_default();
        let fields: Vec<String> = segments.map(str::to_owned).collect();
        if !is_identifier(root) || !fields.iter().all(|f| is_identifier(f)) {
            return Err(format!("expected `name` or `name.field`, found `{text}`"));
        }
        Ok(PathExpr::Path {
            root: root.to_owned(),
            fields,
        })
    }
}

/// Where the root of a path reads from.
#[derive(Clone, Debug)]
pub(crate) enum Root {
    Literal(Value),
    /// Bound inside the accumulate source.
    Inner(Declaration),
    /// Bound by the enclosing rule.
    Outer(Declaration),
    Global(Value),
}

/// A path resolved against the declarations of one compile request.
#[derive(Clone, Debug)]
pub(crate) struct CompiledPath {
    pub(crate) root: Root,
    pub(crate) fields: Vec<String>,
    pub(crate) read_locals_from_tuple: bool,
}

impl CompiledPath {
    pub(crate) fn evaluate(&self, tuple: &Tuple, fact: &Value) -> Result<Value, AccumulateError> {
        let mut current = match &self.root {
            Root::Literal(value) | Root::Global(value) => value,
            Root::Inner(declaration) if self.read_locals_from_tuple => declaration.value(tuple)?,
            Root::Inner(declaration) => declaration.value_of(fact)?,
            Root::Outer(declaration) => declaration.value(tuple)?,
        };
        for field in &self.fields {
            current = read_field(current, field)?;
        }
        Ok(current.clone())
    }
}

fn read_field<'v>(value: &'v Value, field: &str) -> Result<&'v Value, ReadError> {
    let fact = value.as_fact().ok_or_else(|| ReadError::NotAFact {
        found: value.value_type(),
    })?;
    fact.field(field).ok_or_else(|| ReadError::MissingField {
        object_type: fact.object_type().to_owned(),
        field: field.to_owned(),
    })
}
