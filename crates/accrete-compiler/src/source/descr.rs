use rowan::TextRange;

/// A field binding inside a pattern: `$a : amount` with the field's declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldBindingDescr {
    pub identifier: String,
    pub field: String,
    pub type_name: String,
}

/// `$o : Order($a : amount)` as parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternDescr {
    pub object_type: String,
    pub identifier: Option<String>,
    pub bindings: Vec<FieldBindingDescr>,
    pub range: TextRange,
}

impl PatternDescr {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            identifier: None,
            bindings: Vec::new(),
            range: TextRange::default(),
        }
    }

    /// Bind the matched object itself.
    pub fn bind_as(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn field(
        mut self,
        identifier: impl Into<String>,
        field: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        self.bindings.push(FieldBindingDescr {
            identifier: identifier.into(),
            field: field.into(),
            type_name: type_name.into(),
        });
        self
    }

    pub fn at(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }
}

/// A condition as parsed, before it is built into patterns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConditionDescr {
    Pattern(PatternDescr),
    And(Vec<ConditionDescr>),
    Or(Vec<ConditionDescr>),
    Not(Box<ConditionDescr>),
    Exists(Box<ConditionDescr>),
}

impl ConditionDescr {
    /// Whether the condition can be built at all: patterns name a type and
    /// groups are non-empty.
    pub fn is_valid(&self) -> bool {
        match self {
            ConditionDescr::Pattern(p) => !p.object_type.trim().is_empty(),
            ConditionDescr::And(children) | ConditionDescr::Or(children) => {
                !children.is_empty() && children.iter().all(ConditionDescr::is_valid)
            }
            ConditionDescr::Not(inner) | ConditionDescr::Exists(inner) => inner.is_valid(),
        }
    }

    /// Replace a single-child `And` by its child, recursively.
    pub fn desugar(self) -> Self {
        match self {
            ConditionDescr::And(mut children) if children.len() == 1 => {
                children.remove(0).desugar()
            }
            other => other,
        }
    }
}

impl From<PatternDescr> for ConditionDescr {
    fn from(pattern: PatternDescr) -> Self {
        ConditionDescr::Pattern(pattern)
    }
}
