use indexmap::IndexMap;

use crate::scope::{Declaration, Pattern};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
    And,
    Or,
    Not,
    Exists,
}

/// A built group of condition elements.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupElement {
    kind: GroupKind,
    children: Vec<RuleConditionElement>,
}

impl GroupElement {
    pub fn new(kind: GroupKind, children: Vec<RuleConditionElement>) -> Self {
        Self { kind, children }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn children(&self) -> &[RuleConditionElement] {
        &self.children
    }
}

/// A built condition: the source an accumulate iterates over.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleConditionElement {
    Pattern(Pattern),
    Group(GroupElement),
}

impl RuleConditionElement {
    /// Declarations this element exposes to code that consumes its matches.
    ///
    /// `Not` and `Exists` never bind anything outward.
    pub fn outer_declarations(&self) -> IndexMap<String, Declaration> {
        let mut declarations = IndexMap::new();
        self.collect_outer(&mut declarations);
        declarations
    }

    fn collect_outer(&self, into: &mut IndexMap<String, Declaration>) {
        match self {
            RuleConditionElement::Pattern(pattern) => {
                for declaration in pattern.declarations() {
                    into.insert(declaration.identifier().to_owned(), declaration.clone());
                }
            }
            RuleConditionElement::Group(group) => match group.kind {
                GroupKind::And | GroupKind::Or => {
                    for child in &group.children {
                        child.collect_outer(into);
                    }
                }
                GroupKind::Not | GroupKind::Exists => {}
            },
        }
    }

    /// Whether one accumulated match spans several tuple objects.
    pub fn is_multi_pattern(&self) -> bool {
        match self {
            RuleConditionElement::Pattern(pattern) => pattern.has_nested_source(),
            RuleConditionElement::Group(group) => group.children.len() > 1,
        }
    }

    /// Every pattern in the element, depth first.
    pub fn patterns(&self) -> Vec<&Pattern> {
        match self {
            RuleConditionElement::Pattern(pattern) => vec![pattern],
            RuleConditionElement::Group(group) => {
                group.children.iter().flat_map(|c| c.patterns()).collect()
            }
        }
    }

    /// The lowest tuple offset used by the element.
    pub fn first_offset(&self) -> Option<usize> {
        self.patterns().iter().map(|p| p.offset()).min()
    }

    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            RuleConditionElement::Pattern(pattern) => Some(pattern),
            RuleConditionElement::Group(_) => None,
        }
    }
}

impl From<Pattern> for RuleConditionElement {
    fn from(pattern: Pattern) -> Self {
        RuleConditionElement::Pattern(pattern)
    }
}
