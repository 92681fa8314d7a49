//! Semantic types for declarations and aggregate results.

use std::fmt;

/// Semantic type of a declaration or an aggregate result.
///
/// Types are deliberately coarse: the builder only needs them to type result
/// bindings and to hand declaration types to the expression analyzer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Unknown or dynamically typed.
    #[default]
    Any,
    Bool,
    /// Signed 64-bit integer (`count` results, `int`/`long` locals).
    Integer,
    /// Floating point (`sum`/`average` results).
    Numeric,
    Text,
    /// Ordered collection (`collectList`/`collectSet` results).
    List,
    /// Fact object of the named type.
    Object(String),
}

impl ValueType {
    /// Map a host type name (as written in inline accumulate code) to a semantic type.
    ///
    /// Unknown names are treated as object types.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "int" | "long" | "short" | "byte" | "Integer" | "Long" | "BigInteger" => {
                Self::Integer
            }
            "double" | "float" | "Double" | "Float" | "Number" | "BigDecimal" => Self::Numeric,
            "boolean" | "Boolean" => Self::Bool,
            "String" | "char" | "Character" => Self::Text,
            "List" | "Set" | "Collection" | "ArrayList" | "HashSet" => Self::List,
            "Object" => Self::Any,
            other => Self::Object(other.to_owned()),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Numeric)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Bool => write!(f, "boolean"),
            Self::Integer => write!(f, "integer"),
            Self::Numeric => write!(f, "numeric"),
            Self::Text => write!(f, "text"),
            Self::List => write!(f, "list"),
            Self::Object(name) => write!(f, "{name}"),
        }
    }
}
