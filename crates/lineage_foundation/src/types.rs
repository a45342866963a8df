//! Type descriptors for declared columns and parameters.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::class::ClassId;
use crate::{Error, ErrorKind};

/// Type descriptor for a declared column or parameter.
///
/// Columns are usually typed by a file format, which is referenced by the
/// qualified name of its class only; conversion between formats is the
/// business of a collaborator.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// String type.
    Str,
    /// Any type (accepts any value).
    Any,
    /// A file-format class, referenced by qualified name.
    Format(ClassId),
}

impl Type {
    /// Creates a file-format type from a `module:Name` pair.
    #[must_use]
    pub fn format(module: &str, name: &str) -> Self {
        Self::Format(ClassId::new(module, name))
    }

    /// Returns true if this type is `Any`.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns the format class if this is a format type.
    #[must_use]
    pub const fn as_format(&self) -> Option<&ClassId> {
        match self {
            Self::Format(class) => Some(class),
            _ => None,
        }
    }

    /// Checks if a value of type `actual` is accepted where `self` is declared.
    ///
    /// - `Any` accepts all types
    /// - `Float` accepts `Int` (numeric promotion)
    /// - Format types must name the same class
    #[must_use]
    pub fn accepts(&self, actual: &Type) -> bool {
        match (self, actual) {
            (Self::Any, _)
            | (Self::Bool, Self::Bool)
            | (Self::Int | Self::Float, Self::Int)
            | (Self::Float, Self::Float)
            | (Self::Str, Self::Str) => true,
            (Self::Format(expected), Self::Format(found)) => expected == found,
            _ => false,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Str => write!(f, "str"),
            Self::Any => write!(f, "any"),
            Self::Format(class) => write!(f, "{}", class.location()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Type {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bool" => Ok(Self::Bool),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "str" => Ok(Self::Str),
            "any" => Ok(Self::Any),
            other if other.starts_with('<') => ClassId::parse(other).map(Self::Format),
            other => Err(Error::new(ErrorKind::InvalidClassLocation(other.to_string()))),
        }
    }
}
