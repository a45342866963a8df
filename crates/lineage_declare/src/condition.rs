//! Run-time conditions gating a pipeline.
//!
//! A condition is a small boolean expression tree over symbolic references
//! to parameters and columns:
//!
//! ```text
//! (value_of(order) == "reversed") & is_provided(file1) & (value_of(multiplier) < 10)
//! ```
//!
//! References are names only. They are checked against the resolved
//! analysis when the class is created and bound to concrete values when a
//! pipeline is selected for a run.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

use lineage_foundation::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Comparison operator between a referenced value and a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CmpOp {
    /// Returns the operator's symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Applies the operator.
    ///
    /// Equality between values of different types is simply false (and
    /// `!=` true); ordering them returns `None`. Ints and floats compare
    /// numerically.
    #[must_use]
    pub fn apply(self, lhs: &Value, rhs: &Value) -> Option<bool> {
        match lhs.compare(rhs) {
            Some(ordering) => Some(match self {
                Self::Eq => ordering == Ordering::Equal,
                Self::Ne => ordering != Ordering::Equal,
                Self::Lt => ordering == Ordering::Less,
                Self::Le => ordering != Ordering::Greater,
                Self::Gt => ordering == Ordering::Greater,
                Self::Ge => ordering != Ordering::Less,
            }),
            None => match self {
                Self::Eq => Some(false),
                Self::Ne => Some(true),
                _ => None,
            },
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Boolean expression tree over parameter and column references.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Condition {
    /// Compare the value of a named parameter/column with a literal.
    Compare {
        /// The referenced parameter or column.
        name: Arc<str>,
        /// The comparison operator.
        op: CmpOp,
        /// The literal on the right-hand side.
        literal: Value,
    },
    /// True if the named column has a concrete value for this run.
    IsProvided(Arc<str>),
    /// Both sides must hold; the right side is skipped if the left is false.
    And(Box<Condition>, Box<Condition>),
    /// Either side must hold; the right side is skipped if the left is true.
    Or(Box<Condition>, Box<Condition>),
    /// Negation.
    Not(Box<Condition>),
}

impl Condition {
    /// Conjunction of `self` and `other`.
    #[must_use]
    pub fn and(self, other: Condition) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Disjunction of `self` and `other`.
    #[must_use]
    pub fn or(self, other: Condition) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Negation of `self`.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Returns every name referenced by this condition, first occurrence first.
    #[must_use]
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Compare { name, .. } | Self::IsProvided(name) => {
                let name: &str = name;
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            Self::And(lhs, rhs) | Self::Or(lhs, rhs) => {
                lhs.collect_names(names);
                rhs.collect_names(names);
            }
            Self::Not(inner) => inner.collect_names(names),
        }
    }
}

impl BitAnd for Condition {
    type Output = Condition;

    fn bitand(self, rhs: Condition) -> Condition {
        self.and(rhs)
    }
}

impl BitOr for Condition {
    type Output = Condition;

    fn bitor(self, rhs: Condition) -> Condition {
        self.or(rhs)
    }
}

impl Not for Condition {
    type Output = Condition;

    fn not(self) -> Condition {
        self.negate()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { name, op, literal } => {
                write!(f, "value_of({name}) {op} {literal}")
            }
            Self::IsProvided(name) => write!(f, "is_provided({name})"),
            Self::And(lhs, rhs) => write!(f, "({lhs} & {rhs})"),
            Self::Or(lhs, rhs) => write!(f, "({lhs} | {rhs})"),
            Self::Not(inner) => write!(f, "!{inner}"),
        }
    }
}

/// A symbolic reference to a parameter's or column's run-time value.
///
/// Created by [`value_of`] and turned into a [`Condition`] by one of its
/// comparison methods.
#[derive(Clone, Debug)]
pub struct ValueOf {
    name: Arc<str>,
}

impl ValueOf {
    fn compare(self, op: CmpOp, literal: impl Into<Value>) -> Condition {
        Condition::Compare {
            name: self.name,
            op,
            literal: literal.into(),
        }
    }

    /// `value_of(name) == literal`
    #[must_use]
    pub fn equals(self, literal: impl Into<Value>) -> Condition {
        self.compare(CmpOp::Eq, literal)
    }

    /// `value_of(name) != literal`
    #[must_use]
    pub fn differs_from(self, literal: impl Into<Value>) -> Condition {
        self.compare(CmpOp::Ne, literal)
    }

    /// `value_of(name) < literal`
    #[must_use]
    pub fn less_than(self, literal: impl Into<Value>) -> Condition {
        self.compare(CmpOp::Lt, literal)
    }

    /// `value_of(name) <= literal`
    #[must_use]
    pub fn at_most(self, literal: impl Into<Value>) -> Condition {
        self.compare(CmpOp::Le, literal)
    }

    /// `value_of(name) > literal`
    #[must_use]
    pub fn greater_than(self, literal: impl Into<Value>) -> Condition {
        self.compare(CmpOp::Gt, literal)
    }

    /// `value_of(name) >= literal`
    #[must_use]
    pub fn at_least(self, literal: impl Into<Value>) -> Condition {
        self.compare(CmpOp::Ge, literal)
    }
}

/// References the run-time value of a parameter or column.
#[must_use]
pub fn value_of(name: impl Into<Arc<str>>) -> ValueOf {
    ValueOf { name: name.into() }
}

/// Tests whether a column has a concrete value for the run.
#[must_use]
pub fn is_provided(name: impl Into<Arc<str>>) -> Condition {
    Condition::IsProvided(name.into())
}
