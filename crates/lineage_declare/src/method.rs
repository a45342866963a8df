//! Handles to the methods behind pipelines, switches, and checks.
//!
//! The core never calls these methods. It records which class defined a
//! method, under what name, and the named arguments its signature declares
//! (excluding the implicit receiver and workflow arguments), so that an
//! execution collaborator can look the method up and bind concrete data.

use std::fmt;
use std::sync::Arc;

use lineage_foundation::{ClassId, Type};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One named argument of a method signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodArg {
    /// The argument name, matched against column and parameter names.
    pub name: Arc<str>,
    /// The type the method wants the value in, if annotated.
    ///
    /// For columns this may differ from the stored type; converting between
    /// formats is left to the collaborator.
    pub ty: Option<Type>,
}

impl MethodArg {
    /// Creates an unannotated argument.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            ty: None,
        }
    }

    /// Creates an argument annotated with the type it expects.
    #[must_use]
    pub fn typed(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
        }
    }
}

/// Handle to a method declared in an analysis class body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodRef {
    /// The class whose body declared the method.
    pub owner: ClassId,
    /// The method name.
    pub name: Arc<str>,
    /// The declared arguments, in signature order.
    pub args: Arc<[MethodArg]>,
}

impl MethodRef {
    /// Creates a method handle.
    #[must_use]
    pub fn new(owner: ClassId, name: impl Into<Arc<str>>, args: Vec<MethodArg>) -> Self {
        Self {
            owner,
            name: name.into(),
            args: args.into(),
        }
    }

    /// Returns the argument names in signature order.
    pub fn arg_names(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|arg| arg.name.as_ref())
    }

    /// Returns the annotated type of an argument, if any.
    #[must_use]
    pub fn arg_type(&self, name: &str) -> Option<&Type> {
        self.args
            .iter()
            .find(|arg| arg.name.as_ref() == name)
            .and_then(|arg| arg.ty.as_ref())
    }

    /// Returns the qualified location, `module:Class.method`.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}.{}", self.owner, self.name)
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.location())?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg.name)?;
            if let Some(ty) = &arg.ty {
                write!(f, ": {ty}")?;
            }
        }
        write!(f, ")")
    }
}
