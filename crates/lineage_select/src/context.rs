//! Per-run value contexts.
//!
//! Conditions and switches look names up in a [`ValueProvider`]. A name can
//! be in one of three states for a run:
//! - provided, with a concrete value
//! - explicitly not provided (e.g. an optional input column left empty)
//! - absent, meaning the context knows nothing about it, which is an error
//!   whenever a condition needs it

use std::sync::Arc;

use lineage_foundation::{Error, OrderedTable, Result, Value};
use lineage_resolve::AnalysisSpec;

/// What a value context knows about one name.
#[derive(Clone, Debug, PartialEq)]
pub enum Provision {
    /// A concrete value is available.
    Provided(Value),
    /// The name is known but has no value for this run.
    NotProvided,
}

impl Provision {
    /// Returns the value, if provided.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Provided(value) => Some(value),
            Self::NotProvided => None,
        }
    }

    /// Returns true if a concrete value is available.
    #[must_use]
    pub fn is_provided(&self) -> bool {
        matches!(self, Self::Provided(_))
    }
}

/// The `value_of(name)` capability, scoped to one concrete run.
pub trait ValueProvider {
    /// Looks up a name; `None` means the name is absent from the context.
    fn provision(&self, name: &str) -> Option<Provision>;
}

impl<F> ValueProvider for F
where
    F: Fn(&str) -> Option<Provision>,
{
    fn provision(&self, name: &str) -> Option<Provision> {
        self(name)
    }
}

/// A concrete value context for one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunContext {
    entries: OrderedTable<Provision>,
}

impl RunContext {
    /// Creates an empty context in which every name is absent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context for a run of `spec`.
    ///
    /// Parameters start at their defaults; parameters without a default and
    /// all columns start as not provided.
    #[must_use]
    pub fn for_spec(spec: &AnalysisSpec) -> Self {
        let columns = spec
            .columns()
            .map(|c| (c.name.clone(), Provision::NotProvided));
        let parameters = spec.parameters().map(|p| {
            let provision = p
                .default
                .clone()
                .map_or(Provision::NotProvided, Provision::Provided);
            (p.name.clone(), provision)
        });
        Self {
            entries: columns.chain(parameters).collect(),
        }
    }

    /// Provides a concrete value for `name`.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.set_value(name, value);
        self
    }

    /// Marks `name` as explicitly not provided.
    #[must_use]
    pub fn with_not_provided(mut self, name: impl Into<Arc<str>>) -> Self {
        self.entries = self.entries.insert(name, Provision::NotProvided);
        self
    }

    /// Provides a concrete value for `name` in place.
    pub fn set_value(&mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) {
        self.entries = self.entries.insert(name, Provision::Provided(value.into()));
    }

    /// Looks up what the context knows about `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Provision> {
        self.entries.get(name)
    }

    /// Returns the concrete value of `name`, if provided.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Provision::value)
    }

    /// Returns the names known to the context, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.names()
    }

    /// Checks every provided parameter value against its declaration.
    ///
    /// # Errors
    /// Returns `TypeMismatch` for a value of the wrong type and
    /// `ConditionEvaluation` for a value outside the parameter's choices.
    pub fn check_parameters(&self, spec: &AnalysisSpec) -> Result<()> {
        for parameter in spec.parameters() {
            let Some(value) = self.value(&parameter.name) else {
                continue;
            };
            if !parameter.ty.accepts(&value.value_type()) {
                return Err(Error::type_mismatch(parameter.ty.clone(), value.value_type())
                    .with_frame(format!("parameter '{}' of {}", parameter.name, spec.class())));
            }
            if !parameter.allows(value) {
                return Err(Error::condition(
                    &*parameter.name,
                    format!("{value} is not one of the allowed choices"),
                )
                .in_declaration(spec.class(), format!("parameter '{}'", parameter.name)));
            }
        }
        Ok(())
    }
}

impl ValueProvider for RunContext {
    fn provision(&self, name: &str) -> Option<Provision> {
        self.get(name).cloned()
    }
}
