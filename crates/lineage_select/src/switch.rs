//! Switch evaluation.
//!
//! A switch is a method that inspects the run's inputs and returns a
//! discriminator value. The core never runs it; it asks a
//! [`SwitchEvaluator`] supplied by the execution collaborator.

use std::sync::Arc;

use lineage_foundation::{Error, OrderedTable, Result, Value};
use lineage_resolve::SwitchSpec;

use crate::context::ValueProvider;

/// Computes the discriminator value of a switch for one run.
pub trait SwitchEvaluator {
    /// Evaluates `switch` against the run's values.
    ///
    /// # Errors
    /// Implementations return an error when the switch cannot be evaluated.
    fn evaluate(&self, switch: &SwitchSpec, values: &dyn ValueProvider) -> Result<Value>;
}

impl<F> SwitchEvaluator for F
where
    F: Fn(&SwitchSpec, &dyn ValueProvider) -> Result<Value>,
{
    fn evaluate(&self, switch: &SwitchSpec, values: &dyn ValueProvider) -> Result<Value> {
        self(switch, values)
    }
}

/// Fixed switch results, keyed by switch name.
///
/// Useful when the discriminators are already known, e.g. recorded from a
/// previous run or chosen in a test.
#[derive(Clone, Debug, Default)]
pub struct SwitchValues {
    values: OrderedTable<Value>,
}

impl SwitchValues {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the result of a switch.
    #[must_use]
    pub fn with(mut self, switch: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.values = self.values.insert(switch, value.into());
        self
    }
}

impl SwitchEvaluator for SwitchValues {
    fn evaluate(&self, switch: &SwitchSpec, _values: &dyn ValueProvider) -> Result<Value> {
        self.values.get(&switch.name).cloned().ok_or_else(|| {
            Error::condition(&*switch.name, "no result was supplied for this switch")
        })
    }
}
