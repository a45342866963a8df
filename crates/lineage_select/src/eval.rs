//! Condition evaluation against a run's value context.

use lineage_declare::Condition;
use lineage_foundation::{Error, Result};

use crate::context::{Provision, ValueProvider};

/// Evaluates a condition against concrete run-time values.
///
/// `&` and `|` short-circuit: the right side is not looked at when the left
/// side decides the result, so a name it references may be absent.
///
/// # Errors
/// Returns `ConditionEvaluation` if a referenced name is absent from the
/// context, if a comparison reads a value that is not provided, or if an
/// ordering compares values that cannot be ordered.
pub fn evaluate(condition: &Condition, values: &dyn ValueProvider) -> Result<bool> {
    match condition {
        Condition::Compare { name, op, literal } => match lookup(values, name)? {
            Provision::Provided(value) => op.apply(&value, literal).ok_or_else(|| {
                Error::condition(&**name, format!("cannot compare {value} {op} {literal}"))
            }),
            Provision::NotProvided => Err(Error::condition(
                &**name,
                "has no value for this run (guard the comparison with is_provided)",
            )),
        },
        Condition::IsProvided(name) => Ok(lookup(values, name)?.is_provided()),
        Condition::And(lhs, rhs) => Ok(evaluate(lhs, values)? && evaluate(rhs, values)?),
        Condition::Or(lhs, rhs) => Ok(evaluate(lhs, values)? || evaluate(rhs, values)?),
        Condition::Not(inner) => Ok(!evaluate(inner, values)?),
    }
}

fn lookup(values: &dyn ValueProvider, name: &str) -> Result<Provision> {
    values
        .provision(name)
        .ok_or_else(|| Error::condition(name, "is not present in the run context"))
}
