//! Run-time pipeline selection for Lineage.
//!
//! This crate answers "which pipeline produces this column for this run?":
//! - [`RunContext`] / [`ValueProvider`] - Concrete values for one run
//! - [`evaluate`] - Short-circuiting condition evaluation
//! - [`SwitchEvaluator`] - Delegated evaluation of switch methods
//! - [`PipelineSelector`] - Switch filter, then condition filter, then exactly one survivor
//! - [`PipelineRequest`] / [`PipelineExecutor`] - The boundary to the execution collaborator
//!
//! Selection never mutates the resolved spec and is a pure function of the
//! supplied values, so it may be called concurrently against a shared spec.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod binding;
pub mod context;
pub mod eval;
pub mod select;
pub mod switch;

pub use binding::{PipelineBinding, PipelineExecutor, PipelineRequest, execute};
pub use context::{Provision, RunContext, ValueProvider};
pub use eval::evaluate;
pub use select::PipelineSelector;
pub use switch::{SwitchEvaluator, SwitchValues};
