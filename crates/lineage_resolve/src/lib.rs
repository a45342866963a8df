//! Override resolution and hierarchy aggregation for Lineage.
//!
//! This crate turns raw class bodies into resolved specifications:
//! - [`AnalysisRegistry`] - Registers class bodies and caches their resolved specs
//! - [`AnalysisSpec`] - The flattened, queryable specification of one class
//! - [`ColumnSpec`] / [`ParameterSpec`] - Resolved data attributes with provenance
//! - [`PipelineSpec`] / [`SwitchSpec`] / [`CheckSpec`] - Resolved method bindings
//! - [`linearize`] - C3 method-resolution order
//!
//! A spec is built exactly once per class, when its body is registered, and
//! is immutable afterwards. Derived classes fold their own declarations over
//! a structurally shared snapshot of their parent's spec.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod aggregate;
mod merge;
pub mod mro;
pub mod registry;
pub mod spec;

pub use mro::linearize;
pub use registry::AnalysisRegistry;
pub use spec::{
    AnalysisSpec, CheckSpec, ColumnSpec, ParameterSpec, PipelineSpec, SubanalysisSpec, SwitchSpec,
};
