//! Lineage - Inheritance-aware analysis specifications
//!
//! This crate re-exports all layers of the Lineage system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: lineage_runtime     — Spec records, MessagePack, class resolution
//! Layer 3: lineage_select      — Condition evaluation, pipeline selection
//! Layer 2: lineage_resolve     — Override resolution, MRO, AnalysisSpec, registry
//! Layer 1: lineage_declare     — Declarations, inherit markers, class bodies
//! Layer 0: lineage_foundation  — Core types (Value, Type, ClassId, Error)
//! ```

pub use lineage_declare as declare;
pub use lineage_foundation as foundation;
pub use lineage_resolve as resolve;
pub use lineage_runtime as runtime;
pub use lineage_select as select;
