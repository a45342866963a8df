//! Declaration primitives for Lineage analyses.
//!
//! This crate provides the raw, unresolved records an analysis class body
//! is made of:
//! - [`ColumnDecl`] / [`ParameterDecl`] - Fresh typed declarations
//! - [`InheritDecl`] - "Reuse the base's declaration", optionally with overrides
//! - [`PipelineDecl`] / [`SwitchDecl`] / [`CheckDecl`] - Method declarations
//! - [`SubanalysisDecl`] - Composition of another analysis
//! - [`Condition`] - Run-time conditions gating a pipeline
//! - [`ClassBody`] - Everything one class declares, in declaration order
//!
//! Nothing here knows about inheritance; a class body only records what was
//! declared where. Resolution against the hierarchy happens in
//! `lineage_resolve`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod body;
pub mod condition;
pub mod decl;
pub mod method;

pub use body::ClassBody;
pub use condition::{CmpOp, Condition, ValueOf, is_provided, value_of};
pub use decl::{
    AttributeDecl, CheckDecl, ColumnDecl, InheritDecl, Override, ParameterDecl, PipelineDecl,
    SubanalysisDecl, SwitchDecl, SwitchRef, inherited_from,
};
pub use method::{MethodArg, MethodRef};
