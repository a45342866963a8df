//! Core values, types, class identities, and errors for Lineage.
//!
//! This crate provides:
//! - [`Value`] - Literal values for defaults, choices, and condition operands
//! - [`Type`] - Declared value types, including file-format references
//! - [`ClassId`] - Qualified identities of analysis and format classes
//! - [`DataSpace`] / [`RowFrequency`] - Row-frequency levels of a data hierarchy
//! - Salience tiers ([`ColumnSalience`], [`ParameterSalience`], [`CheckSalience`])
//! - [`Error`] - Rich error types naming the offending class and declaration
//! - [`OrderedTable`] - Insertion-ordered persistent tables with structural sharing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod class;
pub mod collections;
pub mod error;
pub mod frequency;
pub mod salience;
pub mod types;
pub mod value;

pub use class::ClassId;
pub use collections::OrderedTable;
pub use error::{Candidate, DeclKind, Error, ErrorContext, ErrorKind, Rejection};
pub use frequency::{DataSpace, RowFrequency};
pub use salience::{CheckSalience, CheckStatus, ColumnSalience, ParameterSalience};
pub use types::Type;
pub use value::Value;

/// Result type alias using the Lineage error type.
pub type Result<T> = std::result::Result<T, Error>;
