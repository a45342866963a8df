//! Record serialization and class resolution for Lineage.
//!
//! This crate provides:
//! - [`SpecRecord`] - A stable, serializable record of a resolved analysis spec
//! - [`ClassResolver`] - Resolution of qualified class names back to live classes
//! - [`DeserializeOptions`] - Scoped strict/permissive resolution settings
//! - `MessagePack` bytes and files for spec records

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod record;
pub mod resolver;
pub mod serialize;

pub use record::{
    ArgRecord, CheckRecord, ColumnRecord, DeclRecord, ParameterRecord, PipelineRecord,
    RECORD_VERSION, SpecRecord, SubanalysisRecord, SwitchRecord, from_record, to_record,
};
pub use resolver::{ClassResolver, DeserializeOptions};
pub use serialize::{from_bytes, load_from_file, save_to_file, to_bytes};
