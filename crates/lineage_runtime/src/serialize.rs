//! Spec serialization and deserialization using `MessagePack`.
//!
//! Specs are written in their record form (see [`SpecRecord`]) with named
//! fields, so files stay readable by other `MessagePack` tooling.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use lineage_foundation::{Error, ErrorKind, Result};
use lineage_resolve::AnalysisSpec;

use crate::record::{SpecRecord, from_record, to_record};
use crate::resolver::{ClassResolver, DeserializeOptions};

/// Serializes a spec to bytes using `MessagePack` format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(spec: &AnalysisSpec) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(&to_record(spec))
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Deserializes a spec from `MessagePack` bytes, resolving its class
/// references through `resolver`.
///
/// # Errors
///
/// Returns an error if the bytes are not a spec record or if the record
/// cannot be rebuilt (see [`from_record`]).
pub fn from_bytes(
    bytes: &[u8],
    resolver: &dyn ClassResolver,
    options: &DeserializeOptions,
) -> Result<AnalysisSpec> {
    let record: SpecRecord = rmp_serde::from_slice(bytes)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))?;
    from_record(&record, resolver, options)
}

/// Saves a spec to a file using `MessagePack` format.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(spec: &AnalysisSpec, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to create file '{}': {e}",
            path.display()
        )))
    })?;

    let mut writer = BufWriter::new(file);
    let bytes = to_bytes(spec)?;

    writer.write_all(&bytes).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to write to file '{}': {e}",
            path.display()
        )))
    })?;

    writer.flush().map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to flush file '{}': {e}",
            path.display()
        )))
    })
}

/// Loads a spec from a `MessagePack` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or if deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(
    path: P,
    resolver: &dyn ClassResolver,
    options: &DeserializeOptions,
) -> Result<AnalysisSpec> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to open file '{}': {e}",
            path.display()
        )))
    })?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();

    reader.read_to_end(&mut bytes).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to read file '{}': {e}",
            path.display()
        )))
    })?;

    from_bytes(&bytes, resolver, options)
        .map_err(|e| e.with_frame(format!("loading '{}'", path.display())))
}
