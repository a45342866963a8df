//! Integration tests for Layer 2: Resolve
//!
//! Tests for override resolution, MRO aggregation, the query surface, and
//! the class registry.

#[path = "../fixtures/mod.rs"]
mod fixtures;

mod provenance;
