//! Schema model for deltagen.
//!
//! A [`Schema`] is an ordered collection of [`RecordDecl`]s. Each record is
//! made of scalar, nested-record, and map [`Member`]s. At most one record is
//! marked as the root: the type that exposes the public diff/merge entry
//! points.
//!
//! Malformed schemas are rejected by [`Schema::validate`] before any record
//! type is built from them; this is the only fallible step in the system.
//!
//! # Key Types
//!
//! - [`Schema`] / [`RecordDecl`] / [`Member`] -- The declarations
//! - [`ScalarType`] -- Comparable primitive types for scalars and map keys
//! - [`ValidationConfig`] -- Validation policy
//! - [`SchemaError`] -- Validation failures

pub mod config;
pub mod error;
pub mod model;
pub mod scalar;
pub mod validate;

pub use config::ValidationConfig;
pub use error::{Result, SchemaError};
pub use model::{is_identifier, Member, RecordDecl, Schema};
pub use scalar::ScalarType;
