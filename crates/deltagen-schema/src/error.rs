//! Error types for schema validation.

use thiserror::Error;

/// Errors produced while validating a [`Schema`](crate::Schema).
///
/// Every variant is fatal: a schema that fails validation must not be used
/// to instantiate record types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A record or member name is not a valid identifier.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Two records share the same name.
    #[error("duplicate record type: {name}")]
    DuplicateRecord { name: String },

    /// Two members of one record share the same name.
    #[error("duplicate member {member:?} in record {record}")]
    DuplicateMember { record: String, member: String },

    /// A member references a record type that is not declared.
    #[error("record {record}: member {member:?} references unknown record type {target}")]
    UnknownRecord {
        record: String,
        member: String,
        target: String,
    },

    /// A map key type cannot be hashed or compared for equality.
    #[error("record {record}: map {member:?} has non-hashable key type {key}")]
    InvalidKeyType {
        record: String,
        member: String,
        key: String,
    },

    /// A scalar type string could not be parsed.
    #[error("invalid scalar type {0:?}")]
    InvalidScalarType(String),

    /// More than one record is marked as root.
    #[error("multiple root records: {first} and {second}")]
    MultipleRoots { first: String, second: String },

    /// No record is marked as root but one is required.
    #[error("schema has no root record")]
    MissingRoot,

    /// Record references form a cycle.
    #[error("cyclic record reference: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },
}

/// Convenience type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
