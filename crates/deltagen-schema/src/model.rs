//! Record types and their members.
//!
//! The model is pure data. It is built programmatically (or deserialized by
//! a caller) and checked with [`Schema::validate`] before any record type is
//! instantiated from it.

use serde::{Deserialize, Serialize};

use crate::scalar::ScalarType;

/// One member of a record type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Member {
    /// A comparable primitive value.
    Scalar {
        name: String,
        #[serde(rename = "type")]
        ty: ScalarType,
    },
    /// A nested record, always present.
    Record { name: String, record: String },
    /// A map from a scalar key to records of one type.
    Map {
        name: String,
        key: ScalarType,
        value: String,
    },
}

impl Member {
    /// The member's field name.
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name, .. } | Self::Record { name, .. } | Self::Map { name, .. } => name,
        }
    }

    /// The record type this member refers to, if any.
    pub fn referenced_record(&self) -> Option<&str> {
        match self {
            Self::Scalar { .. } => None,
            Self::Record { record, .. } => Some(record),
            Self::Map { value, .. } => Some(value),
        }
    }

    /// Returns `true` for map members.
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map { .. })
    }
}

/// Declaration of a single record type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDecl {
    /// The record's type name.
    pub name: String,
    /// Members in declaration order.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Whether this record exposes the public diff/merge entry points.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub root: bool,
}

impl RecordDecl {
    /// Start a declaration with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            root: false,
        }
    }

    /// Mark this record as the schema root.
    pub fn root(mut self) -> Self {
        self.root = true;
        self
    }

    /// Append a scalar member.
    pub fn scalar(mut self, name: impl Into<String>, ty: ScalarType) -> Self {
        self.members.push(Member::Scalar {
            name: name.into(),
            ty,
        });
        self
    }

    /// Append a nested-record member.
    pub fn record(mut self, name: impl Into<String>, record: impl Into<String>) -> Self {
        self.members.push(Member::Record {
            name: name.into(),
            record: record.into(),
        });
        self
    }

    /// Append a map member.
    pub fn map(
        mut self,
        name: impl Into<String>,
        key: ScalarType,
        value: impl Into<String>,
    ) -> Self {
        self.members.push(Member::Map {
            name: name.into(),
            key,
            value: value.into(),
        });
        self
    }

    /// Look up a member by field name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// Scalar members in declaration order.
    pub fn scalars(&self) -> impl Iterator<Item = &Member> {
        self.members
            .iter()
            .filter(|m| matches!(m, Member::Scalar { .. }))
    }

    /// Nested-record members in declaration order.
    pub fn records(&self) -> impl Iterator<Item = &Member> {
        self.members
            .iter()
            .filter(|m| matches!(m, Member::Record { .. }))
    }

    /// Map members in declaration order.
    pub fn maps(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_map())
    }

    /// Name of the delta type that mirrors this record.
    pub fn delta_name(&self) -> String {
        format!("{}Delta", self.name)
    }
}

/// An ordered collection of record declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub records: Vec<RecordDecl>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record declaration.
    pub fn with(mut self, record: RecordDecl) -> Self {
        self.records.push(record);
        self
    }

    /// Append a record declaration in place.
    pub fn push(&mut self, record: RecordDecl) {
        self.records.push(record);
    }

    /// Look up a record declaration by name.
    pub fn get(&self, name: &str) -> Option<&RecordDecl> {
        self.records.iter().find(|r| r.name == name)
    }

    /// The record marked as root, if any.
    pub fn root(&self) -> Option<&RecordDecl> {
        self.records.iter().find(|r| r.root)
    }

    /// Number of declared records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records are declared.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<RecordDecl> for Schema {
    fn from_iter<I: IntoIterator<Item = RecordDecl>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Returns `true` if `s` is a plain identifier (`[A-Za-z_][A-Za-z0-9_]*`, not `_`).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    s != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
