//! Schema validation.
//!
//! A schema is accepted when:
//! - every record and member name is a plain identifier
//! - record names are unique, and member names are unique within a record
//! - every referenced record type is declared
//! - every scalar and key type has a non-empty spelling
//! - every map key type is hashable
//! - at most one record is marked as root
//! - record references contain no cycle (see [`ValidationConfig`])

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::ValidationConfig;
use crate::error::{Result, SchemaError};
use crate::model::{is_identifier, Member, RecordDecl, Schema};

impl Schema {
    /// Validate this schema, returning the first problem found.
    pub fn validate(&self, config: &ValidationConfig) -> Result<()> {
        let mut seen = HashSet::new();
        for record in &self.records {
            check_name(&record.name)?;
            if !seen.insert(record.name.as_str()) {
                return Err(SchemaError::DuplicateRecord {
                    name: record.name.clone(),
                });
            }
        }

        for record in &self.records {
            check_members(record, &seen)?;
        }

        let mut roots = self.records.iter().filter(|r| r.root);
        match (roots.next(), roots.next()) {
            (Some(first), Some(second)) => {
                return Err(SchemaError::MultipleRoots {
                    first: first.name.clone(),
                    second: second.name.clone(),
                });
            }
            (None, _) if config.require_root => return Err(SchemaError::MissingRoot),
            _ => {}
        }

        check_cycles(self, config.allow_map_cycles)?;

        debug!(
            records = self.records.len(),
            root = self.root().map(|r| r.name.as_str()).unwrap_or("-"),
            "schema validated"
        );
        Ok(())
    }

    /// Validate and return the schema, for use in builder chains.
    pub fn validated(self, config: &ValidationConfig) -> Result<Self> {
        self.validate(config)?;
        Ok(self)
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SchemaError::InvalidName {
            name: name.to_string(),
            reason: "name must not be empty".into(),
        });
    }
    if !is_identifier(name) {
        return Err(SchemaError::InvalidName {
            name: name.to_string(),
            reason: "must be an identifier ([A-Za-z_][A-Za-z0-9_]*)".into(),
        });
    }
    Ok(())
}

fn check_members(record: &RecordDecl, declared: &HashSet<&str>) -> Result<()> {
    let mut names = HashSet::new();
    for member in &record.members {
        check_name(member.name())?;
        if !names.insert(member.name()) {
            return Err(SchemaError::DuplicateMember {
                record: record.name.clone(),
                member: member.name().to_string(),
            });
        }

        if let Some(target) = member.referenced_record() {
            if !declared.contains(target) {
                return Err(SchemaError::UnknownRecord {
                    record: record.name.clone(),
                    member: member.name().to_string(),
                    target: target.to_string(),
                });
            }
        }

        let ty = match member {
            Member::Scalar { ty, .. } => Some(ty),
            Member::Map { key, .. } => Some(key),
            Member::Record { .. } => None,
        };
        if ty.is_some_and(|ty| ty.as_str().is_empty()) {
            return Err(SchemaError::InvalidScalarType(String::new()));
        }

        if let Member::Map { name, key, .. } = member {
            if !key.is_hashable() {
                return Err(SchemaError::InvalidKeyType {
                    record: record.name.clone(),
                    member: name.clone(),
                    key: key.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search over record references in declaration order.
///
/// When `skip_map_edges` is set only nested-record edges are followed, so a
/// cycle is reported only if it is made entirely of nested records.
fn check_cycles(schema: &Schema, skip_map_edges: bool) -> Result<()> {
    let index: HashMap<&str, &RecordDecl> = schema
        .records
        .iter()
        .map(|r| (r.name.as_str(), r))
        .collect();
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut stack: Vec<&str> = Vec::new();

    for record in &schema.records {
        visit(record, &index, &mut marks, &mut stack, skip_map_edges)?;
    }
    Ok(())
}

fn visit<'a>(
    record: &'a RecordDecl,
    index: &HashMap<&'a str, &'a RecordDecl>,
    marks: &mut HashMap<&'a str, Mark>,
    stack: &mut Vec<&'a str>,
    skip_map_edges: bool,
) -> Result<()> {
    match marks.get(record.name.as_str()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack
                .iter()
                .position(|name| *name == record.name)
                .unwrap_or(0);
            let mut path: Vec<String> = stack[start..].iter().map(|s| s.to_string()).collect();
            path.push(record.name.clone());
            return Err(SchemaError::Cycle { path });
        }
        None => {}
    }

    marks.insert(&record.name, Mark::Visiting);
    stack.push(&record.name);

    for member in &record.members {
        if skip_map_edges && member.is_map() {
            continue;
        }
        if let Some(target) = member.referenced_record().and_then(|t| index.get(t).copied()) {
            visit(target, index, marks, stack, skip_map_edges)?;
        }
    }

    stack.pop();
    marks.insert(&record.name, Mark::Done);
    Ok(())
}
