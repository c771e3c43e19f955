//! The record capability: what every record type and its delta provide.

use std::fmt::Debug;

use deltagen_schema::{RecordDecl, Result, Schema, ValidationConfig};

/// The change set for one record type.
///
/// A delta mirrors its record: optional scalar values, optional nested
/// deltas, and one [`MapDelta`](crate::MapDelta) per map member.
pub trait Delta: Clone + Default + PartialEq + Debug {
    /// Returns `true` if applying this delta changes nothing.
    ///
    /// A delta is empty when every scalar slot is absent, every nested slot
    /// is absent or empty, and every map delta has no entries.
    fn is_empty(&self) -> bool;
}

/// A record type that supports diff, merge, and deep copy.
///
/// Implementations are normally generated by [`record!`](crate::record).
/// The three operations apply the same way at every depth: the root type
/// and a record stored inside a map are handled identically.
pub trait Record: Clone + Default + PartialEq + Debug {
    /// The delta type mirroring this record.
    type Delta: Delta;

    /// The record's type name, as declared in the schema.
    const NAME: &'static str;

    /// Compute the delta that turns `self` into `new`.
    ///
    /// Returns `None` when nothing changed, at any depth, so callers can test
    /// for "no change" without inspecting the delta.
    ///
    /// Scalars are compared with `PartialEq`, so `x.diff(&x)` is `None` only
    /// when every scalar in `x` equals itself. A float field holding NaN is
    /// always reported as changed.
    fn diff(&self, new: &Self) -> Option<Self::Delta>;

    /// Apply `delta` to this value, returning the result and whether
    /// anything changed.
    ///
    /// A `None` delta returns the value untouched. Map storage is cloned only
    /// when the delta actually modifies that map, so unchanged maps (and the
    /// records stored in them) keep sharing storage with the input.
    fn merge(self, delta: Option<&Self::Delta>) -> (Self, bool);

    /// Produce a deep copy sharing no map storage with `self`.
    fn copy(&self) -> Self;

    /// The schema declaration of this record type.
    fn declaration() -> RecordDecl;

    /// Append the declarations of this type and every type it references,
    /// skipping names already present in `out`.
    fn collect_declarations(out: &mut Vec<RecordDecl>);
}

/// The root record type, exposing the public entry points.
///
/// At most one record type in a schema is the root. Nothing prevents two
/// unrelated `root` types in one crate; the rule is enforced by
/// [`Root::schema`], which fails with `SchemaError::MultipleRoots` when a
/// second root is reachable from this one.
pub trait Root: Record {
    /// Compute the delta that turns `self` into `new`, or `None` if equal.
    fn delta_to(&self, new: &Self) -> Option<Self::Delta> {
        self.diff(new)
    }

    /// Return a new value with `delta` applied. `self` is left untouched.
    fn apply(&self, delta: &Self::Delta) -> Self {
        let (merged, _) = self.clone().merge(Some(delta));
        merged
    }

    /// Build and validate the schema reachable from this root.
    fn schema(config: &ValidationConfig) -> Result<Schema> {
        let mut records = Vec::new();
        Self::collect_declarations(&mut records);
        Schema { records }.validated(config)
    }
}

/// Turn a populated delta into `None` when it is empty.
pub fn non_empty<D: Delta>(delta: D) -> Option<D> {
    if delta.is_empty() {
        None
    } else {
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        Item, ItemDelta, Marker, MarkerDelta, Node, Player, PlayerDelta, Stats, StatsDelta,
    };
    use deltagen_schema::{Member, ScalarType, SchemaError};

    #[test]
    fn default_delta_is_empty() {
        assert!(PlayerDelta::default().is_empty());
        assert!(ItemDelta::default().is_empty());
        assert!(MarkerDelta::default().is_empty());
    }

    #[test]
    fn empty_nested_delta_counts_as_empty() {
        let delta = PlayerDelta {
            stats: Some(StatsDelta::default()),
            ..Default::default()
        };
        assert!(delta.is_empty());
        assert_eq!(non_empty(delta), None);
    }

    #[test]
    fn any_slot_makes_delta_non_empty() {
        let scalar = PlayerDelta {
            active: Some(false),
            ..Default::default()
        };
        assert!(!scalar.is_empty());

        let nested = PlayerDelta {
            stats: Some(StatsDelta {
                wins: Some(1),
                losses: None,
            }),
            ..Default::default()
        };
        assert!(!nested.is_empty());

        let mut removal = PlayerDelta::default();
        removal.items.set_removed(1);
        assert!(!removal.is_empty());

        let mut explicit_empty = PlayerDelta::default();
        explicit_empty.friends.set_empty("ada".into());
        assert!(!explicit_empty.is_empty());
    }

    #[test]
    fn record_without_members() {
        let marker = Marker {};
        assert_eq!(marker.diff(&Marker {}), None);
        assert_eq!(marker.copy(), Marker {});
        assert_eq!(marker.merge(Some(&MarkerDelta {})), (Marker {}, false));
    }

    #[test]
    fn apply_does_not_modify_self() {
        let base = Player::sample();
        let delta = PlayerDelta {
            name: Some("changed".into()),
            ..Default::default()
        };
        let merged = base.apply(&delta);
        assert_eq!(base.name, "mira");
        assert_eq!(merged.name, "changed");
        assert_eq!(base.delta_to(&merged), Some(delta));
    }

    #[test]
    fn declaration_mirrors_members() {
        let decl = Player::declaration();
        assert_eq!(decl.name, "Player");
        assert!(decl.root);
        assert_eq!(
            decl.members,
            vec![
                Member::Scalar {
                    name: "name".into(),
                    ty: ScalarType::String,
                },
                Member::Scalar {
                    name: "level".into(),
                    ty: ScalarType::U16,
                },
                Member::Scalar {
                    name: "active".into(),
                    ty: ScalarType::Bool,
                },
                Member::Record {
                    name: "stats".into(),
                    record: "Stats".into(),
                },
                Member::Map {
                    name: "items".into(),
                    key: ScalarType::U64,
                    value: "Item".into(),
                },
                Member::Map {
                    name: "friends".into(),
                    key: ScalarType::String,
                    value: "Stats".into(),
                },
            ]
        );
        assert!(!Item::declaration().root);
        assert_eq!(Stats::NAME, "Stats");
    }

    #[test]
    fn root_schema_collects_reachable_records_once() {
        let schema = Player::schema(&ValidationConfig::strict()).unwrap();
        let names: Vec<_> = schema.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Player", "Stats", "Item"]);
        assert_eq!(schema.root().map(|r| r.name.as_str()), Some("Player"));
    }

    #[test]
    fn recursive_record_needs_permissive_validation() {
        let mut records = Vec::new();
        Node::collect_declarations(&mut records);
        assert_eq!(records.len(), 1);

        let schema = Schema { records };
        assert!(matches!(
            schema.validate(&ValidationConfig::default()),
            Err(SchemaError::Cycle { .. })
        ));
        assert!(schema.validate(&ValidationConfig::permissive()).is_ok());
    }
}
