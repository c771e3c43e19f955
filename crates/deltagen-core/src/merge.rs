//! Merge engine: apply a delta without disturbing the base's storage.
//!
//! Maps are copy-on-write. A map member is cloned at most once, on the first
//! key the delta actually changes; a delta that changes nothing leaves the
//! map's storage shared with the base.

use std::hash::Hash;
use std::mem;
use std::sync::Arc;

use crate::delta::{EntryDelta, MapDelta};
use crate::map::RecordMap;
use crate::record::Record;

/// Overwrite a scalar if the delta carries a different value.
pub fn merge_scalar<T: PartialEq + Clone>(field: &mut T, value: Option<&T>) -> bool {
    match value {
        Some(value) if *value != *field => {
            *field = value.clone();
            true
        }
        _ => false,
    }
}

/// Merge a nested record in place.
///
/// The recursive merge runs even for an absent delta; it returns at once
/// and the field's storage is put back unchanged.
pub fn merge_record<R: Record>(field: &mut R, delta: Option<&R::Delta>) -> bool {
    let (merged, changed) = mem::take(field).merge(delta);
    *field = merged;
    changed
}

/// Apply a map delta.
///
/// - a removal deletes the key if present
/// - a change merges into the existing record, or into the zero-valued
///   record when the key is missing; the result is written back only if the
///   record changed or the key was missing
///
/// Records under keys the delta does not touch keep their allocation.
pub fn merge_map<K, V>(map: &mut RecordMap<K, V>, delta: &MapDelta<K, V::Delta>) -> bool
where
    K: Eq + Hash + Clone,
    V: Record,
{
    if delta.is_empty() {
        return false;
    }

    let mut changed = false;
    for (key, entry) in delta {
        match entry {
            EntryDelta::Removed => {
                if map.remove(key).is_some() {
                    changed = true;
                }
            }
            EntryDelta::Changed(d) => {
                let merged = match map.get_shared(key) {
                    Some(current) => {
                        let (merged, record_changed) = V::clone(current).merge(Some(d));
                        if !record_changed {
                            continue;
                        }
                        merged
                    }
                    None => V::default().merge(Some(d)).0,
                };
                map.insert_shared(key.clone(), Arc::new(merged));
                changed = true;
            }
        }
    }
    changed
}
