//! Diff engine: compute the minimal delta between two values.
//!
//! Generated `Record::diff` implementations call these helpers once per
//! member and then collapse an empty result to `None` with
//! [`non_empty`](crate::non_empty).

use std::hash::Hash;
use std::sync::Arc;

use crate::delta::MapDelta;
use crate::map::RecordMap;
use crate::record::Record;

/// The new value if it differs from the old one.
pub fn diff_scalar<T: PartialEq + Clone>(old: &T, new: &T) -> Option<T> {
    if old != new {
        Some(new.clone())
    } else {
        None
    }
}

/// Diff a nested record. `None` means the subtree is unchanged.
pub fn diff_record<R: Record>(old: &R, new: &R) -> Option<R::Delta> {
    old.diff(new)
}

/// Diff two maps key by key.
///
/// - keys in both maps get an entry only if their records differ
/// - keys only in `new` are diffed against the zero-valued record; when the
///   new record equals the zero value an explicit empty change is recorded so
///   the key is still added on merge
/// - keys only in `old` are marked removed
///
/// Records that share storage are skipped without comparing fields.
pub fn diff_map<K, V>(old: &RecordMap<K, V>, new: &RecordMap<K, V>) -> MapDelta<K, V::Delta>
where
    K: Eq + Hash + Clone,
    V: Record,
{
    let mut delta = MapDelta::new();
    if old.ptr_eq(new) {
        return delta;
    }

    for (key, new_value) in new.iter_shared() {
        match old.get_shared(key) {
            Some(old_value) => {
                if Arc::ptr_eq(old_value, new_value) {
                    continue;
                }
                if let Some(d) = old_value.diff(new_value) {
                    delta.set(key.clone(), d);
                }
            }
            None => match V::default().diff(new_value) {
                Some(d) => delta.set(key.clone(), d),
                None => delta.set_empty(key.clone()),
            },
        }
    }

    for key in old.keys() {
        if !new.contains_key(key) {
            delta.set_removed(key.clone());
        }
    }

    delta
}
