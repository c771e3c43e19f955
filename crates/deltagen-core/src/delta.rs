//! Per-key deltas for map members.
//!
//! A [`MapDelta`] distinguishes three states for every key:
//!
//! - not mentioned: the key is unchanged
//! - [`EntryDelta::Removed`]: the key was deleted
//! - [`EntryDelta::Changed`]: the key's record changed, or the key was added
//!   (an empty inner delta adds a zero-valued record)
//!
//! On the wire a removal is `null` and a change is the inner delta.

use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The change to a single map key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryDelta<D> {
    /// The key was removed.
    Removed,
    /// The key's record changed (or was added from the zero value).
    Changed(D),
}

impl<D> EntryDelta<D> {
    /// Returns `true` for [`EntryDelta::Removed`].
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }

    /// The inner delta, if the key was changed.
    pub fn as_changed(&self) -> Option<&D> {
        match self {
            Self::Changed(d) => Some(d),
            Self::Removed => None,
        }
    }
}

impl<D: Serialize> Serialize for EntryDelta<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Removed => serializer.serialize_none(),
            Self::Changed(d) => serializer.serialize_some(d),
        }
    }
}

impl<'de, D: Deserialize<'de>> Deserialize<'de> for EntryDelta<D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        Ok(match Option::<D>::deserialize(deserializer)? {
            Some(d) => Self::Changed(d),
            None => Self::Removed,
        })
    }
}

/// The delta of a map member: per-key changes keyed like the map.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize, D: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash, D: Deserialize<'de>"
))]
pub struct MapDelta<K, D> {
    entries: HashMap<K, EntryDelta<D>>,
}

impl<K, D> MapDelta<K, D> {
    /// Create an empty map delta. Does not allocate.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Number of keys mentioned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key is mentioned.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over mentioned keys and their changes.
    pub fn iter(&self) -> hash_map::Iter<'_, K, EntryDelta<D>> {
        self.entries.iter()
    }

    /// Number of keys marked as removed.
    pub fn removals(&self) -> usize {
        self.entries.values().filter(|e| e.is_removed()).count()
    }

    /// Number of keys marked as changed or added.
    pub fn changes(&self) -> usize {
        self.len() - self.removals()
    }
}

impl<K: Eq + Hash, D> MapDelta<K, D> {
    /// Record a change for `key`, replacing anything recorded before.
    pub fn set(&mut self, key: K, delta: D) {
        self.entries.insert(key, EntryDelta::Changed(delta));
    }

    /// Mark `key` as removed.
    pub fn set_removed(&mut self, key: K) {
        self.entries.insert(key, EntryDelta::Removed);
    }

    /// Look up the change recorded for `key`.
    pub fn get(&self, key: &K) -> Option<&EntryDelta<D>> {
        self.entries.get(key)
    }
}

impl<K: Eq + Hash, D: Default> MapDelta<K, D> {
    /// Record an explicit empty change for `key`.
    ///
    /// Merging it adds a zero-valued record when the key is missing and
    /// leaves an existing record untouched.
    pub fn set_empty(&mut self, key: K) {
        self.set(key, D::default());
    }
}

impl<K, D> Default for MapDelta<K, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, D: PartialEq> PartialEq for MapDelta<K, D> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: fmt::Debug, D: fmt::Debug> fmt::Debug for MapDelta<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Eq + Hash, D> FromIterator<(K, EntryDelta<D>)> for MapDelta<K, D> {
    fn from_iter<I: IntoIterator<Item = (K, EntryDelta<D>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, K, D> IntoIterator for &'a MapDelta<K, D> {
    type Item = (&'a K, &'a EntryDelta<D>);
    type IntoIter = hash_map::Iter<'a, K, EntryDelta<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
