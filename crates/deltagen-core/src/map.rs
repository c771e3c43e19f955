//! Keyed maps of records with copy-on-write storage.
//!
//! [`RecordMap`] keeps its entries behind an `Arc`, and every stored record
//! behind its own `Arc`. Cloning a map is O(1) and shares storage; the first
//! mutation of a shared map clones the table (not the records). Records that
//! a merge does not touch therefore stay identity-equal to the base's.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

/// A map from a comparable key to records of type `V`.
///
/// The empty map holds no allocation at all.
pub struct RecordMap<K, V> {
    inner: Option<Arc<HashMap<K, Arc<V>>>>,
}

impl<K, V> RecordMap<K, V> {
    /// Create an empty map. Does not allocate.
    pub const fn new() -> Self {
        Self { inner: None }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |m| m.len())
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter_shared().map(|(k, v)| (k, v.as_ref()))
    }

    /// Iterate over entries, exposing the shared record handles.
    pub fn iter_shared(&self) -> impl Iterator<Item = (&K, &Arc<V>)> {
        self.inner.iter().flat_map(|m| m.iter())
    }

    /// Iterate over keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter_shared().map(|(k, _)| k)
    }

    /// Iterate over records in arbitrary order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Returns `true` if both maps use the same storage.
    ///
    /// Two empty maps without storage are considered the same.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<K: Eq + Hash, V> RecordMap<K, V> {
    /// Look up the record stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_shared(key).map(Arc::as_ref)
    }

    /// Look up the shared handle of the record stored under `key`.
    pub fn get_shared<Q>(&self, key: &Q) -> Option<&Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.as_ref().and_then(|m| m.get(key))
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_shared(key).is_some()
    }

    /// Returns `true` if both maps hold the same record allocation under `key`.
    pub fn entry_ptr_eq<Q>(&self, other: &Self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match (self.get_shared(key), other.get_shared(key)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<K: Eq + Hash + Clone, V> RecordMap<K, V> {
    /// Create an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        if capacity == 0 {
            return Self::new();
        }
        Self {
            inner: Some(Arc::new(HashMap::with_capacity(capacity))),
        }
    }

    /// Insert a record, returning the previous one.
    pub fn insert(&mut self, key: K, value: V) -> Option<Arc<V>> {
        self.insert_shared(key, Arc::new(value))
    }

    /// Insert an already shared record, returning the previous one.
    pub fn insert_shared(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.make_mut().insert(key, value)
    }

    /// Remove the record under `key`, returning it.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.contains_key(key) {
            return None;
        }
        self.make_mut().remove(key)
    }

    /// Writable access to the table, cloning it first if it is shared.
    pub(crate) fn make_mut(&mut self) -> &mut HashMap<K, Arc<V>> {
        let table = self.inner.get_or_insert_with(Default::default);
        if Arc::get_mut(table).is_none() {
            trace!(entries = table.len(), "copy-on-write: cloning shared map");
        }
        Arc::make_mut(table)
    }
}

impl<K, V> Default for RecordMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for RecordMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for RecordMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.len() == other.len()
            && self
                .iter_shared()
                .all(|(k, v)| other.get_shared(k).is_some_and(|o| Arc::ptr_eq(v, o) || v == o))
    }
}

impl<K: Eq + Hash, V: Eq> Eq for RecordMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RecordMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Eq + Hash + Clone, V> FromIterator<(K, V)> for RecordMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Eq + Hash + Clone, V> Extend<(K, V)> for RecordMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let mut iter = iter.into_iter().peekable();
        if iter.peek().is_none() {
            return;
        }
        let table = self.make_mut();
        for (k, v) in iter {
            table.insert(k, Arc::new(v));
        }
    }
}

impl<K: Serialize, V: Serialize> Serialize for RecordMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, K, V> Deserialize<'de> for RecordMap<K, V>
where
    K: Deserialize<'de> + Eq + Hash + Clone,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor<K, V>(PhantomData<fn() -> (K, V)>);

        impl<'de, K, V> Visitor<'de> for MapVisitor<K, V>
        where
            K: Deserialize<'de> + Eq + Hash + Clone,
            V: Deserialize<'de>,
        {
            type Value = RecordMap<K, V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = RecordMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor(PhantomData))
    }
}
