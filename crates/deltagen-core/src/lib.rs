//! Diff, merge, and copy for nested record types.
//!
//! A record is made of scalar members, nested records, and maps from a
//! comparable key to records. For every record type this crate provides:
//!
//! - **Diff**: the minimal [`Delta`] between an old and a new value, or
//!   `None` when nothing changed at any depth
//! - **Merge**: a new value with a delta applied; the base is never
//!   mutated, and map storage is cloned only where the delta changes it
//! - **Copy**: a deep copy that shares no map storage with the original
//!
//! Laws that hold for every record type `T`:
//!
//! - `old.merge(old.diff(&new).as_ref()).0 == new`
//! - `x.diff(&x) == None`
//! - `x.clone().merge(None) == (x, false)`
//!
//! Record types are declared with [`record!`], which also ties them back to
//! the [`schema`] model.
//!
//! # Key Types
//!
//! - [`Record`] / [`Root`] / [`Delta`] -- The per-type capability
//! - [`RecordMap`] -- Copy-on-write keyed map of records
//! - [`MapDelta`] / [`EntryDelta`] -- Per-key map changes

pub mod copy;
pub mod delta;
pub mod diff;
mod macros;
pub mod map;
pub mod merge;
pub mod record;

#[cfg(test)]
pub(crate) mod fixtures;

pub use deltagen_schema as schema;

pub use copy::copy_map;
pub use delta::{EntryDelta, MapDelta};
pub use diff::{diff_map, diff_record, diff_scalar};
pub use map::RecordMap;
pub use merge::{merge_map, merge_record, merge_scalar};
pub use record::{non_empty, Delta, Record, Root};
