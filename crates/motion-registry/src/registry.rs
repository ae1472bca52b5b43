//! [`DeviceRegistry`] – the per-device cache of the latest sensed state.
//!
//! A record appears the first time an update is ingested for its identifier
//! and is replaced wholesale by every later ingestion.  Records are never
//! evicted automatically; callers that care about stale devices compare
//! [`DeviceStateRecord::last_update_timestamp`] against the session clock.
//!
//! # Thread safety
//!
//! The whole map sits behind one `parking_lot::RwLock`.  [`upsert`] swaps the
//! record under the write guard and [`get`] clones under a read guard, so a
//! reader sees either the old record or the new one in full, never a mix.
//!
//! [`upsert`]: DeviceRegistry::upsert
//! [`get`]: DeviceRegistry::get

use std::collections::HashMap;

use motion_types::{DeviceId, DeviceStateRecord};
use parking_lot::RwLock;

/// Concurrent map from [`DeviceId`] to [`DeviceStateRecord`].
///
/// Construct with [`DeviceRegistry::new`] and share behind an `Arc`.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    records: RwLock<HashMap<DeviceId, DeviceStateRecord>>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` for `id`, replacing any previous record.
    ///
    /// Returns `true` when `id` had never been seen before.
    pub fn upsert(&self, id: DeviceId, record: DeviceStateRecord) -> bool {
        self.records.write().insert(id, record).is_none()
    }

    /// Copy of the current record for `id`, if one exists.
    pub fn get(&self, id: &str) -> Option<DeviceStateRecord> {
        self.records.read().get(id).cloned()
    }

    /// Run `f` against the record for `id` under the read guard.
    ///
    /// Lets accessors pull a single field without cloning the whole record.
    pub fn read_with<T>(&self, id: &str, f: impl FnOnce(&DeviceStateRecord) -> T) -> Option<T> {
        self.records.read().get(id).map(f)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.read().contains_key(id)
    }

    /// Snapshot of every identifier seen so far.  Order is unspecified.
    pub fn all_ids(&self) -> Vec<DeviceId> {
        self.records.read().keys().cloned().collect()
    }

    /// Number of distinct identifiers seen so far.
    pub fn count(&self) -> usize {
        self.records.read().len()
    }

    /// Forget every record.  Only for an explicit session reset.
    pub fn clear(&self) {
        self.records.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_types::{NativeXyz, RawDeviceFields};

    fn record_at(x: f64, ts: f64) -> DeviceStateRecord {
        DeviceStateRecord::new(
            RawDeviceFields {
                local_position: NativeXyz::new(x, 0.0, 0.0),
                ..RawDeviceFields::default()
            },
            ts,
        )
    }

    #[test]
    fn empty_registry_has_no_records() {
        let registry = DeviceRegistry::new();
        assert_eq!(registry.count(), 0);
        assert!(registry.get("dev1").is_none());
        assert!(!registry.contains("dev1"));
        assert!(registry.all_ids().is_empty());
    }

    #[test]
    fn upsert_reports_first_sighting() {
        let registry = DeviceRegistry::new();
        assert!(registry.upsert(DeviceId::from("dev1"), record_at(1.0, 0.0)));
        assert!(!registry.upsert(DeviceId::from("dev1"), record_at(2.0, 1.0)));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn upsert_overwrites_whole_record() {
        let registry = DeviceRegistry::new();
        registry.upsert(DeviceId::from("dev1"), record_at(1.0, 0.5));
        registry.upsert(DeviceId::from("dev1"), record_at(7.0, 2.0));

        let record = registry.get("dev1").unwrap();
        assert_eq!(record.fields.local_position.x, 7.0);
        assert_eq!(record.last_update_timestamp, 2.0);
    }

    #[test]
    fn get_returns_detached_copy() {
        let registry = DeviceRegistry::new();
        registry.upsert(DeviceId::from("dev1"), record_at(1.0, 0.0));

        let mut copy = registry.get("dev1").unwrap();
        copy.fields.local_position.x = 99.0;

        assert_eq!(registry.get("dev1").unwrap().fields.local_position.x, 1.0);
    }

    #[test]
    fn all_ids_lists_every_device() {
        let registry = DeviceRegistry::new();
        for id in ["a", "b", "c"] {
            registry.upsert(DeviceId::from(id), record_at(0.0, 0.0));
        }
        let mut ids = registry.all_ids();
        ids.sort();
        assert_eq!(ids, vec![DeviceId::from("a"), DeviceId::from("b"), DeviceId::from("c")]);
    }

    #[test]
    fn read_with_projects_a_field() {
        let registry = DeviceRegistry::new();
        registry.upsert(DeviceId::from("dev1"), record_at(4.0, 3.0));
        assert_eq!(registry.read_with("dev1", |r| r.last_update_timestamp), Some(3.0));
        assert_eq!(registry.read_with("ghost", |r| r.last_update_timestamp), None);
    }

    #[test]
    fn clear_forgets_everything() {
        let registry = DeviceRegistry::new();
        registry.upsert(DeviceId::from("dev1"), record_at(0.0, 0.0));
        registry.clear();
        assert_eq!(registry.count(), 0);
        assert!(registry.get("dev1").is_none());
    }
}
