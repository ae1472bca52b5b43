//! [`SimEngine`] – in-process stand-in for the sensing engine.
//!
//! Implements [`EngineBoundary`] over a plain map of snapshots so the whole
//! ingestion/query stack can run in unit tests, CI and the CLI demo without a
//! device or the native engine.
//!
//! # Stub behaviour
//!
//! | Call | Behaviour |
//! |---|---|
//! | `query_current_device_id` | Returns the configured current id (empty until set). |
//! | `pull_device_snapshot` | Returns a clone of the stored snapshot, or `None`. |
//! | either, while unavailable | Fails with [`MotionError::EngineUnavailable`]. |
//!
//! # Example
//!
//! ```rust
//! use motion_registry::engine::EngineBoundary;
//! use motion_registry::sim::SimEngine;
//! use motion_types::RawDeviceFields;
//!
//! let engine = SimEngine::builder()
//!     .with_current_device("self")
//!     .with_device("self", RawDeviceFields::default())
//!     .build();
//!
//! let me = engine.query_current_device_id().unwrap();
//! assert!(engine.pull_device_snapshot(&me).unwrap().is_some());
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use motion_types::{DeviceId, MotionError, RawDeviceFields};
use parking_lot::RwLock;

use crate::engine::EngineBoundary;

/// Simulated engine holding one snapshot per device.
pub struct SimEngine {
    current: RwLock<DeviceId>,
    snapshots: RwLock<HashMap<DeviceId, RawDeviceFields>>,
    available: AtomicBool,
    pulls: AtomicUsize,
    id_queries: AtomicUsize,
}

impl SimEngine {
    /// Start building a simulated engine.
    pub fn builder() -> SimEngineBuilder {
        SimEngineBuilder::default()
    }

    /// Replace (or add) the snapshot the engine reports for `id`.
    pub fn set_snapshot(&self, id: impl Into<DeviceId>, fields: RawDeviceFields) {
        self.snapshots.write().insert(id.into(), fields);
    }

    /// Mutate the stored snapshot for `id` in place.  No-op for unknown ids.
    pub fn update_snapshot(&self, id: &str, f: impl FnOnce(&mut RawDeviceFields)) {
        if let Some(fields) = self.snapshots.write().get_mut(id) {
            f(fields);
        }
    }

    /// Stop reporting `id`, as if the device left the network.
    pub fn remove_device(&self, id: &str) {
        self.snapshots.write().remove(id);
    }

    pub fn set_current_device(&self, id: impl Into<DeviceId>) {
        *self.current.write() = id.into();
    }

    /// Toggle reachability.  While unavailable every call fails fast.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Identifiers the engine currently has snapshots for.
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.snapshots.read().keys().cloned().collect()
    }

    /// Number of `pull_device_snapshot` calls served so far.
    pub fn pull_count(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    /// Number of `query_current_device_id` calls served so far.
    pub fn id_query_count(&self) -> usize {
        self.id_queries.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> Result<(), MotionError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(MotionError::EngineUnavailable(
                "simulated engine is offline".to_string(),
            ))
        }
    }
}

impl EngineBoundary for SimEngine {
    fn query_current_device_id(&self) -> Result<DeviceId, MotionError> {
        self.id_queries.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;
        Ok(self.current.read().clone())
    }

    fn pull_device_snapshot(&self, id: &DeviceId) -> Result<Option<RawDeviceFields>, MotionError> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;
        Ok(self.snapshots.read().get(id).cloned())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for [`SimEngine`].
#[derive(Default)]
pub struct SimEngineBuilder {
    current: DeviceId,
    snapshots: Vec<(DeviceId, RawDeviceFields)>,
}

impl SimEngineBuilder {
    /// Identifier reported by `query_current_device_id`.
    pub fn with_current_device(mut self, id: impl Into<DeviceId>) -> Self {
        self.current = id.into();
        self
    }

    /// Seed a snapshot for `id`.
    pub fn with_device(mut self, id: impl Into<DeviceId>, fields: RawDeviceFields) -> Self {
        self.snapshots.push((id.into(), fields));
        self
    }

    /// Consume the builder and return an available engine.
    pub fn build(self) -> SimEngine {
        SimEngine {
            current: RwLock::new(self.current),
            snapshots: RwLock::new(self.snapshots.into_iter().collect()),
            available: AtomicBool::new(true),
            pulls: AtomicUsize::new(0),
            id_queries: AtomicUsize::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_types::{NativeXyz, PrimaryMotion};

    #[test]
    fn default_engine_has_empty_current_device() {
        let engine = SimEngine::builder().build();
        assert!(engine.query_current_device_id().unwrap().is_empty());
        assert_eq!(engine.id_query_count(), 1);
    }

    #[test]
    fn pull_returns_seeded_snapshot() {
        let engine = SimEngine::builder()
            .with_device("dev1", RawDeviceFields::default())
            .build();
        assert!(engine.pull_device_snapshot(&"dev1".into()).unwrap().is_some());
        assert!(engine.pull_device_snapshot(&"dev2".into()).unwrap().is_none());
        assert_eq!(engine.pull_count(), 2);
    }

    #[test]
    fn update_snapshot_mutates_in_place() {
        let engine = SimEngine::builder()
            .with_device("dev1", RawDeviceFields::default())
            .build();
        engine.update_snapshot("dev1", |f| {
            f.local_position = NativeXyz::new(1.0, 2.0, 3.0);
            f.primary_motion = PrimaryMotion::Forward;
        });
        let fields = engine.pull_device_snapshot(&"dev1".into()).unwrap().unwrap();
        assert_eq!(fields.local_position, NativeXyz::new(1.0, 2.0, 3.0));
        assert_eq!(fields.primary_motion, PrimaryMotion::Forward);
    }

    #[test]
    fn removed_device_reports_nothing() {
        let engine = SimEngine::builder()
            .with_device("dev1", RawDeviceFields::default())
            .build();
        engine.remove_device("dev1");
        assert!(engine.pull_device_snapshot(&"dev1".into()).unwrap().is_none());
        assert!(engine.device_ids().is_empty());
    }

    #[test]
    fn offline_engine_fails_fast() {
        let engine = SimEngine::builder().with_current_device("self").build();
        engine.set_available(false);
        assert!(matches!(
            engine.query_current_device_id(),
            Err(MotionError::EngineUnavailable(_))
        ));
        assert!(engine.pull_device_snapshot(&"self".into()).is_err());

        engine.set_available(true);
        assert_eq!(engine.query_current_device_id().unwrap().as_str(), "self");
    }
}
