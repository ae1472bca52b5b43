//! [`UpdateIngestion`] – commits engine estimates into the registry.
//!
//! The engine notifies "device `id` has a new estimate"; ingestion then pulls
//! the full snapshot once, stamps it with the session clock and upserts it.
//! Pulling on notify means a burst of coalesced notifications still lands the
//! latest engine state.
//!
//! Each call crosses the engine boundary, so it must only run at the engine's
//! own cadence.  Application reads go through the registry and never trigger
//! ingestion.
//!
//! Ingestion never fails towards its caller: a device with no data, or an
//! engine that cannot be reached, leaves the registry untouched.

use std::sync::Arc;

use motion_types::{DeviceId, DeviceStateRecord};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::clock::Clock;
use crate::engine::EngineBoundary;
use crate::registry::DeviceRegistry;

/// Result of one [`UpdateIngestion::on_device_updated`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// First record for this identifier.
    Created,
    /// Existing record replaced.
    Updated,
    /// The engine had nothing usable for this identifier; registry untouched.
    NoData,
    /// The engine could not be reached; registry untouched.
    EngineUnavailable,
}

impl IngestOutcome {
    /// `true` when a record was written.
    pub fn committed(self) -> bool {
        matches!(self, Self::Created | Self::Updated)
    }
}

/// Entry point invoked on the engine's notification context.
pub struct UpdateIngestion {
    engine: Arc<dyn EngineBoundary>,
    registry: Arc<DeviceRegistry>,
    clock: Arc<dyn Clock>,
    /// Held from pull to upsert so commits land in pull order.
    commit: Mutex<()>,
}

impl UpdateIngestion {
    pub fn new(
        engine: Arc<dyn EngineBoundary>,
        registry: Arc<DeviceRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engine,
            registry,
            clock,
            commit: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Pull the current snapshot for `id` and commit it.
    ///
    /// The empty identifier is reserved for "current device" on the read
    /// side and is never stored.  A snapshot whose location status is the
    /// `Invalid` sentinel means the engine lost the device and is treated
    /// like a missing snapshot.
    ///
    /// Concurrent calls are serialised from pull to commit, so the registry
    /// always ends up holding the most recently pulled snapshot.
    #[instrument(level = "trace", skip_all, fields(device_id = %id))]
    pub fn on_device_updated(&self, id: &DeviceId) -> IngestOutcome {
        if id.is_empty() {
            debug!("ignoring update notification with empty device id");
            return IngestOutcome::NoData;
        }

        let _commit = self.commit.lock();
        let fields = match self.engine.pull_device_snapshot(id) {
            Ok(Some(fields)) if fields.location_status.is_valid() => fields,
            Ok(Some(_)) => {
                debug!(device_id = %id, "engine reported invalid location status; skipping");
                return IngestOutcome::NoData;
            }
            Ok(None) => {
                debug!(device_id = %id, "engine has no snapshot for device");
                return IngestOutcome::NoData;
            }
            Err(e) => {
                warn!(device_id = %id, error = %e, "snapshot pull failed; update dropped");
                return IngestOutcome::EngineUnavailable;
            }
        };

        let record = DeviceStateRecord::new(fields, self.clock.now());
        if self.registry.upsert(id.clone(), record) {
            info!(device_id = %id, devices = self.registry.count(), "new device seen");
            IngestOutcome::Created
        } else {
            debug!(device_id = %id, "device record updated");
            IngestOutcome::Updated
        }
    }

    /// Re-ingest every known device.  Returns how many records were written.
    ///
    /// Used after notifications may have been lost; pulling reflects the
    /// engine's latest state regardless of how many notifications were missed.
    pub fn refresh_all(&self) -> usize {
        self.registry
            .all_ids()
            .iter()
            .filter(|id| self.on_device_updated(id).committed())
            .count()
    }
}
