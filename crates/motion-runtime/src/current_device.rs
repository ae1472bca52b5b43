//! [`CurrentDevice`] – lazily resolved identifier of the local device.
//!
//! Resolving the local id may cross into platform code, so the first
//! successful answer is cached for the rest of the session.  An engine error
//! or an empty id is not cached: the engine may simply not have assigned an
//! id yet, and the next accessor call asks again.

use std::sync::Arc;

use motion_registry::EngineBoundary;
use motion_types::DeviceId;
use parking_lot::RwLock;
use tracing::{debug, warn};

/// Read-mostly cache of the current device's identifier.
pub struct CurrentDevice {
    engine: Arc<dyn EngineBoundary>,
    cached: RwLock<Option<DeviceId>>,
}

impl CurrentDevice {
    pub fn new(engine: Arc<dyn EngineBoundary>) -> Self {
        Self {
            engine,
            cached: RwLock::new(None),
        }
    }

    /// The current device's id, querying the engine on first use.
    ///
    /// Returns `None` while the engine cannot name the local device.  No lock
    /// is held during the engine call, so concurrent readers of the cache
    /// never wait on platform code.
    pub fn resolve(&self) -> Option<DeviceId> {
        if let Some(id) = self.cached.read().as_ref() {
            return Some(id.clone());
        }

        let id = match self.engine.query_current_device_id() {
            Ok(id) if !id.is_empty() => id,
            Ok(_) => {
                debug!("engine has not assigned a current device id yet");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "current device lookup failed");
                return None;
            }
        };

        let mut cached = self.cached.write();
        // First stored answer wins.
        if let Some(existing) = cached.as_ref() {
            return Some(existing.clone());
        }
        debug!(device_id = %id, "resolved current device");
        *cached = Some(id.clone());
        Some(id)
    }

    /// The cached id, without asking the engine.
    pub fn cached(&self) -> Option<DeviceId> {
        self.cached.read().clone()
    }

    /// Forget the cached id; the next [`resolve`](Self::resolve) asks again.
    pub fn reset(&self) {
        *self.cached.write() = None;
    }
}
