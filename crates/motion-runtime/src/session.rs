//! [`MotionSession`] – one engine session and everything it owns.
//!
//! A session is constructed when the engine starts, handed by reference to
//! whoever needs to read or ingest, and reset or dropped when the engine
//! stops.  There is no process-wide state: two sessions over two engines are
//! fully independent.

use std::sync::Arc;

use motion_registry::{Clock, DeviceRegistry, EngineBoundary, IngestOutcome, SessionClock, UpdateIngestion};
use motion_types::{DeviceId, MotionError};
use tokio::task::JoinHandle;
use tracing::info;

use crate::current_device::CurrentDevice;
use crate::notify::{NotificationBus, spawn_ingestion_listener};
use crate::query::MotionQuery;

/// Owner of the registry, the ingestion entry point and the query handle.
pub struct MotionSession {
    registry: Arc<DeviceRegistry>,
    ingestion: Arc<UpdateIngestion>,
    current: Arc<CurrentDevice>,
    query: MotionQuery,
}

impl MotionSession {
    /// Start a session whose clock begins now.
    pub fn new(engine: Arc<dyn EngineBoundary>) -> Self {
        Self::with_clock(engine, Arc::new(SessionClock::start()))
    }

    pub fn with_clock(engine: Arc<dyn EngineBoundary>, clock: Arc<dyn Clock>) -> Self {
        let registry = Arc::new(DeviceRegistry::new());
        let ingestion = Arc::new(UpdateIngestion::new(
            engine.clone(),
            registry.clone(),
            clock.clone(),
        ));
        let current = Arc::new(CurrentDevice::new(engine));
        let query = MotionQuery::new(registry.clone(), current.clone(), clock);
        Self {
            registry,
            ingestion,
            current,
            query,
        }
    }

    /// Query handle for application code.  Clone it freely.
    pub fn query(&self) -> &MotionQuery {
        &self.query
    }

    pub fn ingestion(&self) -> &Arc<UpdateIngestion> {
        &self.ingestion
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Synchronous entry point for platform callbacks.
    pub fn on_device_updated(&self, id: &str) -> IngestOutcome {
        self.ingestion.on_device_updated(&DeviceId::from(id))
    }

    /// Feed `bus` into this session's ingestion on a Tokio task.
    pub fn listen(&self, bus: &NotificationBus) -> JoinHandle<()> {
        spawn_ingestion_listener(bus, self.ingestion.clone())
    }

    /// The current device id, or [`MotionError::NoCurrentDevice`].
    pub fn require_current_device(&self) -> Result<DeviceId, MotionError> {
        self.current.resolve().ok_or(MotionError::NoCurrentDevice)
    }

    /// Drop every record and the cached current-device id.
    ///
    /// Call when the engine stops; local positions from the next engine run
    /// use a new origin.
    pub fn reset(&self) {
        let dropped = self.registry.count();
        self.registry.clear();
        self.current.reset();
        info!(dropped, "motion session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_registry::{ManualClock, SimEngine};
    use motion_types::RawDeviceFields;

    fn session_with(engine: &Arc<SimEngine>) -> MotionSession {
        MotionSession::with_clock(engine.clone(), Arc::new(ManualClock::new()))
    }

    #[test]
    fn sessions_are_independent() {
        let engine = Arc::new(
            SimEngine::builder()
                .with_device("dev1", RawDeviceFields::default())
                .build(),
        );
        let a = session_with(&engine);
        let b = session_with(&engine);

        assert_eq!(a.on_device_updated("dev1"), IngestOutcome::Created);
        assert_eq!(a.query().device_count(), 1);
        assert_eq!(b.query().device_count(), 0);
    }

    #[test]
    fn reset_clears_records_and_current_device() {
        let engine = Arc::new(
            SimEngine::builder()
                .with_current_device("self")
                .with_device("self", RawDeviceFields::default())
                .build(),
        );
        let session = session_with(&engine);
        session.on_device_updated("self");
        assert!(session.query().local_position(None).is_some());

        engine.set_current_device("other");
        session.reset();
        assert_eq!(session.registry().count(), 0);
        assert_eq!(session.query().local_position(None), None);
        assert_eq!(
            session.require_current_device(),
            Ok(DeviceId::from("other"))
        );
    }

    #[test]
    fn shared_ingestion_writes_into_session_registry() {
        let engine = Arc::new(
            SimEngine::builder()
                .with_device("dev1", RawDeviceFields::default())
                .build(),
        );
        let session = session_with(&engine);
        session.on_device_updated("dev1");

        engine.update_snapshot("dev1", |f| f.step_frequency = 2.0);
        assert_eq!(session.ingestion().refresh_all(), 1);
        assert!(Arc::ptr_eq(session.ingestion().registry(), session.registry()));
        assert_eq!(session.query().step_frequency(Some("dev1")), Some(2.0));
    }

    #[test]
    fn missing_current_device_is_an_error_only_when_required() {
        let engine = Arc::new(SimEngine::builder().build());
        let session = session_with(&engine);
        assert_eq!(
            session.require_current_device(),
            Err(MotionError::NoCurrentDevice)
        );
        assert_eq!(session.query().local_position(None), None);
    }
}
