//! The `EngineBoundary` trait: everything this layer consumes from the
//! external sensing engine.
//!
//! Platform bridges implement this trait and hand it to
//! [`UpdateIngestion`][crate::ingest::UpdateIngestion].  Nothing else in the
//! workspace talks to the engine directly, so a bridge can be swapped (or
//! replaced by [`SimEngine`][crate::sim::SimEngine]) without touching the
//! registry or the accessor layer.

use motion_types::{DeviceId, MotionError, RawDeviceFields};

/// Query side of the external sensing engine.
///
/// Both calls are expected to read an in-memory snapshot and return quickly.
/// An engine that cannot be reached must fail fast with
/// [`MotionError::EngineUnavailable`] rather than block.
pub trait EngineBoundary: Send + Sync {
    /// Identifier of the local (self) device.
    ///
    /// May cross into platform code; callers cache the result.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::EngineUnavailable`] when the engine cannot be
    /// reached.
    fn query_current_device_id(&self) -> Result<DeviceId, MotionError>;

    /// Pull the complete current field set for `id`, in native convention.
    ///
    /// Returns `Ok(None)` when the engine has no data for `id` (for instance
    /// the device vanished between notification and pull).
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::EngineUnavailable`] when the engine cannot be
    /// reached.
    fn pull_device_snapshot(&self, id: &DeviceId) -> Result<Option<RawDeviceFields>, MotionError>;
}
