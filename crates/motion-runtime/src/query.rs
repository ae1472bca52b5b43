//! [`MotionQuery`] – the accessor layer handed to application code.
//!
//! Every accessor takes an optional device id.  `None` (or the empty id)
//! means the current device.  The record is read from the registry, converted
//! into the consumer frame where a conversion is defined, and returned under a
//! fixed absent-value contract:
//!
//! | Kind | Absent value |
//! |---|---|
//! | classification enums | `Invalid` |
//! | positions, angles, scalars, structs | `None` |
//! | timestamp | `-1.0` |
//!
//! An unknown device and an unmet precondition (global location or global
//! heading before the location is initialised) look the same to the caller:
//! there is no usable data yet.  Nothing here returns an error.
//!
//! Reads never call into the engine, apart from the one-off current-device
//! resolution.

use std::sync::Arc;
use std::time::Duration;

use motion_frames::{
    Quaternion, Vec2, Vec3, orientation_to_consumer, position_to_consumer, uncertainty_to_consumer,
};
use motion_registry::{Clock, DeviceRegistry};
use motion_types::{
    Attitude, DeviceId, DeviceStateRecord, GlobalLocation, LocationStatus, MotionStatistics,
    PrimaryMotion, SecondaryMotion, VerticalDirection, VerticalMotionType,
};
use serde::Serialize;

use crate::current_device::CurrentDevice;

/// Timestamp reported for a device with no record.
pub const ABSENT_TIMESTAMP: f64 = -1.0;

/// Every attribute of one device in consumer convention, read in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceView {
    pub device_id: DeviceId,
    pub device_name: String,
    pub location_status: LocationStatus,
    pub local_position: Vec3,
    pub global_location: Option<GlobalLocation>,
    pub global_heading: Option<f64>,
    pub local_heading: f64,
    pub uncertainty: Vec2,
    pub attitude: Attitude,
    pub orientation: Quaternion,
    pub vertical_direction: VerticalDirection,
    pub vertical_motion_type: VerticalMotionType,
    pub step_frequency: f64,
    pub primary_motion: PrimaryMotion,
    pub secondary_motion: SecondaryMotion,
    pub motion_statistics: MotionStatistics,
    pub timestamp: f64,
}

impl DeviceView {
    fn from_record(device_id: DeviceId, record: &DeviceStateRecord) -> Self {
        let global_fix = record.has_global_fix();
        let f = &record.fields;
        Self {
            device_id,
            device_name: f.device_name.clone(),
            location_status: f.location_status,
            local_position: position_to_consumer(f.local_position),
            global_location: global_fix.then_some(f.global_location),
            global_heading: global_fix.then_some(f.heading),
            local_heading: f.local_heading,
            uncertainty: uncertainty_to_consumer(f.position_uncertainty),
            attitude: f.attitude,
            orientation: orientation_to_consumer(f.orientation),
            vertical_direction: f.vertical_direction,
            vertical_motion_type: f.vertical_motion_type,
            step_frequency: f.step_frequency,
            primary_motion: f.primary_motion,
            secondary_motion: f.secondary_motion,
            motion_statistics: f.motion_statistics,
            timestamp: record.last_update_timestamp,
        }
    }
}

/// Read-only, cheaply clonable query handle over a session's registry.
#[derive(Clone)]
pub struct MotionQuery {
    registry: Arc<DeviceRegistry>,
    current: Arc<CurrentDevice>,
    clock: Arc<dyn Clock>,
}

impl MotionQuery {
    pub fn new(
        registry: Arc<DeviceRegistry>,
        current: Arc<CurrentDevice>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            current,
            clock,
        }
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Resolve `device` (defaulting to the current device) and project the
    /// record under the registry's read guard.
    fn read<T>(
        &self,
        device: Option<&str>,
        f: impl FnOnce(&DeviceStateRecord) -> Option<T>,
    ) -> Option<T> {
        match device {
            Some(id) if !id.is_empty() => self.registry.read_with(id, f).flatten(),
            _ => {
                let id = self.current.resolve()?;
                self.registry.read_with(id.as_str(), f).flatten()
            }
        }
    }

    /// The identifier `device` resolves to, whether or not it has a record.
    pub fn resolve_id(&self, device: Option<&str>) -> Option<DeviceId> {
        match device {
            Some(id) if !id.is_empty() => Some(DeviceId::from(id)),
            _ => self.current.resolve(),
        }
    }

    pub fn current_device_id(&self) -> Option<DeviceId> {
        self.current.resolve()
    }

    /// Every identifier seen this session.  Use [`timestamp`](Self::timestamp)
    /// to judge whether a device is still reporting.
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.registry.all_ids()
    }

    /// Number of distinct devices seen this session.
    pub fn device_count(&self) -> usize {
        self.registry.count()
    }

    /// The stored record, in native convention.
    pub fn record(&self, device: Option<&str>) -> Option<DeviceStateRecord> {
        self.read(device, |r| Some(r.clone()))
    }

    /// All attributes in consumer convention from a single read.
    pub fn snapshot(&self, device: Option<&str>) -> Option<DeviceView> {
        let id = self.resolve_id(device)?;
        self.registry
            .read_with(id.as_str(), |r| DeviceView::from_record(id.clone(), r))
    }

    // ------------------------------------------------------------------
    // Location
    // ------------------------------------------------------------------

    pub fn try_location_status(&self, device: Option<&str>) -> Option<LocationStatus> {
        self.read(device, |r| Some(r.fields.location_status))
    }

    /// How the location was established, or `Invalid` with no record.
    pub fn location_status(&self, device: Option<&str>) -> LocationStatus {
        self.try_location_status(device)
            .unwrap_or(LocationStatus::Invalid)
    }

    /// Local position in the consumer frame.
    pub fn local_position(&self, device: Option<&str>) -> Option<Vec3> {
        self.read(device, |r| Some(position_to_consumer(r.fields.local_position)))
    }

    /// [`local_position`](Self::local_position), or the zero vector.
    pub fn position_or_zero(&self, device: Option<&str>) -> Vec3 {
        self.local_position(device).unwrap_or_else(Vec3::zero)
    }

    /// Geodetic location; absent until the location status leaves
    /// `Uninitialized`.
    pub fn global_location(&self, device: Option<&str>) -> Option<GlobalLocation> {
        self.read(device, |r| r.has_global_fix().then_some(r.fields.global_location))
    }

    /// Global heading in degrees; absent until the location status leaves
    /// `Uninitialized`.
    pub fn global_heading(&self, device: Option<&str>) -> Option<f64> {
        self.read(device, |r| r.has_global_fix().then_some(r.fields.heading))
    }

    /// Heading in the local frame, in degrees.
    pub fn local_heading(&self, device: Option<&str>) -> Option<f64> {
        self.read(device, |r| Some(r.fields.local_heading))
    }

    /// [`local_heading`](Self::local_heading), or `0.0`.
    pub fn heading_or_zero(&self, device: Option<&str>) -> f64 {
        self.local_heading(device).unwrap_or(0.0)
    }

    /// Radius of position error in the local frame.  Not gated by status.
    pub fn uncertainty(&self, device: Option<&str>) -> Option<Vec2> {
        self.read(device, |r| Some(uncertainty_to_consumer(r.fields.position_uncertainty)))
    }

    /// [`uncertainty`](Self::uncertainty), or the zero vector.
    pub fn uncertainty_or_zero(&self, device: Option<&str>) -> Vec2 {
        self.uncertainty(device).unwrap_or_else(Vec2::zero)
    }

    // ------------------------------------------------------------------
    // Vertical motion
    // ------------------------------------------------------------------

    pub fn try_vertical_motion_direction(&self, device: Option<&str>) -> Option<VerticalDirection> {
        self.read(device, |r| Some(r.fields.vertical_direction))
    }

    pub fn vertical_motion_direction(&self, device: Option<&str>) -> VerticalDirection {
        self.try_vertical_motion_direction(device)
            .unwrap_or(VerticalDirection::Invalid)
    }

    pub fn try_vertical_motion_type(&self, device: Option<&str>) -> Option<VerticalMotionType> {
        self.read(device, |r| Some(r.fields.vertical_motion_type))
    }

    pub fn vertical_motion_type(&self, device: Option<&str>) -> VerticalMotionType {
        self.try_vertical_motion_type(device)
            .unwrap_or(VerticalMotionType::Invalid)
    }

    // ------------------------------------------------------------------
    // Orientation
    // ------------------------------------------------------------------

    /// Roll / pitch / yaw exactly as the engine reported them.
    pub fn attitude(&self, device: Option<&str>) -> Option<Attitude> {
        self.read(device, |r| Some(r.fields.attitude))
    }

    /// Orientation quaternion in the consumer frame.
    pub fn orientation(&self, device: Option<&str>) -> Option<Quaternion> {
        self.read(device, |r| Some(orientation_to_consumer(r.fields.orientation)))
    }

    /// [`orientation`](Self::orientation), or the identity rotation.
    pub fn orientation_or_identity(&self, device: Option<&str>) -> Quaternion {
        self.orientation(device).unwrap_or_else(Quaternion::identity)
    }

    // ------------------------------------------------------------------
    // Motion classification
    // ------------------------------------------------------------------

    pub fn step_frequency(&self, device: Option<&str>) -> Option<f64> {
        self.read(device, |r| Some(r.fields.step_frequency))
    }

    pub fn try_primary_motion(&self, device: Option<&str>) -> Option<PrimaryMotion> {
        self.read(device, |r| Some(r.fields.primary_motion))
    }

    pub fn primary_motion(&self, device: Option<&str>) -> PrimaryMotion {
        self.try_primary_motion(device)
            .unwrap_or(PrimaryMotion::Invalid)
    }

    pub fn try_secondary_motion(&self, device: Option<&str>) -> Option<SecondaryMotion> {
        self.read(device, |r| Some(r.fields.secondary_motion))
    }

    pub fn secondary_motion(&self, device: Option<&str>) -> SecondaryMotion {
        self.try_secondary_motion(device)
            .unwrap_or(SecondaryMotion::Invalid)
    }

    pub fn motion_statistics(&self, device: Option<&str>) -> Option<MotionStatistics> {
        self.read(device, |r| Some(r.fields.motion_statistics))
    }

    // ------------------------------------------------------------------
    // Identity & freshness
    // ------------------------------------------------------------------

    /// Display name reported by the engine; may be empty.
    pub fn device_name(&self, device: Option<&str>) -> Option<String> {
        self.read(device, |r| Some(r.fields.device_name.clone()))
    }

    pub fn try_timestamp(&self, device: Option<&str>) -> Option<f64> {
        self.read(device, |r| Some(r.last_update_timestamp))
    }

    /// Session time of the latest update, or [`ABSENT_TIMESTAMP`].
    pub fn timestamp(&self, device: Option<&str>) -> f64 {
        self.try_timestamp(device).unwrap_or(ABSENT_TIMESTAMP)
    }

    /// Devices whose latest update is older than `max_age`.
    ///
    /// Read-only: nothing is evicted.
    pub fn inactive_devices(&self, max_age: Duration) -> Vec<DeviceId> {
        let now = self.clock.now();
        let max_age = max_age.as_secs_f64();
        self.registry
            .all_ids()
            .into_iter()
            .filter(|id| {
                self.registry
                    .read_with(id.as_str(), |r| now - r.last_update_timestamp > max_age)
                    .unwrap_or(false)
            })
            .collect()
    }
}
