//! `motion-types` – shared data model for the MotionState workspace.
//!
//! Everything the engine reports about one device lives here: the
//! classification enums (each carrying an `Invalid` sentinel), the
//! engine-native value structs, the [`RawDeviceFields`] snapshot pulled from
//! the engine boundary and the [`DeviceStateRecord`] cached per device.
//!
//! All numeric fields are in the engine's **native** convention.  Conversion
//! into the consumer frame happens on read, in `motion-frames`.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Device identifier
// ────────────────────────────────────────────────────────────────────────────

/// Opaque, immutable token identifying one physical or logical device.
///
/// The empty identifier is reserved: accessors treat it as "the current
/// device".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the reserved "current device" identifier.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classification enums
// ────────────────────────────────────────────────────────────────────────────

/// Implements the engine's integer encoding for a classification enum:
/// declared variants map to their ordinal, anything else to `Invalid` (-1).
macro_rules! engine_ordinals {
    ($name:ident { $($variant:ident = $ordinal:literal),+ $(,)? }) => {
        impl $name {
            /// Decode an engine ordinal.  Unknown values become `Invalid`.
            pub fn from_ordinal(ordinal: i32) -> Self {
                match ordinal {
                    $($ordinal => Self::$variant,)+
                    _ => Self::Invalid,
                }
            }

            /// The engine ordinal of this value (`Invalid` is -1).
            pub fn ordinal(self) -> i32 {
                match self {
                    $(Self::$variant => $ordinal,)+
                    Self::Invalid => -1,
                }
            }

            /// `true` unless this is the `Invalid` sentinel.
            pub fn is_valid(self) -> bool {
                self != Self::Invalid
            }
        }
    };
}

/// How the device's location was (or is being) established.
///
/// `Invalid` is never produced by the engine; the accessor layer returns it
/// when no record exists for the requested device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationStatus {
    /// No location has been initialised yet.
    Uninitialized,
    /// Set from a user-supplied latitude/longitude (and heading).
    UserInitialized,
    /// Resolved from GPS.
    GpsInitialized,
    /// The engine's own localisation is still converging.
    EngineInitializing,
    /// The engine's own localisation has converged.
    EngineInitialized,
    /// Set from a beacon.
    BeaconInitialized,
    Invalid,
}

engine_ordinals!(LocationStatus {
    Uninitialized = 0,
    UserInitialized = 1,
    GpsInitialized = 2,
    EngineInitializing = 3,
    EngineInitialized = 4,
    BeaconInitialized = 5,
});

/// Direction of vertical motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalDirection {
    Up,
    Down,
    Constant,
    Invalid,
}

engine_ordinals!(VerticalDirection {
    Up = 0,
    Down = 1,
    Constant = 2,
});

/// Means of vertical motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalMotionType {
    EscalatorOrStairs,
    Elevator,
    Level,
    Invalid,
}

engine_ordinals!(VerticalMotionType {
    EscalatorOrStairs = 0,
    Elevator = 1,
    Level = 2,
});

/// Coarse motion classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimaryMotion {
    Stationary,
    Fidgeting,
    Forward,
    Invalid,
}

engine_ordinals!(PrimaryMotion {
    Stationary = 0,
    Fidgeting = 1,
    Forward = 2,
});

/// Fine motion classification: how the device is being carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecondaryMotion {
    Undefined,
    ForwardInHand,
    ForwardInHandSwinging,
    ForwardInPocket,
    ForwardInCall,
    Dwelling,
    Jumping,
    Invalid,
}

engine_ordinals!(SecondaryMotion {
    Undefined = 0,
    ForwardInHand = 1,
    ForwardInHandSwinging = 2,
    ForwardInPocket = 3,
    ForwardInCall = 4,
    Dwelling = 5,
    Jumping = 6,
});

// ────────────────────────────────────────────────────────────────────────────
// Engine-native value types
// ────────────────────────────────────────────────────────────────────────────

/// A point in the engine's local Cartesian frame (metres, origin fixed at
/// session start or the last local reset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeXyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl NativeXyz {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A planar pair in the engine's local frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeXy {
    pub x: f64,
    pub y: f64,
}

impl NativeXy {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Orientation quaternion in the engine's frame, `(w, x, y, z)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NativeQuaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl NativeQuaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }
}

impl Default for NativeQuaternion {
    fn default() -> Self {
        Self::identity()
    }
}

/// Geodetic position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Roll / pitch / yaw as reported by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Attitude {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Proportions of time spent dwelling, walking and stationary.
///
/// Normalisation is the engine's business; values are passed through as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionStatistics {
    pub dwelling: f64,
    pub walking: f64,
    pub stationary: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Snapshots
// ────────────────────────────────────────────────────────────────────────────

/// The complete field set for one device, as pulled from the engine.
///
/// `heading` and `local_heading` are in degrees.  Numeric fields are not
/// sanitised: a NaN reported by the engine is stored and returned as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDeviceFields {
    pub location_status: LocationStatus,
    pub local_position: NativeXyz,
    /// Meaningful only when `location_status` is not `Uninitialized`.
    pub global_location: GlobalLocation,
    /// Radius of error in the local frame.
    pub position_uncertainty: NativeXy,
    pub attitude: Attitude,
    pub orientation: NativeQuaternion,
    pub heading: f64,
    pub local_heading: f64,
    pub vertical_direction: VerticalDirection,
    pub vertical_motion_type: VerticalMotionType,
    pub step_frequency: f64,
    pub primary_motion: PrimaryMotion,
    pub secondary_motion: SecondaryMotion,
    pub device_name: String,
    pub motion_statistics: MotionStatistics,
}

impl Default for RawDeviceFields {
    fn default() -> Self {
        Self {
            location_status: LocationStatus::Uninitialized,
            local_position: NativeXyz::default(),
            global_location: GlobalLocation::default(),
            position_uncertainty: NativeXy::default(),
            attitude: Attitude::default(),
            orientation: NativeQuaternion::identity(),
            heading: 0.0,
            local_heading: 0.0,
            vertical_direction: VerticalDirection::Constant,
            vertical_motion_type: VerticalMotionType::Level,
            step_frequency: 0.0,
            primary_motion: PrimaryMotion::Stationary,
            secondary_motion: SecondaryMotion::Undefined,
            device_name: String::new(),
            motion_statistics: MotionStatistics::default(),
        }
    }
}

/// The most recent known state of one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStateRecord {
    pub fields: RawDeviceFields,
    /// Session-relative time (seconds) of the ingestion that produced this
    /// record.
    pub last_update_timestamp: f64,
}

impl DeviceStateRecord {
    pub fn new(fields: RawDeviceFields, last_update_timestamp: f64) -> Self {
        Self {
            fields,
            last_update_timestamp,
        }
    }

    /// Global location and global heading are only meaningful once the
    /// location has been initialised by some means.
    pub fn has_global_fix(&self) -> bool {
        self.fields.location_status != LocationStatus::Uninitialized
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Faults raised at the engine boundary and the notification plumbing.
///
/// Missing devices and unmet preconditions are not errors: the accessor
/// layer reports them as absent values.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MotionError {
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Engine reported no current device")]
    NoCurrentDevice,

    #[error("Notification channel error: {0}")]
    Channel(String),
}
