//! Simulated walkers feeding the [`SimEngine`] behind the shell.
//!
//! Each walker paces a circle in the native horizontal plane (x/y, z up) and
//! publishes a `DeviceUpdated` notification per tick, the same way a real
//! engine announces fresh estimates.  One walker in every four never gets a
//! global fix, so `/show` demonstrates the gated global fields.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use motion_registry::SimEngine;
use motion_runtime::NotificationBus;
use motion_types::{
    Attitude, DeviceId, GlobalLocation, LocationStatus, MotionStatistics, NativeQuaternion,
    NativeXy, NativeXyz, PrimaryMotion, RawDeviceFields, SecondaryMotion, VerticalDirection,
    VerticalMotionType,
};
use tracing::{debug, info};

const ORIGIN_LAT: f64 = 47.3769;
const ORIGIN_LON: f64 = 8.5417;
const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// One simulated device walking a circle.
#[derive(Debug, Clone)]
pub struct Walker {
    pub id: DeviceId,
    radius: f64,
    /// Radians per second around the circle.
    angular_speed: f64,
    phase: f64,
    has_fix: bool,
    elapsed: f64,
}

impl Walker {
    pub fn new(id: impl Into<DeviceId>, index: usize) -> Self {
        let i = index as f64;
        Self {
            id: id.into(),
            radius: 3.0 + 2.0 * i,
            angular_speed: 0.2 + 0.05 * i,
            phase: i * 1.3,
            has_fix: index % 4 != 3,
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.elapsed += dt;
    }

    fn angle(&self) -> f64 {
        self.phase + self.angular_speed * self.elapsed
    }

    /// The engine snapshot for the walker's current state.
    pub fn fields(&self) -> RawDeviceFields {
        let a = self.angle();
        let (sin_a, cos_a) = a.sin_cos();
        let x = self.radius * cos_a;
        let y = self.radius * sin_a;

        // Tangent of the circle, counter-clockwise about native z.
        let yaw = a + std::f64::consts::FRAC_PI_2;
        let (half_sin, half_cos) = (yaw / 2.0).sin_cos();
        let heading_deg = (90.0 - yaw.to_degrees()).rem_euclid(360.0);

        let walking = (self.elapsed as u64 / 10) % 3 != 2;
        let lat = ORIGIN_LAT + y / METERS_PER_DEG_LAT;
        let lon = ORIGIN_LON + x / (METERS_PER_DEG_LAT * ORIGIN_LAT.to_radians().cos());

        RawDeviceFields {
            location_status: if self.has_fix {
                LocationStatus::GpsInitialized
            } else {
                LocationStatus::Uninitialized
            },
            local_position: NativeXyz::new(x, y, 0.0),
            global_location: GlobalLocation {
                latitude: lat,
                longitude: lon,
                altitude: 408.0,
            },
            position_uncertainty: NativeXy::new(0.5 + 0.1 * self.radius, 0.5 + 0.1 * self.radius),
            attitude: Attitude {
                roll: 0.0,
                pitch: 0.0,
                yaw: yaw.to_degrees(),
            },
            orientation: NativeQuaternion::new(half_cos, 0.0, 0.0, half_sin),
            heading: heading_deg,
            local_heading: yaw.to_degrees().rem_euclid(360.0),
            vertical_direction: VerticalDirection::Constant,
            vertical_motion_type: VerticalMotionType::Level,
            step_frequency: if walking { 1.6 + 0.1 * self.angular_speed } else { 0.0 },
            primary_motion: if walking {
                PrimaryMotion::Forward
            } else {
                PrimaryMotion::Stationary
            },
            secondary_motion: if walking {
                SecondaryMotion::ForwardInHand
            } else {
                SecondaryMotion::Undefined
            },
            device_name: format!("walker {}", self.id),
            motion_statistics: MotionStatistics {
                dwelling: 0.0,
                walking: if walking { 1.0 } else { 0.0 },
                stationary: if walking { 0.0 } else { 1.0 },
            },
        }
    }
}

/// The local device plus `count` peers.
pub fn spawn_walkers(current_device: &str, count: usize) -> Vec<Walker> {
    std::iter::once(Walker::new(current_device, 0))
        .chain((1..=count).map(|i| Walker::new(format!("walker-{i}"), i)))
        .collect()
}

/// Engine seeded with every walker's initial snapshot.
pub fn build_engine(current_device: &str, walkers: &[Walker]) -> SimEngine {
    walkers
        .iter()
        .fold(
            SimEngine::builder().with_current_device(current_device),
            |b, w| b.with_device(w.id.clone(), w.fields()),
        )
        .build()
}

/// Drive `walkers` on a background thread until `shutdown` is set.
pub fn run_driver(
    engine: Arc<SimEngine>,
    bus: NotificationBus,
    mut walkers: Vec<Walker>,
    rate: Duration,
    shutdown: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("sim-engine".to_string())
        .spawn(move || {
            info!(walkers = walkers.len(), rate_ms = rate.as_millis() as u64, "simulated engine running");
            let dt = rate.as_secs_f64();
            while !shutdown.load(Ordering::SeqCst) {
                for w in &mut walkers {
                    w.advance(dt);
                    engine.set_snapshot(w.id.clone(), w.fields());
                    if let Err(e) = bus.device_updated(w.id.clone()) {
                        debug!(error = %e, "no listener for update");
                    }
                }
                std::thread::sleep(rate);
            }
            info!("simulated engine stopped");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_registry::EngineBoundary;

    #[test]
    fn walker_stays_on_its_circle() {
        let mut w = Walker::new("w", 2);
        for _ in 0..50 {
            w.advance(0.37);
            let p = w.fields().local_position;
            assert!(((p.x * p.x + p.y * p.y).sqrt() - 7.0).abs() < 1e-9);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn orientation_is_unit_length() {
        let mut w = Walker::new("w", 1);
        w.advance(4.2);
        let q = w.fields().orientation;
        let norm = (q.w * q.w + q.x * q.x + q.y * q.y + q.z * q.z).sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn every_fourth_walker_lacks_a_fix() {
        let walkers = spawn_walkers("self", 4);
        assert_eq!(walkers.len(), 5);
        assert_eq!(walkers[0].id.as_str(), "self");
        assert_eq!(walkers[3].fields().location_status, LocationStatus::Uninitialized);
        assert_eq!(walkers[1].fields().location_status, LocationStatus::GpsInitialized);
    }

    #[test]
    fn engine_is_seeded_with_all_walkers() {
        let walkers = spawn_walkers("me", 2);
        let engine = build_engine("me", &walkers);
        assert_eq!(engine.device_ids().len(), 3);
        assert_eq!(engine.query_current_device_id().unwrap().as_str(), "me");
    }
}
