//! `motion-registry` – device state cache and its update protocol.
//!
//! # Modules
//!
//! - [`registry`] – [`DeviceRegistry`][registry::DeviceRegistry]: concurrent
//!   map from device id to the latest [`DeviceStateRecord`][motion_types::DeviceStateRecord].
//! - [`engine`] – [`EngineBoundary`][engine::EngineBoundary]: the query side
//!   of the external sensing engine.
//! - [`ingest`] – [`UpdateIngestion`][ingest::UpdateIngestion]: pull-on-notify
//!   entry point that commits engine snapshots into the registry.
//! - [`clock`] – session-relative monotonic time used to stamp records.
//! - [`sim`] – [`SimEngine`][sim::SimEngine]: in-process engine for tests,
//!   CI and demos.

pub mod clock;
pub mod engine;
pub mod ingest;
pub mod registry;
pub mod sim;

pub use clock::{Clock, ManualClock, SessionClock};
pub use engine::EngineBoundary;
pub use ingest::{IngestOutcome, UpdateIngestion};
pub use registry::DeviceRegistry;
pub use sim::SimEngine;
