//! `motion-runtime` – session, accessor layer and notification plumbing.
//!
//! Ties the registry and ingestion protocol from `motion-registry` to the
//! frame conversion in `motion-frames` and exposes the read API application
//! code uses.
//!
//! # Modules
//!
//! - [`session`] – [`MotionSession`][session::MotionSession]: explicitly
//!   owned session object holding the registry, ingestion entry point and
//!   query handle.
//! - [`query`] – [`MotionQuery`][query::MotionQuery]: per-attribute accessors
//!   keyed by device id, returning consumer-frame values or the documented
//!   absent value.
//! - [`current_device`] – [`CurrentDevice`][current_device::CurrentDevice]:
//!   cached resolution of the local device id, used when no id is given.
//! - [`notify`] – [`NotificationBus`][notify::NotificationBus] and
//!   [`spawn_ingestion_listener`][notify::spawn_ingestion_listener]: push
//!   notifications from the engine driving ingestion on a Tokio task.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: `tracing`
//!   subscriber with optional OTLP span export.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use motion_registry::SimEngine;
//! use motion_runtime::MotionSession;
//! use motion_types::{NativeXyz, RawDeviceFields};
//!
//! let engine = Arc::new(
//!     SimEngine::builder()
//!         .with_current_device("self")
//!         .with_device("self", RawDeviceFields {
//!             local_position: NativeXyz::new(1.0, 2.0, 3.0),
//!             ..RawDeviceFields::default()
//!         })
//!         .build(),
//! );
//! let session = MotionSession::new(engine);
//! session.on_device_updated("self");
//!
//! let p = session.query().local_position(None).unwrap();
//! assert_eq!((p.x, p.y, p.z), (-2.0, 3.0, 1.0));
//! ```

pub mod current_device;
pub mod notify;
pub mod query;
pub mod session;
pub mod telemetry;

pub use current_device::CurrentDevice;
pub use notify::{EngineNotification, NotificationBus, spawn_ingestion_listener};
pub use query::{ABSENT_TIMESTAMP, DeviceView, MotionQuery};
pub use session::MotionSession;
pub use telemetry::{TracerProviderGuard, init_tracing};
