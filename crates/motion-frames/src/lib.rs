//! `motion-frames` – coordinate-frame conversion.
//!
//! Bridges the sensing engine's native axis convention and the consuming
//! application's convention.
//!
//! # Modules
//!
//! - [`transform`] – consumer-frame [`Vec3`][transform::Vec3],
//!   [`Vec2`][transform::Vec2] and [`Quaternion`][transform::Quaternion]
//!   with the rotation math needed to use them.
//! - [`frame`] – pure native → consumer remaps for positions, orientations
//!   and uncertainty.

pub mod frame;
pub mod transform;

pub use frame::{orientation_to_consumer, position_to_consumer, uncertainty_to_consumer};
pub use transform::{Quaternion, Vec2, Vec3};
