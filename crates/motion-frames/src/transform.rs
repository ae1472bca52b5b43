//! Consumer-frame vector and rotation primitives.
//!
//! These are the types handed to application code after frame conversion.
//! All arithmetic is in `f64` so the native→consumer remap stays exact.
//!
//! # Example
//!
//! ```rust
//! use motion_frames::transform::{Quaternion, Vec3};
//!
//! let v = Vec3::new(1.0, 2.0, 3.0);
//! let r = Quaternion::identity().rotate(v);
//! assert_eq!(r, v);
//! ```

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Vectors
// ────────────────────────────────────────────────────────────────────────────

/// A 3-D vector in the consumer frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Create a new vector.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    pub fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }
}

/// A 2-D vector in the consumer frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Quaternion
// ────────────────────────────────────────────────────────────────────────────

/// A unit quaternion representing a consumer-frame rotation.
///
/// Fields are named, so construction order matters only for the two
/// constructors: [`Quaternion::new`] takes `(w, x, y, z)`,
/// [`Quaternion::from_xyzw`] takes the consumer's `(x, y, z, w)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    /// Create a quaternion from `(w, x, y, z)`.  The caller is responsible
    /// for providing a unit quaternion (|q| = 1).
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Create a quaternion from components in `(x, y, z, w)` order.
    pub fn from_xyzw(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { w, x, y, z }
    }

    /// The identity rotation (no rotation).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Hamilton product: compose two rotations.
    pub fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }

    /// Conjugate (== inverse for a unit quaternion).
    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    pub fn norm(self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Rotate a vector by this quaternion: p' = q * p * q*.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let p = Self::new(0.0, v.x, v.y, v.z);
        let rotated = self.mul(p).mul(self.conjugate());
        Vec3::new(rotated.x, rotated.y, rotated.z)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    const EPS: f64 = 1e-12;

    #[test]
    fn quaternion_identity_rotate_is_noop() {
        let r = Quaternion::identity().rotate(Vec3::new(1.0, 2.0, 3.0));
        assert!((r.x - 1.0).abs() < EPS);
        assert!((r.y - 2.0).abs() < EPS);
        assert!((r.z - 3.0).abs() < EPS);
    }

    #[test]
    fn quaternion_90deg_about_z_rotates_x_to_y() {
        let q = Quaternion::new(FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2);
        let r = q.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert!(r.x.abs() < EPS, "x should be ~0, got {}", r.x);
        assert!((r.y - 1.0).abs() < EPS, "y should be ~1, got {}", r.y);
        assert!(r.z.abs() < EPS);
    }

    #[test]
    fn quaternion_conjugate_is_inverse() {
        let q = Quaternion::new(FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2, 0.0);
        let prod = q.mul(q.conjugate());
        assert!((prod.w - 1.0).abs() < EPS);
        assert!(prod.x.abs() < EPS);
        assert!(prod.y.abs() < EPS);
        assert!(prod.z.abs() < EPS);
    }

    #[test]
    fn from_xyzw_orders_components() {
        let q = Quaternion::from_xyzw(0.1, 0.2, 0.3, 0.9);
        assert_eq!(q, Quaternion::new(0.9, 0.1, 0.2, 0.3));
    }

    #[test]
    fn rotation_preserves_length() {
        let q = Quaternion::new(0.5, 0.5, 0.5, 0.5);
        let v = Vec3::new(3.0, -4.0, 12.0);
        assert!((q.rotate(v).length() - 13.0).abs() < 1e-9);
        assert!((q.norm() - 1.0).abs() < EPS);
    }

    #[test]
    fn vector_arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a.add(b), Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b.sub(a), Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a.scale(2.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec2::zero(), Vec2::new(0.0, 0.0));
    }
}
