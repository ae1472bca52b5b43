//! Native → consumer frame conversion.
//!
//! The engine reports positions in its own local axes and orientations as a
//! `(w, x, y, z)` quaternion.  The consumer convention is reached by an exact
//! axis permutation with one sign flip:
//!
//! ```text
//! position     (x, y, z)      → (−y, z, x)
//! orientation  (w, x, y, z)   → (x', y', z', w') = (y, −x, z, w)
//! ```
//!
//! Records are stored natively; these functions run on read only.  They are
//! pure and never touch scalar fields (heading, attitude, classifications),
//! which pass through unchanged.
//!
//! The orientation remap is the one the engine SDK has always exposed.  It
//! agrees with the position remap for rotations about the native y axis (the
//! consumer x axis); rotations about other native axes are not related to
//! the position remap by the same frame change.

use motion_types::{NativeQuaternion, NativeXy, NativeXyz};

use crate::transform::{Quaternion, Vec2, Vec3};

/// Map a native local position into the consumer frame: `(−y, z, x)`.
pub fn position_to_consumer(p: NativeXyz) -> Vec3 {
    Vec3::new(-p.y, p.z, p.x)
}

/// Map a native orientation into the consumer frame.
///
/// Consumer components `(x, y, z, w)` are `(native.y, −native.x, native.z,
/// native.w)`.
pub fn orientation_to_consumer(q: NativeQuaternion) -> Quaternion {
    Quaternion::from_xyzw(q.y, -q.x, q.z, q.w)
}

/// Position uncertainty is a planar radius pair; no remap is defined for it.
pub fn uncertainty_to_consumer(u: NativeXy) -> Vec2 {
    Vec2::new(u.x, u.y)
}

/// Rotate a native vector by a native quaternion, staying in the native
/// frame.  Used to check conversions against engine-side rotations.
pub fn rotate_native(q: NativeQuaternion, v: NativeXyz) -> NativeXyz {
    let r = Quaternion::new(q.w, q.x, q.y, q.z).rotate(Vec3::new(v.x, v.y, v.z));
    NativeXyz::new(r.x, r.y, r.z)
}
