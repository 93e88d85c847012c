//! Math utilities and types
//!
//! Provides the fundamental math types used by the collision and physics core.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Three-valued sign, unlike `f32::signum` which treats zero as positive.
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Clamp each component of `value` into `[-limit, limit]`.
///
/// `limit` is expected to be non-negative per component.
pub fn clamp_components(value: Vec3, limit: Vec3) -> Vec3 {
    value.zip_map(&limit, |v, m| v.clamp(-m, m))
}
