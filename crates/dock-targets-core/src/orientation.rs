//! Angular distance between orientations.

use nalgebra::{Isometry3, Quaternion, UnitQuaternion};

/// Angular separation, in degrees, between two orientation quaternions.
///
/// Both inputs must already be (approximately) unit quaternions. They are
/// **not** normalized here: a non-unit input is an upstream bug, and the
/// returned value is meaningless for it.
///
/// The angle is `acos(2 * <q1, q2>^2 - 1)`, the magnitude of the shortest
/// rotation taking one orientation to the other. Squaring the dot product
/// makes `q` and `-q` compare equal. The cosine is clamped to `[-1, 1]`
/// before `acos`, so rounding slack on nearly identical inputs returns `0`
/// instead of `NaN`.
///
/// The result lies in `[0, 180]`.
pub fn angular_error_degrees(q1: &Quaternion<f64>, q2: &Quaternion<f64>) -> f64 {
    let dot = q1.coords.dot(&q2.coords);
    cosine_to_degrees(2.0 * dot * dot - 1.0)
}

/// [`angular_error_degrees`] for `UnitQuaternion` inputs.
#[inline]
pub fn angular_error_degrees_unit(q1: &UnitQuaternion<f64>, q2: &UnitQuaternion<f64>) -> f64 {
    angular_error_degrees(q1.quaternion(), q2.quaternion())
}

/// Angular error between the rotation parts of two poses, ignoring translation.
#[inline]
pub fn pose_rotation_error_degrees(a: &Isometry3<f64>, b: &Isometry3<f64>) -> f64 {
    angular_error_degrees_unit(&a.rotation, &b.rotation)
}

#[inline]
fn cosine_to_degrees(cos_theta: f64) -> f64 {
    cos_theta.clamp(-1.0, 1.0).acos().to_degrees()
}
