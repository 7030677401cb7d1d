use nalgebra::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// Rigid pose of a dock plate in some external frame (e.g. the world).
///
/// This is configuration data: `orientation` is a `[w, x, y, z]` quaternion
/// and is normalized when converted with [`DockPose::to_isometry`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DockPose {
    pub position: [f64; 3],
    pub orientation: [f64; 4],
}

/// Dock pose conversion errors.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum PoseError {
    #[error("dock orientation has near-zero or non-finite norm ({norm})")]
    DegenerateOrientation { norm: f64 },
    #[error("dock position must be finite")]
    NonFinitePosition,
}

impl DockPose {
    pub fn identity() -> Self {
        Self {
            position: [0.0; 3],
            orientation: [1.0, 0.0, 0.0, 0.0],
        }
    }

    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        let t = iso.translation.vector;
        let q = iso.rotation.quaternion();
        Self {
            position: [t.x, t.y, t.z],
            orientation: [q.w, q.i, q.j, q.k],
        }
    }

    /// Build the rigid transform `p_dst = R * p_dock + t`.
    pub fn to_isometry(&self) -> Result<Isometry3<f64>, PoseError> {
        let [x, y, z] = self.position;
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(PoseError::NonFinitePosition);
        }
        let [w, i, j, k] = self.orientation;
        let q = Quaternion::new(w, i, j, k);
        let norm = q.norm();
        let rotation = UnitQuaternion::try_new(q, 1e-12)
            .filter(|_| norm.is_finite())
            .ok_or(PoseError::DegenerateOrientation { norm })?;
        Ok(Isometry3::from_parts(Translation3::new(x, y, z), rotation))
    }
}

/// Apply a rigid transform to every point of a set.
pub fn transform_points(iso: &Isometry3<f64>, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    points.iter().map(|p| iso.transform_point(p)).collect()
}
