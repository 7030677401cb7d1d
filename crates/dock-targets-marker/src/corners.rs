use nalgebra::{Isometry3, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// The four corners of one marker in a 3D frame (meters).
///
/// "Top" and "left" refer to the marker as seen on the drawing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerCorners {
    pub id: u32,
    pub top_left: Point3<f64>,
    pub top_right: Point3<f64>,
    pub bottom_left: Point3<f64>,
    pub bottom_right: Point3<f64>,
}

impl MarkerCorners {
    /// Corners in TL, TR, BR, BL order.
    #[inline]
    pub fn corners(&self) -> [Point3<f64>; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Horizontal (`top_right - top_left`) and vertical
    /// (`bottom_left - top_left`) edge vectors.
    #[inline]
    pub fn edge_vectors(&self) -> (Vector3<f64>, Vector3<f64>) {
        (
            self.top_right - self.top_left,
            self.bottom_left - self.top_left,
        )
    }

    pub fn center(&self) -> Point3<f64> {
        Point3::from((self.top_left.coords + self.bottom_right.coords) * 0.5)
    }

    /// Map all four corners through a rigid transform, e.g. dock -> world.
    pub fn transformed(&self, iso: &Isometry3<f64>) -> MarkerCorners {
        MarkerCorners {
            id: self.id,
            top_left: iso.transform_point(&self.top_left),
            top_right: iso.transform_point(&self.top_right),
            bottom_left: iso.transform_point(&self.bottom_left),
            bottom_right: iso.transform_point(&self.bottom_right),
        }
    }
}

/// Apply [`MarkerCorners::transformed`] to a whole resolution.
pub fn transform_corners(iso: &Isometry3<f64>, corners: &[MarkerCorners]) -> Vec<MarkerCorners> {
    corners.iter().map(|c| c.transformed(iso)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dock_targets_core::{transform_points, DockPose};
    use nalgebra::{Translation3, UnitQuaternion};

    fn unit_square(id: u32) -> MarkerCorners {
        MarkerCorners {
            id,
            top_left: Point3::new(0.0, 0.0, 0.0),
            top_right: Point3::new(0.0, -1.0, 0.0),
            bottom_left: Point3::new(0.0, 0.0, 1.0),
            bottom_right: Point3::new(0.0, -1.0, 1.0),
        }
    }

    #[test]
    fn center_and_edges() {
        let c = unit_square(0);
        assert_relative_eq!(c.center(), Point3::new(0.0, -0.5, 0.5));
        let (u, v) = c.edge_vectors();
        assert_relative_eq!(u, Vector3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(v, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn transform_matches_point_set_transform() {
        let iso = Isometry3::from_parts(
            Translation3::new(2.0, -1.0, 0.5),
            UnitQuaternion::from_euler_angles(0.1, 0.7, -1.2),
        );
        let local = [unit_square(4), unit_square(9)];
        let world = transform_corners(&iso, &local);
        assert_eq!(world.len(), 2);
        assert_eq!(world[1].id, 9);

        let expected = transform_points(&iso, &local[0].corners());
        for (got, want) in world[0].corners().iter().zip(expected.iter()) {
            assert_relative_eq!(*got, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn rigid_transform_preserves_rectangle_closure() {
        let iso = DockPose {
            position: [0.3, 0.2, 0.1],
            orientation: [0.9, 0.1, -0.3, 0.2],
        }
        .to_isometry()
        .expect("pose");
        let world = unit_square(1).transformed(&iso);
        assert_relative_eq!(
            world.bottom_right - world.bottom_left,
            world.top_right - world.top_left,
            epsilon = 1e-12
        );
        let (u, v) = world.edge_vectors();
        assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(u.dot(&v), 0.0, epsilon = 1e-12);
    }
}
