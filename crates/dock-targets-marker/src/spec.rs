use serde::{Deserialize, Serialize};

/// One square fiducial marker as laid out on the printable target.
///
/// `position` is the marker's top-left corner and `size` its edge length,
/// both in drawing units (x right, y down).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub id: u32,
    pub position: [f64; 2],
    pub size: f64,
}

/// A marker spec that cannot produce a valid rectangle.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidMarkerSpec {
    #[error("marker {id}: size must be finite and > 0 (got {size})")]
    NonPositiveSize { id: u32, size: f64 },
    #[error("marker {id}: position must be finite (got [{x}, {y}])")]
    NonFinitePosition { id: u32, x: f64, y: f64 },
}

impl InvalidMarkerSpec {
    /// Id of the offending marker.
    pub fn id(&self) -> u32 {
        match *self {
            InvalidMarkerSpec::NonPositiveSize { id, .. }
            | InvalidMarkerSpec::NonFinitePosition { id, .. } => id,
        }
    }
}

impl MarkerSpec {
    pub fn new(id: u32, position: [f64; 2], size: f64) -> Self {
        Self { id, position, size }
    }

    pub fn validate(&self) -> Result<(), InvalidMarkerSpec> {
        let [x, y] = self.position;
        if !x.is_finite() || !y.is_finite() {
            return Err(InvalidMarkerSpec::NonFinitePosition { id: self.id, x, y });
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(InvalidMarkerSpec::NonPositiveSize {
                id: self.id,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Edge length in meters for the given meters-per-unit scale.
    #[inline]
    pub fn edge_length_m(&self, scale_factor: f64) -> f64 {
        scale_factor * self.size
    }
}
