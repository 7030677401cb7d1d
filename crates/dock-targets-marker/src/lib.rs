//! Fiducial marker corners on a dock target plate.
//!
//! Marker artwork is authored in a 2D drawing frame (x right, y down, in the
//! drawing's unit). This crate lifts each square marker into the 3D plate
//! frame used by calibration code:
//!
//! - drawing `x` -> plate `z`,
//! - drawing `y` -> plate `-y`,
//! - plate `x` is the plate normal and stays `0`.
//!
//! Coordinates are scaled to meters by the resolved [`DrawingUnit`]. Placing
//! the plate in a world frame is a separate, optional step (see
//! [`MarkerCorners::transformed`] and [`transform_corners`]).

mod corners;
mod resolve;
mod spec;
mod units;

pub use corners::{transform_corners, MarkerCorners};
pub use resolve::{resolve_marker, resolve_marker_corners, MarkerResolution, ResolveDiagnostic};
pub use spec::{InvalidMarkerSpec, MarkerSpec};
pub use units::{DrawingUnit, METERS_PER_INCH, METERS_PER_MILLIMETER};
