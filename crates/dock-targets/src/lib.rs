//! High-level facade crate for the `dock-targets-*` workspace.
//!
//! This crate provides:
//! - re-exports of the geometry crates,
//! - JSON config/report helpers around the pure resolvers ([`io`]),
//! - (feature `cli`) the `dock-targets` command line tool.
//!
//! ## Quickstart
//!
//! ```
//! use dock_targets::marker::{resolve_marker_corners, DrawingUnit, MarkerSpec};
//!
//! let specs = [MarkerSpec::new(3, [0.05, 0.10], 0.02)];
//! let res = resolve_marker_corners(&specs, DrawingUnit::Millimeters);
//! assert_eq!(res.corners.len(), 1);
//! ```
//!
//! ## API map
//! - `dock_targets::core`: quaternion angular error, dock poses, logger.
//! - `dock_targets::marker`: drawing units, marker specs, corner resolution.
//! - `dock_targets::io`: JSON marker tables and corner reports.

pub use dock_targets_core as core;
pub use dock_targets_marker as marker;

pub use dock_targets_core::{angular_error_degrees, DockPose};
pub use dock_targets_marker::{
    resolve_marker_corners, DrawingUnit, MarkerCorners, MarkerResolution, MarkerSpec,
};

pub mod io;
