//! Core geometry for dock targets.
//!
//! This crate is purely numeric: orientation error metrics and rigid poses
//! on top of `nalgebra`. It performs no I/O and holds no global state apart
//! from the optional logger.

mod logger;
mod orientation;
mod pose;

pub use orientation::{
    angular_error_degrees, angular_error_degrees_unit, pose_rotation_error_degrees,
};
pub use pose::{transform_points, DockPose, PoseError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
