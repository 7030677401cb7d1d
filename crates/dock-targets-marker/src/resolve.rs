//! Drawing-frame marker specs -> plate-frame corners.

use log::{debug, warn};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{DrawingUnit, InvalidMarkerSpec, MarkerCorners, MarkerSpec};

/// Non-fatal findings raised while resolving a marker table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveDiagnostic {
    /// No drawing unit was declared; a scale factor of 1.0 (meters) was used.
    UnitUnspecified,
    /// More than one spec carries this id. All of them were resolved.
    DuplicateMarkerId { id: u32 },
}

/// Outcome of resolving a batch of marker specs.
#[derive(Clone, Debug)]
pub struct MarkerResolution {
    pub unit: DrawingUnit,
    /// Meters per drawing unit that was applied.
    pub scale_factor: f64,
    /// Resolved markers in the plate frame, ordered by id.
    pub corners: Vec<MarkerCorners>,
    /// Specs that were skipped, ordered by id.
    pub rejected: Vec<InvalidMarkerSpec>,
    pub diagnostics: Vec<ResolveDiagnostic>,
}

impl MarkerResolution {
    pub fn get(&self, id: u32) -> Option<&MarkerCorners> {
        self.corners.iter().find(|c| c.id == id)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Resolve a single marker with an explicit meters-per-unit scale.
///
/// With `k = scale_factor`, position `(px, py)` and size `s`:
///
/// ```text
/// top_left     = k * (0, -py, px)
/// top_right    = top_left    + k * (0, -s, 0)
/// bottom_left  = top_left    + k * (0,  0, s)
/// bottom_right = bottom_left + k * (0, -s, 0)
/// ```
pub fn resolve_marker(
    spec: &MarkerSpec,
    scale_factor: f64,
) -> Result<MarkerCorners, InvalidMarkerSpec> {
    spec.validate()?;

    let [px, py] = spec.position;
    let s = spec.size;

    let top_left = Point3::new(0.0, -py, px) * scale_factor;
    let across = Vector3::new(0.0, -s, 0.0) * scale_factor;
    let down = Vector3::new(0.0, 0.0, s) * scale_factor;

    let top_right = top_left + across;
    let bottom_left = top_left + down;
    let bottom_right = bottom_left + across;

    Ok(MarkerCorners {
        id: spec.id,
        top_left,
        top_right,
        bottom_left,
        bottom_right,
    })
}

/// Resolve every marker of a table into the plate frame.
///
/// Invalid specs are reported in [`MarkerResolution::rejected`] and do not
/// stop the rest of the batch. An unspecified unit resolves to meters and
/// is reported as [`ResolveDiagnostic::UnitUnspecified`].
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(specs, unit), fields(markers = specs.len(), unit = %unit))
)]
pub fn resolve_marker_corners(specs: &[MarkerSpec], unit: DrawingUnit) -> MarkerResolution {
    let scale_factor = unit.scale_factor();
    let mut diagnostics = Vec::new();

    if !unit.is_specified() {
        warn!("drawing unit not specified, treating marker coordinates as meters");
        diagnostics.push(ResolveDiagnostic::UnitUnspecified);
    }

    let mut ordered: Vec<&MarkerSpec> = specs.iter().collect();
    ordered.sort_by_key(|spec| spec.id);

    let mut corners = Vec::with_capacity(ordered.len());
    let mut rejected = Vec::new();
    let mut prev_id = None;

    for spec in ordered {
        if prev_id == Some(spec.id)
            && !diagnostics.contains(&ResolveDiagnostic::DuplicateMarkerId { id: spec.id })
        {
            warn!("marker id {} appears more than once", spec.id);
            diagnostics.push(ResolveDiagnostic::DuplicateMarkerId { id: spec.id });
        }
        prev_id = Some(spec.id);

        match resolve_marker(spec, scale_factor) {
            Ok(c) => corners.push(c),
            Err(err) => {
                warn!("skipping marker: {err}");
                rejected.push(err);
            }
        }
    }

    debug!(
        "resolved {} markers ({} rejected) with unit {} (scale {})",
        corners.len(),
        rejected.len(),
        unit,
        scale_factor
    );

    MarkerResolution {
        unit,
        scale_factor,
        corners,
        rejected,
        diagnostics,
    }
}
