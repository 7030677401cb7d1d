//! JSON marker tables and corner reports.
//!
//! The geometry crates never touch the filesystem; this module is the thin
//! layer that feeds them from configuration files and writes their output.

use crate::core::{DockPose, PoseError};
use crate::marker::{
    resolve_marker_corners, transform_corners, DrawingUnit, MarkerCorners, MarkerResolution,
    MarkerSpec, ResolveDiagnostic,
};
use log::{info, warn};
use nalgebra::Isometry3;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum DockTargetsIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum DockTargetsError {
    #[error(transparent)]
    Io(#[from] DockTargetsIoError),
    #[error(transparent)]
    Pose(#[from] PoseError),
    #[error("world frame requested but the config has no dock_pose")]
    MissingDockPose,
    #[error("{count} marker spec(s) rejected")]
    RejectedMarkers { count: usize },
}

/// Frame the reported corners are expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CornerFrame {
    /// Dock plate frame: plate normal along x, corners at x = 0.
    #[default]
    Plate,
    /// Plate frame mapped through the configured `dock_pose`.
    World,
}

/// Marker table plus the optional dock placement.
///
/// Table entries that do not parse as a [`MarkerSpec`] are kept out of
/// `markers` and listed in `malformed`, so one bad row does not fail the load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawConfig")]
pub struct DockTargetsConfig {
    pub unit: DrawingUnit,
    pub markers: Vec<MarkerSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dock_pose: Option<DockPose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(skip)]
    pub malformed: Vec<RejectedMarker>,
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    unit: DrawingUnit,
    markers: Vec<Value>,
    #[serde(default)]
    dock_pose: Option<DockPose>,
    #[serde(default)]
    output_path: Option<String>,
}

impl From<RawConfig> for DockTargetsConfig {
    fn from(raw: RawConfig) -> Self {
        let mut markers = Vec::with_capacity(raw.markers.len());
        let mut malformed = Vec::new();
        for (index, entry) in raw.markers.into_iter().enumerate() {
            let id = entry
                .get("id")
                .and_then(Value::as_u64)
                .and_then(|id| u32::try_from(id).ok());
            match serde_json::from_value::<MarkerSpec>(entry) {
                Ok(spec) => markers.push(spec),
                Err(err) => {
                    warn!("marker entry {index} skipped: {err}");
                    malformed.push(RejectedMarker {
                        id,
                        reason: format!("malformed marker entry {index}: {err}"),
                    });
                }
            }
        }
        Self {
            unit: raw.unit,
            markers,
            dock_pose: raw.dock_pose,
            output_path: raw.output_path,
            malformed,
        }
    }
}

impl DockTargetsConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DockTargetsIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DockTargetsIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path, if one is configured.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output_path.as_ref().map(PathBuf::from)
    }

    /// Run the plate-frame resolver on the configured table.
    pub fn resolve(&self) -> MarkerResolution {
        resolve_marker_corners(&self.markers, self.unit)
    }

    /// Rigid transform for the configured dock pose.
    pub fn dock_isometry(&self) -> Result<Isometry3<f64>, DockTargetsError> {
        let pose = self.dock_pose.ok_or(DockTargetsError::MissingDockPose)?;
        Ok(pose.to_isometry()?)
    }

    /// Resolve the table and package it as a report in the requested frame.
    ///
    /// Malformed table entries are merged into `rejected` alongside the specs
    /// the resolver refused.
    pub fn build_report(&self, frame: CornerFrame) -> Result<CornerReport, DockTargetsError> {
        let resolution = self.resolve();
        let mut report = match frame {
            CornerFrame::Plate => CornerReport::from_resolution(&resolution, None),
            CornerFrame::World => {
                let iso = self.dock_isometry()?;
                CornerReport::from_resolution(&resolution, Some(&iso))
            }
        };
        if !self.malformed.is_empty() {
            report.rejected.extend(self.malformed.iter().cloned());
            report.rejected.sort_by_key(|r| r.id);
        }
        Ok(report)
    }
}

/// A marker spec that did not make it into the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedMarker {
    /// `None` when a malformed table entry carried no usable id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub reason: String,
}

/// Serializable result of one resolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CornerReport {
    pub unit: DrawingUnit,
    pub scale_factor: f64,
    pub frame: CornerFrame,
    pub diagnostics: Vec<ResolveDiagnostic>,
    pub corners: Vec<MarkerCorners>,
    pub rejected: Vec<RejectedMarker>,
}

impl CornerReport {
    /// Build a report, optionally mapping corners through `dock_to_world`.
    pub fn from_resolution(
        resolution: &MarkerResolution,
        dock_to_world: Option<&Isometry3<f64>>,
    ) -> Self {
        let (frame, corners) = match dock_to_world {
            Some(iso) => (
                CornerFrame::World,
                transform_corners(iso, &resolution.corners),
            ),
            None => (CornerFrame::Plate, resolution.corners.clone()),
        };
        info!(
            "{} marker(s) in {:?} frame, {} rejected",
            corners.len(),
            frame,
            resolution.rejected.len()
        );
        Self {
            unit: resolution.unit,
            scale_factor: resolution.scale_factor,
            frame,
            diagnostics: resolution.diagnostics.clone(),
            corners,
            rejected: resolution
                .rejected
                .iter()
                .map(|err| RejectedMarker {
                    id: Some(err.id()),
                    reason: err.to_string(),
                })
                .collect(),
        }
    }

    /// Fail if any marker spec was rejected.
    pub fn ensure_complete(&self) -> Result<(), DockTargetsError> {
        if self.rejected.is_empty() {
            Ok(())
        } else {
            Err(DockTargetsError::RejectedMarkers {
                count: self.rejected.len(),
            })
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, DockTargetsIoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DockTargetsIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DockTargetsIoError> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "unit": "mm",
        "markers": [
            { "id": 4, "position": [100.0, 50.0], "size": 20.0 },
            { "id": 1, "position": [10.0, 10.0], "size": 20.0 },
            { "id": 9, "position": [0.0, 0.0], "size": -1.0 }
        ],
        "dock_pose": { "position": [1.0, 2.0, 0.0], "orientation": [1.0, 0.0, 0.0, 0.0] }
    }"#;

    fn config() -> DockTargetsConfig {
        serde_json::from_str(CONFIG).expect("config json")
    }

    #[test]
    fn plate_report_keeps_local_frame() {
        let report = config().build_report(CornerFrame::Plate).expect("report");
        assert_eq!(report.frame, CornerFrame::Plate);
        assert_eq!(report.unit, DrawingUnit::Millimeters);
        let ids: Vec<u32> = report.corners.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].id, Some(9));
        assert!(report.ensure_complete().is_err());
        assert!(report.corners.iter().all(|c| c.top_left.x == 0.0));
    }

    #[test]
    fn world_report_applies_dock_pose() {
        let cfg = config();
        let plate = cfg.build_report(CornerFrame::Plate).expect("plate");
        let world = cfg.build_report(CornerFrame::World).expect("world");
        assert_eq!(world.frame, CornerFrame::World);
        for (p, w) in plate.corners.iter().zip(world.corners.iter()) {
            let d = w.top_left - p.top_left;
            assert!((d.x - 1.0).abs() < 1e-12);
            assert!((d.y - 2.0).abs() < 1e-12);
            assert!(d.z.abs() < 1e-12);
        }
    }

    #[test]
    fn world_report_without_pose_fails() {
        let mut cfg = config();
        cfg.dock_pose = None;
        assert!(matches!(
            cfg.build_report(CornerFrame::World),
            Err(DockTargetsError::MissingDockPose)
        ));
    }

    #[test]
    fn missing_unit_is_unspecified() {
        let cfg: DockTargetsConfig =
            serde_json::from_str(r#"{"markers": [{"id": 0, "position": [1, 2], "size": 3}]}"#)
                .expect("json");
        let report = cfg.build_report(CornerFrame::Plate).expect("report");
        assert_eq!(report.unit, DrawingUnit::Unspecified);
        assert_eq!(report.scale_factor, 1.0);
        assert_eq!(report.diagnostics, vec![ResolveDiagnostic::UnitUnspecified]);
    }

    #[test]
    fn null_or_numeric_unit_is_unspecified() {
        for unit in ["null", "25.4"] {
            let raw = format!(
                r#"{{"unit": {unit}, "markers": [{{"id": 0, "position": [1, 2], "size": 3}}]}}"#
            );
            let cfg: DockTargetsConfig = serde_json::from_str(&raw).expect("json");
            assert_eq!(cfg.unit, DrawingUnit::Unspecified, "unit {unit}");
            let report = cfg.build_report(CornerFrame::Plate).expect("report");
            assert_eq!(report.scale_factor, 1.0);
            assert_eq!(report.diagnostics, vec![ResolveDiagnostic::UnitUnspecified]);
            assert_eq!(report.corners.len(), 1);
        }
    }

    #[test]
    fn malformed_entry_is_rejected_alone() {
        let cfg: DockTargetsConfig = serde_json::from_str(
            r#"{"unit": "mm", "markers": [
                {"id": 2, "position": [10.0, 10.0], "size": 20.0},
                {"id": 5, "position": [1], "size": 20.0},
                {"position": [0.0, 0.0]},
                {"id": 0, "position": [0.0, 0.0], "size": -4.0}
            ]}"#,
        )
        .expect("json");
        assert_eq!(cfg.markers.len(), 2);
        assert_eq!(cfg.malformed.len(), 2);

        let report = cfg.build_report(CornerFrame::Plate).expect("report");
        let ids: Vec<u32> = report.corners.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2]);
        let rejected: Vec<Option<u32>> = report.rejected.iter().map(|r| r.id).collect();
        assert_eq!(rejected, vec![None, Some(0), Some(5)]);
        assert!(report.rejected[2].reason.contains("malformed marker entry 1"));
        assert!(matches!(
            report.ensure_complete(),
            Err(DockTargetsError::RejectedMarkers { count: 3 })
        ));
    }

    #[test]
    fn missing_marker_table_fails_the_load() {
        assert!(serde_json::from_str::<DockTargetsConfig>(r#"{"unit": "mm"}"#).is_err());
    }

    #[test]
    fn config_and_report_survive_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("markers.json");
        let report_path = dir.path().join("report.json");

        let cfg = config();
        cfg.write_json(&cfg_path).expect("write config");
        let loaded = DockTargetsConfig::load_json(&cfg_path).expect("load config");
        assert_eq!(loaded.markers, cfg.markers);
        assert_eq!(loaded.unit, DrawingUnit::Millimeters);

        let report = loaded.build_report(CornerFrame::Plate).expect("report");
        report.write_json(&report_path).expect("write report");
        let back = CornerReport::load_json(&report_path).expect("load report");
        assert_eq!(back.rejected, report.rejected);
        assert_eq!(back.corners.len(), report.corners.len());
        for (b, r) in back.corners.iter().zip(report.corners.iter()) {
            assert_eq!(b.id, r.id);
            assert!((b.bottom_right - r.bottom_right).norm() < 1e-12);
        }
    }
}
