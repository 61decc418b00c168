//! Capability interface of the external photogrammetry engine.
//!
//! The engine owns photos, sensors, camera poses and the reconstruction
//! volume. The driver only sequences calls; everything numerically heavy
//! (matching, alignment, dense reconstruction, texturing) happens behind this
//! trait.

use std::path::{Path, PathBuf};

use rig_core::{FrameIntrinsics, Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine-assigned camera handle.
pub type CameraId = usize;
/// Engine-assigned sensor handle.
pub type SensorId = usize;

/// Failure reported by the engine.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Reconstruction volume: an oriented box in the engine's working frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Vec3,
    /// Box axes as columns.
    pub rotation: Mat3,
    /// Edge lengths along the box axes.
    pub size: Vec3,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            rotation: Mat3::identity(),
            size: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// How image pairs are preselected from reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreselectionMode {
    /// Use the source reference coordinates.
    #[default]
    Source,
    /// Images are ordered by capture sequence.
    Sequential,
}

/// Depth-map outlier filtering strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    None,
    #[default]
    Mild,
    Moderate,
    Aggressive,
}

/// Parameters for feature matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Image downscale, 0 meaning upscaled "highest".
    pub downscale: u32,
    pub keypoint_limit: u32,
    pub tiepoint_limit: u32,
    pub generic_preselection: bool,
    pub reference_preselection: bool,
    pub reference_preselection_mode: PreselectionMode,
    pub filter_mask: bool,
}

/// Parameters for depth-map generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthMapOptions {
    pub downscale: u32,
    pub filter_mode: FilterMode,
}

/// A frame sensor to register with the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSpec {
    pub label: String,
    pub width: u32,
    pub height: u32,
    /// Initial calibration, if known.
    pub user_calibration: Option<FrameIntrinsics>,
    /// Keep the calibration fixed during alignment and optimization.
    pub fixed: bool,
}

/// A camera as seen by the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineCamera {
    pub id: CameraId,
    pub label: String,
    pub photo: PathBuf,
}

/// A sensor together with its current calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSensor {
    pub id: SensorId,
    pub label: String,
    pub calibration: FrameIntrinsics,
}

/// Operations the reconstruction driver needs from a photogrammetry engine.
///
/// Camera transforms are camera-to-working-frame 4x4 matrices.
pub trait PhotogrammetryEngine {
    fn add_photos(&mut self, photos: &[PathBuf]) -> EngineResult<()>;
    fn cameras(&self) -> Vec<EngineCamera>;

    fn add_sensor(&mut self, spec: SensorSpec) -> EngineResult<SensorId>;
    fn set_camera_sensor(&mut self, camera: CameraId, sensor: SensorId) -> EngineResult<()>;
    fn sensors(&self) -> Vec<EngineSensor>;

    fn match_photos(&mut self, options: &MatchOptions) -> EngineResult<()>;
    fn align_cameras(&mut self) -> EngineResult<()>;
    fn optimize_cameras(&mut self, adaptive_fitting: bool) -> EngineResult<()>;

    fn region(&self) -> Region;
    fn set_region(&mut self, region: Region) -> EngineResult<()>;
    /// `None` when the camera could not be aligned.
    fn camera_transform(&self, camera: CameraId) -> Option<Mat4>;
    fn set_camera_transform(&mut self, camera: CameraId, transform: Mat4) -> EngineResult<()>;
    /// Recompute internal bookkeeping after poses or region changed.
    fn update_transform(&mut self) -> EngineResult<()>;

    fn build_depth_maps(&mut self, options: &DepthMapOptions) -> EngineResult<()>;
    fn build_model(&mut self) -> EngineResult<()>;
    fn build_uv(&mut self, texture_size: u32) -> EngineResult<()>;
    fn build_texture(&mut self, texture_size: u32) -> EngineResult<()>;

    /// Write the textured model as OBJ.
    fn export_model(&mut self, path: &Path) -> EngineResult<()>;
}
