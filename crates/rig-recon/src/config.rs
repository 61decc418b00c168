use std::path::Path;

use rig_core::io::load_json_file;
use rig_core::{Result, RigError, Vec3};
use serde::{Deserialize, Serialize};

use crate::engine::{DepthMapOptions, FilterMode, MatchOptions, PreselectionMode};
use crate::level::ResolutionLevel;

/// Configuration for one reconstruction run.
///
/// Levels are validated on deserialization, so a config file with
/// `"matching_level": 5` fails to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Sparse stage
    // ─────────────────────────────────────────────────────────────────────────
    /// Quality of feature matching and alignment.
    pub matching_level: ResolutionLevel,

    /// Upper bound on detected keypoints per image.
    pub keypoint_limit: u32,

    /// Upper bound on tie points kept per image.
    pub tiepoint_limit: u32,

    pub preselection_mode: PreselectionMode,

    /// Freeze pre-calibrated intrinsics during alignment.
    pub fix_intrinsics: bool,

    /// Refine with adaptive camera model fitting after alignment.
    pub adaptive_fitting: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Dense stage
    // ─────────────────────────────────────────────────────────────────────────
    /// Quality of depth maps and meshing.
    pub dense_level: ResolutionLevel,

    pub filter_mode: FilterMode,

    /// Texture atlas edge length in pixels.
    pub texture_size: u32,

    /// Region edge lengths (width x, height y, depth z) used after injection.
    pub bbox_dim: Vec3,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            matching_level: ResolutionLevel::HIGHEST,
            keypoint_limit: 40_000,
            tiepoint_limit: 10_000,
            preselection_mode: PreselectionMode::Source,
            fix_intrinsics: true,
            adaptive_fitting: true,
            dense_level: ResolutionLevel::HIGHEST,
            filter_mode: FilterMode::Mild,
            texture_size: 8192,
            bbox_dim: Vec3::new(1.5, 2.0, 1.5),
        }
    }
}

impl ReconstructionConfig {
    /// Default configuration at the given raw levels.
    pub fn with_levels(matching_level: u8, dense_level: u8) -> Result<Self> {
        Ok(Self {
            matching_level: ResolutionLevel::try_from(matching_level)?,
            dense_level: ResolutionLevel::try_from(dense_level)?,
            ..Self::default()
        })
    }

    /// Load and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let config: Self = load_json_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.texture_size == 0 {
            return Err(RigError::invalid_input("texture_size must be positive"));
        }
        if self.keypoint_limit == 0 || self.tiepoint_limit == 0 {
            return Err(RigError::invalid_input(
                "keypoint_limit and tiepoint_limit must be positive",
            ));
        }
        if !self.bbox_dim.iter().all(|d| d.is_finite() && *d > 0.0) {
            return Err(RigError::invalid_input(format!(
                "bbox_dim must be positive, got [{}, {}, {}]",
                self.bbox_dim.x, self.bbox_dim.y, self.bbox_dim.z
            )));
        }
        Ok(())
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            downscale: self.matching_level.matching_downscale(),
            keypoint_limit: self.keypoint_limit,
            tiepoint_limit: self.tiepoint_limit,
            generic_preselection: true,
            reference_preselection: true,
            reference_preselection_mode: self.preselection_mode,
            filter_mask: false,
        }
    }

    pub fn depth_map_options(&self) -> DepthMapOptions {
        DepthMapOptions {
            downscale: self.dense_level.dense_downscale(),
            filter_mode: self.filter_mode,
        }
    }
}
