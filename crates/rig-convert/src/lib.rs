//! Vendor calibration conversion.
//!
//! Reads a vendor calibration JSON and writes, per camera, a canonical
//! intrinsic XML and a camera-to-world extrinsic `.npy` under
//! `save_dir/intrinsics/` and `save_dir/extrinsics/`.
//!
//! ```no_run
//! use rig_convert::{convert, VendorFormat};
//! use std::path::Path;
//!
//! # fn main() -> rig_core::Result<()> {
//! let format: VendorFormat = "renderme360".parse()?;
//! let report = convert(Path::new("calibration.json"), Path::new("rig/"), format)?;
//! println!("converted {} cameras", report.cameras.len());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;
use rig_core::io::{utc_timestamp, write_intrinsic_xml, write_matrix4, RigLayout};
use rig_core::{CameraCalibration, Result, RigError};
use serde::{Deserialize, Serialize};

pub mod vendor;

pub use vendor::{Ava256Options, Ava256Parser, RenderMe360Parser, VendorParser};

/// Known vendor calibration schemas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorFormat {
    Ava256,
    #[serde(rename = "renderme360")]
    RenderMe360,
}

impl VendorFormat {
    pub const ALL: [VendorFormat; 2] = [VendorFormat::Ava256, VendorFormat::RenderMe360];

    pub fn as_str(self) -> &'static str {
        match self {
            VendorFormat::Ava256 => "ava256",
            VendorFormat::RenderMe360 => "renderme360",
        }
    }
}

impl fmt::Display for VendorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorFormat {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase();
        VendorFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == tag)
            .ok_or_else(|| RigError::UnsupportedFormat(s.to_string()))
    }
}

/// Summary of one conversion run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversionReport {
    pub format: VendorFormat,
    /// Converted camera identifiers, in output order.
    pub cameras: Vec<String>,
    pub intrinsics_dir: PathBuf,
    pub extrinsics_dir: PathBuf,
}

/// Converter with per-vendor options.
#[derive(Clone, Debug, Default)]
pub struct Converter {
    pub ava256: Ava256Options,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ava256_options(mut self, options: Ava256Options) -> Self {
        self.ava256 = options;
        self
    }

    fn parser(&self, format: VendorFormat) -> Box<dyn VendorParser> {
        match format {
            VendorFormat::Ava256 => Box::new(Ava256Parser::new(self.ava256)),
            VendorFormat::RenderMe360 => Box::new(RenderMe360Parser),
        }
    }

    /// Parse `calib_path` without writing anything.
    pub fn parse_file(&self, calib_path: &Path, format: VendorFormat) -> Result<Vec<CameraCalibration>> {
        let data = fs::read_to_string(calib_path).map_err(|e| RigError::io(calib_path, e))?;
        let parser = self.parser(format);
        let cameras = parser.parse(&data, calib_path)?;
        if cameras.is_empty() {
            return Err(RigError::invalid_input(format!(
                "{}: no cameras found for format {}",
                calib_path.display(),
                parser.name()
            )));
        }
        Ok(cameras)
    }

    /// Convert `calib_path` and write canonical files under `save_dir`.
    ///
    /// Existing files with the same names are overwritten.
    pub fn run(&self, calib_path: &Path, save_dir: &Path, format: VendorFormat) -> Result<ConversionReport> {
        let cameras = self.parse_file(calib_path, format)?;
        let layout = RigLayout::new(save_dir);
        layout.create_dirs()?;
        write_cameras(&layout, &cameras)?;
        info!(
            "converted {} {} cameras into {}",
            cameras.len(),
            format,
            save_dir.display()
        );
        Ok(ConversionReport {
            format,
            cameras: cameras.into_iter().map(|c| c.camera_id).collect(),
            intrinsics_dir: layout.intrinsics_dir(),
            extrinsics_dir: layout.extrinsics_dir(),
        })
    }
}

/// Write one intrinsic XML and one extrinsic `.npy` per camera.
pub fn write_cameras(layout: &RigLayout, cameras: &[CameraCalibration]) -> Result<()> {
    let date = utc_timestamp();
    for cam in cameras {
        let intr_path = layout.intrinsic_path(&cam.camera_id);
        write_intrinsic_xml(&intr_path, &cam.intrinsics, Some(&date))?;
        info!("Created XML file: {}", intr_path.display());
        write_matrix4(&layout.extrinsic_path(&cam.camera_id), cam.pose.matrix())?;
    }
    Ok(())
}

/// Convert with default options.
pub fn convert(calib_path: &Path, save_dir: &Path, format: VendorFormat) -> Result<ConversionReport> {
    Converter::new().run(calib_path, save_dir, format)
}
