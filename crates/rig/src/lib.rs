//! Toolkit for calibrated multi-camera photogrammetry rigs.
//!
//! - Convert vendor calibration files into per-camera intrinsic XML and
//!   extrinsic `.npy` files ([`convert`]).
//! - Drive an external photogrammetry engine over a set of photos, optionally
//!   seeded with the converted calibration ([`recon`]).
//! - Load the reconstructed mesh and camera rig for viewing ([`view`]).
//!
//! # Quick Start
//!
//! ```no_run
//! use rig::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> rig::core::Result<()> {
//! convert_calibration(Path::new("KRT.json"), Path::new("rig"), VendorFormat::Ava256)?;
//!
//! let scene = Visualizer::new(ViewerOptions::default()).load(Path::new("results"))?;
//! println!("{} cameras", scene.cameras.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Coordinate frames
//!
//! Every pose carries its frame in the type: [`Pose<Calibration>`](core::Pose)
//! for rig coordinates and `Pose<Working>` for the engine's working frame.
//! [`WorkingFrame`](core::WorkingFrame) is the only way to move between them.

// ═══════════════════════════════════════════════════════════════════════════════
// Foundation
// ═══════════════════════════════════════════════════════════════════════════════

/// Math aliases, camera models, file codecs and errors.
pub use rig_core as core;

// ═══════════════════════════════════════════════════════════════════════════════
// Workflows
// ═══════════════════════════════════════════════════════════════════════════════

/// Vendor calibration conversion.
pub use rig_convert as convert;

/// Reconstruction driver and engine interface.
pub use rig_recon as recon;

/// Scene assembly and viewer backends.
pub use rig_view as view;

/// Common imports.
///
/// ```no_run
/// use rig::prelude::*;
/// ```
pub mod prelude {
    pub use rig_core::io::RigLayout;
    pub use rig_core::{
        CameraCalibration, Calibration, FrameIntrinsics, Mat4, Pose, Result, RigError, Vec3,
        Working, WorkingFrame,
    };

    pub use rig_convert::{convert as convert_calibration, ConversionReport, Converter, VendorFormat};

    pub use rig_recon::{
        PhotogrammetryEngine, ReconstructionConfig, ReconstructionReport, Reconstructor,
        ResolutionLevel,
    };

    pub use rig_view::{ObjSceneWriter, Scene, SceneSink, ViewerOptions, Visualizer};
}
