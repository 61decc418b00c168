//! Reconstruction driver for calibrated multi-camera rigs.
//!
//! The heavy lifting is done by an external engine behind
//! [`PhotogrammetryEngine`]. This crate sequences the engine, injects
//! pre-calibrated camera poses into the engine's working frame and writes the
//! results back in the calibration frame.
//!
//! ```no_run
//! use rig_recon::{PhotogrammetryEngine, ReconstructionConfig, Reconstructor};
//! use std::path::Path;
//!
//! # fn engine() -> Box<dyn PhotogrammetryEngine> { unimplemented!() }
//! # fn main() -> rig_core::Result<()> {
//! let mut engine = engine();
//! let recon = Reconstructor::new(ReconstructionConfig::with_levels(1, 2)?)?;
//! let images = ["/data/cam01.jpg", "/data/cam02.jpg"];
//! let report = recon.run(engine.as_mut(), &images, Path::new("out"), Some(Path::new("rig")))?;
//! println!("{} cameras written", report.extrinsics.len());
//! # Ok(())
//! # }
//! ```

pub mod bridge;
mod config;
pub mod engine;
mod inputs;
mod level;
mod reconstructor;
pub mod run_log;

pub use config::ReconstructionConfig;
pub use engine::{
    CameraId, DepthMapOptions, EngineCamera, EngineError, EngineResult, EngineSensor,
    FilterMode, MatchOptions, PhotogrammetryEngine, PreselectionMode, Region, SensorId,
    SensorSpec,
};
pub use inputs::{image_size, image_stem, inspect_inputs};
pub use level::ResolutionLevel;
pub use reconstructor::{ReconstructionReport, Reconstructor, UNKNOWN_SENSOR_LABEL};
pub use run_log::{LogEntry, RunLog};
