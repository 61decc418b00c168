//! Core types for the multi-camera photogrammetry rig toolkit.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Mat4`, `Pt3`, ...) and rigid
//!   transform helpers,
//! - the single-focal pinhole intrinsic model used by the reconstruction
//!   engine (principal point stored as an offset from the image centre),
//! - frame-tagged camera poses and the working-frame transform,
//! - canonical file codecs (intrinsic XML, `.npy` matrices) and the output
//!   directory layout,
//! - the shared [`RigError`] taxonomy.

/// Error type shared by every crate in the workspace.
pub mod error;
/// Canonical file formats and directory layout.
pub mod io;
/// Linear algebra type aliases and rigid transform helpers.
pub mod math;
/// Camera intrinsics, poses and frames.
pub mod models;

pub use error::{Result, RigError};
pub use math::*;
pub use models::*;
