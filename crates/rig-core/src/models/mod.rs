//! Camera model building blocks.
//!
//! - [`FrameIntrinsics`]: single-focal pinhole model with a centre-relative
//!   principal point and Brown-Conrady distortion.
//! - [`Pose`]: rigid camera-to-world transform tagged with its world frame.
//! - [`WorkingFrame`]: the transform pair that moves poses between the
//!   calibration frame and the reconstruction engine's working frame.
//! - [`CameraCalibration`]: one camera's intrinsics and pose, keyed by id.

mod intrinsics;
mod pose;

pub use intrinsics::*;
pub use pose::*;

/// Intrinsics and calibration-frame pose of one camera.
#[derive(Clone, Debug)]
pub struct CameraCalibration {
    /// Stable identifier used to name output files.
    pub camera_id: String,
    pub intrinsics: FrameIntrinsics,
    pub pose: Pose<Calibration>,
}
