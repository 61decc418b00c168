//! Error taxonomy shared by every crate in the workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the workspace.
pub type Result<T, E = RigError> = std::result::Result<T, E>;

/// Errors produced while converting, reconstructing or viewing a rig.
///
/// Every variant is fatal for the operation that raised it; nothing in the
/// pipeline retries.
#[derive(Debug, Error)]
pub enum RigError {
    /// Caller-supplied input is unusable (bad extension, missing file,
    /// out-of-range level, malformed vendor record, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Pre-calibration was requested but a camera has no matching file.
    #[error("missing pre-calibration for camera `{camera_id}`: {} not found", path.display())]
    MissingCalibration { camera_id: String, path: PathBuf },

    /// The vendor calibration schema tag is not one of the known formats.
    #[error("unsupported calibration format `{0}` (expected one of: ava256, renderme360)")]
    UnsupportedFormat(String),

    /// A matrix that must be a rigid transform is not.
    #[error("{context}: matrix is not a rigid transform")]
    NonRigidPose { context: String },

    /// The external engine reported a failure.
    #[error("engine failed during {stage}: {message}")]
    Engine { stage: String, message: String },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("xml error in {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: serde_xml_rs::Error,
    },

    #[error("npy error in {}: {message}", path.display())]
    Npy { path: PathBuf, message: String },

    #[error("mesh error in {}: {message}", path.display())]
    Mesh { path: PathBuf, message: String },

    #[error("image error in {}: {message}", path.display())]
    Image { path: PathBuf, message: String },

    /// The scene could not be handed to a viewer backend.
    #[error("viewer error: {0}")]
    Viewer(String),
}

impl RigError {
    /// Wrap an [`std::io::Error`] with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RigError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        RigError::InvalidInput(msg.into())
    }

    pub fn non_rigid(context: impl Into<String>) -> Self {
        RigError::NonRigidPose {
            context: context.into(),
        }
    }

    pub fn engine(stage: impl Into<String>, message: impl std::fmt::Display) -> Self {
        RigError::Engine {
            stage: stage.into(),
            message: message.to_string(),
        }
    }
}
