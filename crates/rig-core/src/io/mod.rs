//! Canonical file formats and directory layout.

pub mod intrinsic_xml;
pub mod layout;
pub mod npy;

pub use intrinsic_xml::{read_intrinsic_xml, utc_timestamp, write_intrinsic_xml, IntrinsicRecord};
pub use layout::RigLayout;
pub use npy::{read_matrix4, write_matrix4};

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Result, RigError};

/// Read and deserialize a JSON file.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path).map_err(|e| RigError::io(path, e))?;
    serde_json::from_str(&data).map_err(|source| RigError::Json {
        path: path.to_path_buf(),
        source,
    })
}
