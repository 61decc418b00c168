//! On-disk directory layout shared by the converter, the reconstructor and
//! the viewer.
//!
//! ```text
//! <root>/intrinsics/<camera_id>_intrinsic.xml
//! <root>/extrinsics/<camera_id>_extrinsic.npy
//! <root>/mesh.obj
//! <root>/mesh_coord_changer.npy
//! <root>/reconstruction_log.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RigError};

pub const INTRINSICS_DIR: &str = "intrinsics";
pub const EXTRINSICS_DIR: &str = "extrinsics";
pub const INTRINSIC_SUFFIX: &str = "_intrinsic.xml";
pub const EXTRINSIC_SUFFIX: &str = "_extrinsic.npy";
pub const MESH_FILE: &str = "mesh.obj";
pub const MESH_COORD_CHANGER_FILE: &str = "mesh_coord_changer.npy";
pub const RUN_LOG_FILE: &str = "reconstruction_log.json";

/// Paths under a calibration or results root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RigLayout {
    root: PathBuf,
}

impl RigLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn intrinsics_dir(&self) -> PathBuf {
        self.root.join(INTRINSICS_DIR)
    }

    pub fn extrinsics_dir(&self) -> PathBuf {
        self.root.join(EXTRINSICS_DIR)
    }

    pub fn intrinsic_path(&self, camera_id: &str) -> PathBuf {
        self.intrinsics_dir()
            .join(format!("{camera_id}{INTRINSIC_SUFFIX}"))
    }

    pub fn extrinsic_path(&self, camera_id: &str) -> PathBuf {
        self.extrinsics_dir()
            .join(format!("{camera_id}{EXTRINSIC_SUFFIX}"))
    }

    pub fn mesh_path(&self) -> PathBuf {
        self.root.join(MESH_FILE)
    }

    pub fn mesh_coord_changer_path(&self) -> PathBuf {
        self.root.join(MESH_COORD_CHANGER_FILE)
    }

    pub fn run_log_path(&self) -> PathBuf {
        self.root.join(RUN_LOG_FILE)
    }

    /// Create the root plus `intrinsics/` and `extrinsics/`.
    pub fn create_dirs(&self) -> Result<()> {
        if !self.root.exists() {
            log::info!("{} is created.", self.root.display());
        }
        for dir in [self.intrinsics_dir(), self.extrinsics_dir()] {
            fs::create_dir_all(&dir).map_err(|e| RigError::io(&dir, e))?;
        }
        Ok(())
    }

    /// Extrinsic files in `extrinsics/`, sorted by file name.
    pub fn list_extrinsics(&self) -> Result<Vec<PathBuf>> {
        let dir = self.extrinsics_dir();
        let entries = fs::read_dir(&dir).map_err(|e| RigError::io(&dir, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RigError::io(&dir, e))?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "npy") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn paths_follow_naming_convention() {
        let layout = RigLayout::new("/data/run");
        assert_eq!(
            layout.intrinsic_path("cam400012"),
            PathBuf::from("/data/run/intrinsics/cam400012_intrinsic.xml")
        );
        assert_eq!(
            layout.extrinsic_path("25"),
            PathBuf::from("/data/run/extrinsics/25_extrinsic.npy")
        );
        assert_eq!(layout.mesh_path(), PathBuf::from("/data/run/mesh.obj"));
        assert_eq!(
            layout.mesh_coord_changer_path(),
            PathBuf::from("/data/run/mesh_coord_changer.npy")
        );
    }

    #[test]
    fn list_extrinsics_is_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        let layout = RigLayout::new(dir.path().join("out"));
        layout.create_dirs().unwrap();
        for name in ["b_extrinsic.npy", "a_extrinsic.npy", "notes.txt"] {
            fs::write(layout.extrinsics_dir().join(name), b"x").unwrap();
        }
        let listed = layout.list_extrinsics().unwrap();
        let names: Vec<_> = listed
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a_extrinsic.npy", "b_extrinsic.npy"]);
        assert!(layout.intrinsics_dir().is_dir());
    }
}
