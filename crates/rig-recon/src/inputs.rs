//! Input photo inspection.

use std::path::{Path, PathBuf};

use log::info;
use rig_core::{Result, RigError};

const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
        .unwrap_or(false)
}

/// Validate and sort the photo list.
///
/// Every path must have a `.jpg` or `.png` extension (any case) and exist.
pub fn inspect_inputs<P: AsRef<Path>>(images: &[P]) -> Result<Vec<PathBuf>> {
    if images.is_empty() {
        return Err(RigError::invalid_input("no input images given"));
    }
    let mut paths = Vec::with_capacity(images.len());
    for image in images {
        let path = image.as_ref();
        if !has_image_extension(path) {
            return Err(RigError::invalid_input(format!(
                "{} is not an image file",
                path.display()
            )));
        }
        if !path.exists() {
            return Err(RigError::invalid_input(format!(
                "{} does not exist",
                path.display()
            )));
        }
        paths.push(path.to_path_buf());
    }
    info!("The number of images : {}", paths.len());
    paths.sort();
    Ok(paths)
}

/// Image stem, used as camera and sensor label.
pub fn image_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
        .ok_or_else(|| RigError::invalid_input(format!("{} has no file name", path.display())))
}

/// Pixel dimensions read from the image header.
pub fn image_size(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).map_err(|e| RigError::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn paths_are_sorted_and_extensions_case_insensitive() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.PNG");
        let a = dir.path().join("a.jpg");
        std::fs::write(&a, b"").unwrap();
        std::fs::write(&b, b"").unwrap();
        let sorted = inspect_inputs(&[&b, &a]).unwrap();
        assert_eq!(sorted, vec![a, b]);
    }

    #[test]
    fn wrong_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let tif = dir.path().join("a.tif");
        std::fs::write(&tif, b"").unwrap();
        assert!(matches!(inspect_inputs(&[&tif]), Err(RigError::InvalidInput(_))));
    }

    #[test]
    fn missing_and_empty_inputs_are_rejected() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.jpg");
        assert!(matches!(inspect_inputs(&[&missing]), Err(RigError::InvalidInput(_))));
        let none: [&Path; 0] = [];
        assert!(matches!(inspect_inputs(&none), Err(RigError::InvalidInput(_))));
    }

    #[test]
    fn stem_drops_directory_and_extension() {
        assert_eq!(image_stem(Path::new("/data/cam400012.jpg")).unwrap(), "cam400012");
    }

    #[test]
    fn size_comes_from_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("img.png");
        image::RgbImage::new(12, 7).save(&path).unwrap();
        assert_eq!(image_size(&path).unwrap(), (12, 7));
    }
}
