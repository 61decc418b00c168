//! 4×4 matrices stored as NumPy `.npy` files.
//!
//! Matrices are written as C-ordered `float32` arrays of shape `(4, 4)`.
//! Reading accepts `float32` or `float64` data of any shape holding 16
//! elements, interpreted in row-major order.

use std::path::Path;

use ndarray::{Array2, ArrayD};
use ndarray_npy::{read_npy, write_npy};

use crate::error::{Result, RigError};
use crate::{Mat4, Real};

fn npy_error(path: &Path, err: impl std::fmt::Display) -> RigError {
    RigError::Npy {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Write `m` as a `(4, 4)` float32 array, overwriting any existing file.
pub fn write_matrix4(path: &Path, m: &Mat4) -> Result<()> {
    let arr = Array2::<f32>::from_shape_fn((4, 4), |(r, c)| m[(r, c)] as f32);
    write_npy(path, &arr).map_err(|e| npy_error(path, e))?;
    log::debug!("wrote matrix {}", path.display());
    Ok(())
}

/// Read a 4×4 matrix written by [`write_matrix4`] or by NumPy.
pub fn read_matrix4(path: &Path) -> Result<Mat4> {
    if !path.is_file() {
        return Err(RigError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "matrix file not found"),
        ));
    }

    let values: Vec<Real> = match read_npy::<_, ArrayD<f32>>(path) {
        Ok(arr) => arr.iter().map(|v| Real::from(*v)).collect(),
        Err(f32_err) => match read_npy::<_, ArrayD<f64>>(path) {
            Ok(arr) => arr.iter().copied().collect(),
            Err(_) => return Err(npy_error(path, f32_err)),
        },
    };

    if values.len() != 16 {
        return Err(npy_error(
            path,
            format!("expected 16 elements for a 4x4 matrix, found {}", values.len()),
        ));
    }
    Ok(Mat4::from_row_slice(&values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_keeps_row_major_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.npy");
        let m = Mat4::from_row_slice(&[
            1.0, 2.0, 3.0, 4.0, //
            5.0, 6.0, 7.0, 8.0, //
            9.0, 10.0, 11.0, 12.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        write_matrix4(&path, &m).unwrap();
        let back = read_matrix4(&path).unwrap();
        assert_eq!(back, m);
        assert_eq!(back[(0, 3)], 4.0);
    }

    #[test]
    fn float64_and_flat_arrays_are_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("eye64.npy");
        let flat = ndarray::Array1::<f64>::from_shape_fn(16, |i| if i % 5 == 0 { 1.0 } else { 0.25 * i as f64 });
        write_npy(&path, &flat).unwrap();
        let m = read_matrix4(&path).unwrap();
        assert_relative_eq!(m[(0, 0)], 1.0);
        assert_relative_eq!(m[(0, 1)], 0.25);
        assert_relative_eq!(m[(3, 2)], 3.5);
    }

    #[test]
    fn wrong_element_count_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m33.npy");
        write_npy(&path, &Array2::<f32>::eye(3)).unwrap();
        assert!(matches!(read_matrix4(&path), Err(RigError::Npy { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_matrix4(&dir.path().join("absent.npy")).unwrap_err();
        assert!(matches!(err, RigError::Io { .. }), "{err}");
    }
}
