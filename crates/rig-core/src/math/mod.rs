//! Mathematical utilities and type definitions.
//!
//! This module provides the scalar and matrix aliases used throughout the
//! workspace together with helpers for 4×4 rigid transforms.

use nalgebra::{Isometry3, Matrix3, Matrix4, Point3, Vector3};

pub mod rigid;

pub use rigid::{
    apply_transform, is_rigid, make_transform, rigid_inverse, rotation_block,
    translation_block, RIGID_TOLERANCE,
};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 4×4 matrix with [`Real`] entries.
pub type Mat4 = Matrix4<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;

/// Build a 4×4 matrix from a row-major slice of 16 values.
///
/// Returns `None` if the slice does not hold exactly 16 entries.
pub fn mat4_from_row_slice(values: &[Real]) -> Option<Mat4> {
    (values.len() == 16).then(|| Mat4::from_row_slice(values))
}

/// Build a 3×3 matrix from a row-major slice of 9 values.
pub fn mat3_from_row_slice(values: &[Real]) -> Option<Mat3> {
    (values.len() == 9).then(|| Mat3::from_row_slice(values))
}
