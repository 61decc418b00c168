//! Homogeneous 4×4 rigid transforms.
//!
//! Poses are kept as plain [`Mat4`] with the rotation in the top-left 3×3 block
//! and the translation in the top-right column, matching the on-disk layout.

use crate::{Mat3, Mat4, Pt3, Real, Vec3};

/// Tolerance used when validating rigid transforms.
///
/// Extrinsics are stored as `f32`, so orthonormality only holds to roughly
/// single precision after a save/load cycle.
pub const RIGID_TOLERANCE: Real = 1e-4;

/// Assemble `[R | t; 0 0 0 1]`.
pub fn make_transform(rotation: &Mat3, translation: &Vec3) -> Mat4 {
    let mut m = Mat4::identity();
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation);
    m.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
    m
}

/// Top-left 3×3 block.
pub fn rotation_block(m: &Mat4) -> Mat3 {
    m.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Top-right 3×1 block.
pub fn translation_block(m: &Mat4) -> Vec3 {
    m.fixed_view::<3, 1>(0, 3).into_owned()
}

/// Check that `m` is a proper rigid transform within `tol`.
///
/// Requires `RᵀR ≈ I`, `det(R) ≈ +1` and a bottom row of `[0 0 0 1]`.
pub fn is_rigid(m: &Mat4, tol: Real) -> bool {
    if !m.iter().all(|v| v.is_finite()) {
        return false;
    }
    let r = rotation_block(m);
    let ortho_err = (r.transpose() * r - Mat3::identity()).abs().max();
    let det_err = (r.determinant() - 1.0).abs();
    let bottom = m.fixed_view::<1, 4>(3, 0);
    let bottom_err = (bottom[(0, 0)].abs())
        .max(bottom[(0, 1)].abs())
        .max(bottom[(0, 2)].abs())
        .max((bottom[(0, 3)] - 1.0).abs());
    ortho_err <= tol && det_err <= tol && bottom_err <= tol
}

/// Closed-form inverse of a rigid transform: `[Rᵀ | −Rᵀt]`.
///
/// The caller is responsible for `m` being rigid; see [`is_rigid`].
pub fn rigid_inverse(m: &Mat4) -> Mat4 {
    let r_t = rotation_block(m).transpose();
    let t = translation_block(m);
    make_transform(&r_t, &(-(r_t * t)))
}

/// Apply `m` to a 3D point (rotation then translation).
pub fn apply_transform(m: &Mat4, p: &Pt3) -> Pt3 {
    Pt3::from(rotation_block(m) * p.coords + translation_block(m))
}
