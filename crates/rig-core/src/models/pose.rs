//! Frame-tagged camera poses and the working-frame transform.
//!
//! A [`Pose`] is a camera-to-world rigid transform whose world frame is part of
//! its type. Poses in the calibration frame are `Pose<Calibration>`; poses in
//! the reconstruction engine's internal frame are `Pose<Working>`. The only
//! conversions between the two go through [`WorkingFrame`], and both consume
//! their input, so a pose cannot be corrected twice.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{Result, RigError};
use crate::math::{apply_transform, is_rigid, rigid_inverse, rotation_block, translation_block};
use crate::{Mat3, Mat4, Pt3, Vec3, RIGID_TOLERANCE};

/// Marker trait for coordinate frames.
pub trait Frame: Copy + fmt::Debug + Default + Send + Sync + 'static {
    const NAME: &'static str;
}

/// The frame the vendor calibration is expressed in (metres).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Calibration;

/// The reconstruction engine's internal frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Working;

impl Frame for Calibration {
    const NAME: &'static str = "calibration";
}

impl Frame for Working {
    const NAME: &'static str = "working";
}

/// Rigid camera-to-world transform `T_gk` expressed in frame `F`.
#[derive(Clone, Copy, PartialEq)]
pub struct Pose<F: Frame> {
    matrix: Mat4,
    _frame: PhantomData<F>,
}

impl<F: Frame> fmt::Debug for Pose<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pose")
            .field("frame", &F::NAME)
            .field("matrix", &self.matrix)
            .finish()
    }
}

impl<F: Frame> Pose<F> {
    /// Wrap a 4×4 matrix, rejecting anything that is not a rigid transform.
    pub fn try_new(matrix: Mat4) -> Result<Self> {
        if !is_rigid(&matrix, RIGID_TOLERANCE) {
            return Err(RigError::non_rigid(format!("{} pose", F::NAME)));
        }
        Ok(Self::new_unchecked(matrix))
    }

    pub fn identity() -> Self {
        Self::new_unchecked(Mat4::identity())
    }

    fn new_unchecked(matrix: Mat4) -> Self {
        Self {
            matrix,
            _frame: PhantomData,
        }
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    pub fn into_matrix(self) -> Mat4 {
        self.matrix
    }

    /// Camera centre in world coordinates.
    pub fn position(&self) -> Vec3 {
        translation_block(&self.matrix)
    }

    pub fn rotation(&self) -> Mat3 {
        rotation_block(&self.matrix)
    }

    /// Map a point from camera coordinates into frame `F`.
    pub fn transform_point(&self, p_camera: &Pt3) -> Pt3 {
        apply_transform(&self.matrix, p_camera)
    }
}

/// Bookkeeping for the engine's working frame.
///
/// Holds `T_gk`, the transform taking calibration-frame coordinates into the
/// working frame, and its inverse `mesh_coord_changer`, which takes working
/// coordinates back to the calibration frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorkingFrame {
    to_working: Mat4,
    mesh_coord_changer: Mat4,
}

impl Default for WorkingFrame {
    fn default() -> Self {
        Self::identity()
    }
}

impl WorkingFrame {
    /// Working frame coincides with the calibration frame.
    pub fn identity() -> Self {
        Self {
            to_working: Mat4::identity(),
            mesh_coord_changer: Mat4::identity(),
        }
    }

    /// Build from `T_gk` (calibration → working).
    pub fn from_working_transform(t_gk: Mat4) -> Result<Self> {
        if !is_rigid(&t_gk, RIGID_TOLERANCE) {
            return Err(RigError::non_rigid("working-frame transform"));
        }
        Ok(Self {
            to_working: t_gk,
            mesh_coord_changer: rigid_inverse(&t_gk),
        })
    }

    /// Build from a persisted `mesh_coord_changer` (working → calibration).
    pub fn from_mesh_coord_changer(mesh_coord_changer: Mat4) -> Result<Self> {
        if !is_rigid(&mesh_coord_changer, RIGID_TOLERANCE) {
            return Err(RigError::non_rigid("mesh_coord_changer"));
        }
        Ok(Self {
            to_working: rigid_inverse(&mesh_coord_changer),
            mesh_coord_changer,
        })
    }

    /// `T_gk`, calibration → working.
    pub fn to_working(&self) -> &Mat4 {
        &self.to_working
    }

    /// `inverse(T_gk)`, working → calibration.
    pub fn mesh_coord_changer(&self) -> &Mat4 {
        &self.mesh_coord_changer
    }

    /// Re-express a calibrated pose in the working frame: `T_gk · pose`.
    pub fn inject(&self, pose: Pose<Calibration>) -> Pose<Working> {
        Pose::new_unchecked(self.to_working * pose.matrix)
    }

    /// Bring a working-frame pose back: `mesh_coord_changer · pose`.
    pub fn eject(&self, pose: Pose<Working>) -> Pose<Calibration> {
        Pose::new_unchecked(self.mesh_coord_changer * pose.matrix)
    }

    /// Bring a working-frame point (e.g. a mesh vertex) back to the calibration frame.
    pub fn eject_point(&self, p_working: &Pt3) -> Pt3 {
        apply_transform(&self.mesh_coord_changer, p_working)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::make_transform;
    use approx::assert_relative_eq;
    use nalgebra::{Rotation3, Vector3};

    fn rigid(roll: f64, pitch: f64, yaw: f64, t: [f64; 3]) -> Mat4 {
        let r = Rotation3::from_euler_angles(roll, pitch, yaw);
        make_transform(r.matrix(), &Vector3::new(t[0], t[1], t[2]))
    }

    #[test]
    fn inject_then_eject_is_identity() {
        let frame =
            WorkingFrame::from_working_transform(rigid(0.4, 0.2, -1.3, [3.0, -2.0, 0.5])).unwrap();
        let pose = Pose::<Calibration>::try_new(rigid(-0.7, 1.0, 0.1, [0.2, 1.6, -0.9])).unwrap();
        let back = frame.eject(frame.inject(pose));
        assert_relative_eq!(*back.matrix(), *pose.matrix(), epsilon = 1e-12);
    }

    #[test]
    fn mesh_coord_changer_inverts_working_transform() {
        let t_gk = rigid(0.1, -0.5, 2.0, [10.0, 0.0, -4.0]);
        let frame = WorkingFrame::from_working_transform(t_gk).unwrap();
        assert_relative_eq!(
            frame.mesh_coord_changer() * frame.to_working(),
            Mat4::identity(),
            epsilon = 1e-12
        );
        let reloaded = WorkingFrame::from_mesh_coord_changer(*frame.mesh_coord_changer()).unwrap();
        assert_relative_eq!(*reloaded.to_working(), t_gk, epsilon = 1e-12);
    }

    #[test]
    fn identity_frame_leaves_points_untouched() {
        let frame = WorkingFrame::identity();
        let p = Pt3::new(1.0, -2.0, 3.0);
        assert_eq!(frame.eject_point(&p), p);
        assert_eq!(*frame.mesh_coord_changer(), Mat4::identity());
    }

    #[test]
    fn non_rigid_matrices_are_rejected() {
        let mut m = Mat4::identity();
        m[(0, 0)] = 2.0;
        assert!(matches!(
            Pose::<Calibration>::try_new(m),
            Err(RigError::NonRigidPose { .. })
        ));
        assert!(WorkingFrame::from_working_transform(m).is_err());
        assert!(WorkingFrame::from_mesh_coord_changer(m).is_err());
    }

    #[test]
    fn pose_accessors_split_blocks() {
        let m = rigid(0.0, 0.0, 0.0, [1.0, 2.0, 3.0]);
        let pose = Pose::<Working>::try_new(m).unwrap();
        assert_eq!(pose.position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.rotation(), Mat3::identity());
        let p = pose.transform_point(&Pt3::origin());
        assert_eq!(p, Pt3::new(1.0, 2.0, 3.0));
    }
}
