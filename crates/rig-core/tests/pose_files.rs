//! Persisted poses survive the float32 `.npy` round trip as rigid transforms.

use approx::assert_relative_eq;
use nalgebra::{Rotation3, Vector3};
use rig_core::io::{read_matrix4, write_matrix4, RigLayout};
use rig_core::{make_transform, Calibration, Pose, WorkingFrame};
use tempfile::tempdir;

#[test]
fn stored_pose_is_still_rigid_after_reload() {
    let dir = tempdir().unwrap();
    let layout = RigLayout::new(dir.path());
    layout.create_dirs().unwrap();

    let rot = Rotation3::from_euler_angles(1.2, -0.4, 2.9);
    let m = make_transform(rot.matrix(), &Vector3::new(0.731, -1.204, 2.5));
    let path = layout.extrinsic_path("cam07");
    write_matrix4(&path, &m).unwrap();

    let loaded = read_matrix4(&path).unwrap();
    assert_relative_eq!(loaded, m, epsilon = 1e-6);
    let pose = Pose::<Calibration>::try_new(loaded).expect("float32 pose stays rigid");
    assert_relative_eq!(pose.position(), Vector3::new(0.731, -1.204, 2.5), epsilon = 1e-6);
}

#[test]
fn identity_working_frame_is_written_exactly() {
    let dir = tempdir().unwrap();
    let layout = RigLayout::new(dir.path());
    let frame = WorkingFrame::identity();
    write_matrix4(&layout.mesh_coord_changer_path(), frame.mesh_coord_changer()).unwrap();
    let back = read_matrix4(&layout.mesh_coord_changer_path()).unwrap();
    assert_eq!(back, nalgebra::Matrix4::identity());
}
