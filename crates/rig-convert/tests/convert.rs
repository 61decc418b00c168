//! End-to-end conversion into the canonical directory layout.

use std::fs;

use approx::assert_relative_eq;
use rig_convert::{convert, Converter, VendorFormat};
use rig_core::io::{read_intrinsic_xml, read_matrix4, RigLayout};
use rig_core::{Calibration, Pose, RigError};
use tempfile::tempdir;

const RENDERME360: &str = r#"{
    "00": {
        "K": [[1000, 0, 50], [0, 1000, 50], [0, 0, 1]],
        "dist": [0, 0, 0, 0, 0],
        "T_gk": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]],
        "img_w": 100,
        "img_h": 100
    },
    "01": {
        "K": [[800, 0, 60], [0, 800, 40], [0, 0, 1]],
        "dist": [0.1, 0.01, 0.001, 0.002, 0.0001],
        "T_gk": [[0, -1, 0, 1.5], [1, 0, 0, -0.5], [0, 0, 1, 0.75], [0, 0, 0, 1]],
        "img_w": 100,
        "img_h": 80
    }
}"#;

#[test]
fn renderme360_writes_one_pair_of_files_per_camera() {
    let dir = tempdir().unwrap();
    let calib = dir.path().join("calibration.json");
    fs::write(&calib, RENDERME360).unwrap();
    let out = dir.path().join("rig");

    let report = convert(&calib, &out, VendorFormat::RenderMe360).unwrap();
    assert_eq!(report.cameras, vec!["00", "01"]);

    let layout = RigLayout::new(&out);
    let cam0 = read_intrinsic_xml(&layout.intrinsic_path("00")).unwrap();
    assert_eq!(cam0.intrinsics.f, 1000.0);
    assert_eq!(cam0.intrinsics.cx, 0.0);
    assert_eq!(cam0.intrinsics.cy, 0.0);
    assert!(cam0.intrinsics.distortion.is_zero());
    assert!(cam0.date.is_some());

    let cam1 = read_intrinsic_xml(&layout.intrinsic_path("01")).unwrap();
    assert_relative_eq!(cam1.intrinsics.cx, 10.0);
    assert_relative_eq!(cam1.intrinsics.cy, 0.0);
    assert_relative_eq!(cam1.intrinsics.distortion.k3, 0.0001);

    let pose = read_matrix4(&layout.extrinsic_path("01")).unwrap();
    let pose = Pose::<Calibration>::try_new(pose).unwrap();
    assert_relative_eq!(pose.position().x, 1.5, epsilon = 1e-6);
}

#[test]
fn existing_outputs_are_overwritten() {
    let dir = tempdir().unwrap();
    let calib = dir.path().join("calibration.json");
    fs::write(&calib, RENDERME360).unwrap();
    let layout = RigLayout::new(dir.path());
    layout.create_dirs().unwrap();
    fs::write(layout.intrinsic_path("00"), "stale").unwrap();

    Converter::new()
        .run(&calib, dir.path(), VendorFormat::RenderMe360)
        .unwrap();
    let rec = read_intrinsic_xml(&layout.intrinsic_path("00")).unwrap();
    assert_eq!(rec.intrinsics.width, 100);
}

#[test]
fn ava256_cameras_are_prefixed_and_inverted() {
    let dir = tempdir().unwrap();
    let calib = dir.path().join("KRT.json");
    fs::write(
        &calib,
        r#"{"KRT": [{
            "cameraId": 7,
            "K": [4000, 0, 0, 0, 4000, 0, 1334, 2048, 1],
            "distortion": [0, 0, 0, 0],
            "T": [0, 0, -1, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 2000, 1]
        }]}"#,
    )
    .unwrap();

    let report = convert(&calib, dir.path(), VendorFormat::Ava256).unwrap();
    assert_eq!(report.cameras, vec!["cam7"]);

    let layout = RigLayout::new(dir.path());
    let m = read_matrix4(&layout.extrinsic_path("cam7")).unwrap();
    let pose = Pose::<Calibration>::try_new(m).unwrap();
    // World-to-camera translates +2 m along camera z; the centre sits at -R^T t.
    let expected = -(pose.rotation() * nalgebra::Vector3::new(0.0, 0.0, 2.0));
    assert_relative_eq!(pose.position(), expected, epsilon = 1e-6);
}

#[test]
fn empty_calibration_is_invalid_input() {
    let dir = tempdir().unwrap();
    let calib = dir.path().join("KRT.json");
    fs::write(&calib, r#"{"KRT": []}"#).unwrap();
    let err = convert(&calib, dir.path(), VendorFormat::Ava256).unwrap_err();
    assert!(matches!(err, RigError::InvalidInput(_)), "{err}");
}

#[test]
fn wrong_schema_is_a_json_error() {
    let dir = tempdir().unwrap();
    let calib = dir.path().join("calibration.json");
    fs::write(&calib, RENDERME360).unwrap();
    let err = convert(&calib, dir.path(), VendorFormat::Ava256).unwrap_err();
    assert!(matches!(err, RigError::Json { .. }), "{err}");
}
