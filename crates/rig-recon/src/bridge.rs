//! Moving pre-calibrated poses into and out of the engine's working frame.
//!
//! The engine reconstructs inside its own oriented [`Region`]. Pre-calibrated
//! poses are re-expressed relative to that region before dense
//! reconstruction (`T_gk · P`), and everything the engine produces is later
//! brought back with `mesh_coord_changer = inverse(T_gk)`.

use log::{debug, info, warn};
use rig_core::io::{read_matrix4, RigLayout};
use rig_core::{
    is_rigid, make_transform, Calibration, Mat4, Pose, Result, RigError, Vec3, Working,
    WorkingFrame, RIGID_TOLERANCE,
};

use crate::engine::{EngineCamera, PhotogrammetryEngine, Region};
use crate::inputs::image_stem;

/// `T_gk` of a region: rotation = region axes, translation = region centre.
pub fn region_transform(region: &Region) -> Result<Mat4> {
    let t_gk = make_transform(&region.rotation, &region.center);
    if !is_rigid(&t_gk, RIGID_TOLERANCE) {
        return Err(RigError::non_rigid("engine region axes"));
    }
    Ok(t_gk)
}

/// Load the pre-calibrated camera-to-world pose of one camera.
pub fn load_precalibrated_pose(init: &RigLayout, camera_id: &str) -> Result<Pose<Calibration>> {
    let path = init.extrinsic_path(camera_id);
    if !path.is_file() {
        return Err(RigError::MissingCalibration {
            camera_id: camera_id.to_string(),
            path,
        });
    }
    let m = read_matrix4(&path)?;
    Pose::try_new(m).map_err(|_| RigError::non_rigid(format!("{}", path.display())))
}

/// Mean camera centre.
pub fn centroid<'a>(poses: impl IntoIterator<Item = &'a Pose<Working>>) -> Option<Vec3> {
    let (sum, n) = poses
        .into_iter()
        .fold((Vec3::zeros(), 0usize), |(sum, n), p| (sum + p.position(), n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Replace every camera pose with its pre-calibrated one, expressed in the
/// region's frame, then re-centre the region on the cameras.
///
/// Poses are looked up by the stem of each camera's photo, the same key the
/// pre-calibrated intrinsics use. All poses are loaded before the engine is
/// touched, so a missing file leaves the engine state unchanged.
pub fn inject_precalibration(
    engine: &mut dyn PhotogrammetryEngine,
    cameras: &[EngineCamera],
    init: &RigLayout,
    bbox_dim: &Vec3,
) -> Result<WorkingFrame> {
    let region = engine.region();
    let frame = WorkingFrame::from_working_transform(region_transform(&region)?)?;
    debug!("region centre {:?}, size {:?}", region.center, region.size);

    let mut injected = Vec::with_capacity(cameras.len());
    for camera in cameras {
        let pose = load_precalibrated_pose(init, &image_stem(&camera.photo)?)?;
        injected.push((camera.id, frame.inject(pose)));
    }

    for (id, pose) in &injected {
        engine
            .set_camera_transform(*id, *pose.matrix())
            .map_err(|e| RigError::engine("set_camera_transform", e))?;
    }

    let center = centroid(injected.iter().map(|(_, p)| p)).unwrap_or(region.center);
    engine
        .set_region(Region {
            center,
            rotation: region.rotation,
            size: *bbox_dim,
        })
        .map_err(|e| RigError::engine("set_region", e))?;
    engine
        .update_transform()
        .map_err(|e| RigError::engine("update_transform", e))?;

    info!("Injected {} pre-calibrated camera poses", injected.len());
    Ok(frame)
}

/// Engine camera poses brought back to the calibration frame.
///
/// Cameras the engine could not align are skipped with a warning.
pub fn eject_camera_poses(
    engine: &dyn PhotogrammetryEngine,
    cameras: &[EngineCamera],
    frame: &WorkingFrame,
) -> Result<Vec<(String, Pose<Calibration>)>> {
    let mut out = Vec::with_capacity(cameras.len());
    for camera in cameras {
        let Some(m) = engine.camera_transform(camera.id) else {
            warn!("camera {} has no pose, skipping", camera.label);
            continue;
        };
        let working = Pose::<Working>::try_new(m)
            .map_err(|_| RigError::non_rigid(format!("engine pose of camera {}", camera.label)))?;
        out.push((camera.label.clone(), frame.eject(working)));
    }
    Ok(out)
}
