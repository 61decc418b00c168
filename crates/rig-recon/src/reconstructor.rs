//! Reconstruction driver.
//!
//! Sequences a [`PhotogrammetryEngine`] through sensor setup, sparse
//! alignment, optional pre-calibration injection, dense reconstruction and
//! export, then writes the calibrated rig next to the mesh.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{info, warn};
use rig_core::io::{read_intrinsic_xml, write_intrinsic_xml, write_matrix4, RigLayout};
use rig_core::{FrameIntrinsics, Mat4, Result, RigError, WorkingFrame};

use crate::bridge::{eject_camera_poses, inject_precalibration};
use crate::config::ReconstructionConfig;
use crate::engine::{EngineCamera, EngineError, PhotogrammetryEngine, SensorSpec};
use crate::inputs::{image_size, image_stem, inspect_inputs};
use crate::run_log::{format_hms, LogEntry, RunLog};

/// Sensor label the engine uses for its placeholder sensor.
pub const UNKNOWN_SENSOR_LABEL: &str = "unknown";

/// What a successful run wrote.
#[derive(Debug, Clone)]
pub struct ReconstructionReport {
    pub save_dir: PathBuf,
    /// Sensor labels with a written intrinsic file.
    pub intrinsics: Vec<String>,
    /// Camera labels with a written extrinsic file.
    pub extrinsics: Vec<String>,
    pub mesh_coord_changer: Mat4,
    pub elapsed: Duration,
}

/// Drives one engine session per [`run`](Reconstructor::run).
#[derive(Debug, Clone, Default)]
pub struct Reconstructor {
    config: ReconstructionConfig,
}

fn engine_step<T>(stage: &str, result: std::result::Result<T, EngineError>) -> Result<T> {
    result.map_err(|e| RigError::engine(stage, e))
}

impl Reconstructor {
    pub fn new(config: ReconstructionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Reconstruct a textured mesh from `images` into `save_dir`.
    ///
    /// With `init_dir`, intrinsics are loaded from
    /// `init_dir/intrinsics/<stem>_intrinsic.xml` and poses from
    /// `init_dir/extrinsics/<stem>_extrinsic.npy` for every image.
    /// `reconstruction_log.json` is written even when a stage fails, as long
    /// as `save_dir` can be created.
    pub fn run<P: AsRef<Path>>(
        &self,
        engine: &mut dyn PhotogrammetryEngine,
        images: &[P],
        save_dir: &Path,
        init_dir: Option<&Path>,
    ) -> Result<ReconstructionReport> {
        let start = Instant::now();
        let layout = RigLayout::new(save_dir);
        let init = init_dir.map(RigLayout::new);
        let mut log = RunLog::new(init.is_some());

        let result = self.run_stages(engine, images, &layout, init.as_ref(), &mut log);
        log.finish();
        let elapsed = start.elapsed();
        info!("Processing time : {} hmr", format_hms(elapsed));

        let log_path = layout.run_log_path();
        match std::fs::create_dir_all(layout.root()) {
            Ok(()) => {
                if let Err(e) = log.save(&log_path) {
                    warn!("could not write {}: {e}", log_path.display());
                }
            }
            Err(e) => warn!("could not write {}: {e}", log_path.display()),
        }

        let (intrinsics, extrinsics, frame) = result?;
        Ok(ReconstructionReport {
            save_dir: save_dir.to_path_buf(),
            intrinsics,
            extrinsics,
            mesh_coord_changer: *frame.mesh_coord_changer(),
            elapsed,
        })
    }

    fn run_stages<P: AsRef<Path>>(
        &self,
        engine: &mut dyn PhotogrammetryEngine,
        images: &[P],
        layout: &RigLayout,
        init: Option<&RigLayout>,
        log: &mut RunLog,
    ) -> Result<(Vec<String>, Vec<String>, WorkingFrame)> {
        let cfg = &self.config;

        let images = record(log, "inspect_inputs", inspect_inputs(images))?;
        log.images = images.clone();

        record(log, "add_photos", engine_step("add_photos", engine.add_photos(&images)))?;
        let cameras = engine.cameras();

        let sensors = self.setup_sensors(engine, &cameras, init);
        record(log, "add_sensors", sensors)?;

        info!("Reconstruction starts...");
        let matching = engine_step("match_photos", engine.match_photos(&cfg.match_options()));
        record_with_notes(
            log,
            "match_photos",
            matching,
            format!("downscale {}", cfg.matching_level.matching_downscale()),
        )?;
        record(log, "align_cameras", engine_step("align_cameras", engine.align_cameras()))?;

        let mut frame = WorkingFrame::identity();
        if let Some(init) = init {
            let optimized = engine_step(
                "optimize_cameras",
                engine.optimize_cameras(cfg.adaptive_fitting),
            );
            record(log, "optimize_cameras", optimized)?;
            let injected = inject_precalibration(engine, &cameras, init, &cfg.bbox_dim);
            frame = record(log, "inject_precalibration", injected)?;
        }

        let depth = cfg.depth_map_options();
        record_with_notes(
            log,
            "build_depth_maps",
            engine_step("build_depth_maps", engine.build_depth_maps(&depth)),
            format!("downscale {}", depth.downscale),
        )?;
        record(log, "build_model", engine_step("build_model", engine.build_model()))?;
        record(
            log,
            "build_uv",
            engine_step("build_uv", engine.build_uv(cfg.texture_size)),
        )?;
        record(
            log,
            "build_texture",
            engine_step("build_texture", engine.build_texture(cfg.texture_size)),
        )?;

        let saved = save_outputs(engine, &cameras, layout, &frame);
        let (intrinsics, extrinsics) = record(log, "save", saved)?;
        Ok((intrinsics, extrinsics, frame))
    }

    /// One frame sensor per camera, labelled with the image stem.
    fn setup_sensors(
        &self,
        engine: &mut dyn PhotogrammetryEngine,
        cameras: &[EngineCamera],
        init: Option<&RigLayout>,
    ) -> Result<()> {
        for camera in cameras {
            let label = image_stem(&camera.photo)?;
            let (width, height) = image_size(&camera.photo)?;
            let user_calibration = init
                .map(|init| load_precalibrated_intrinsics(init, &label))
                .transpose()?;
            let fixed = user_calibration.is_some() && self.config.fix_intrinsics;
            let sensor = engine_step(
                "add_sensor",
                engine.add_sensor(SensorSpec {
                    label,
                    width,
                    height,
                    user_calibration,
                    fixed,
                }),
            )?;
            engine_step("set_camera_sensor", engine.set_camera_sensor(camera.id, sensor))?;
        }
        Ok(())
    }
}

fn load_precalibrated_intrinsics(init: &RigLayout, camera_id: &str) -> Result<FrameIntrinsics> {
    let path = init.intrinsic_path(camera_id);
    if !path.is_file() {
        return Err(RigError::MissingCalibration {
            camera_id: camera_id.to_string(),
            path,
        });
    }
    Ok(read_intrinsic_xml(&path)?.intrinsics)
}

/// Write sensors, ejected camera poses, `mesh_coord_changer` and the mesh.
fn save_outputs(
    engine: &mut dyn PhotogrammetryEngine,
    cameras: &[EngineCamera],
    layout: &RigLayout,
    frame: &WorkingFrame,
) -> Result<(Vec<String>, Vec<String>)> {
    layout.create_dirs()?;

    let mut intrinsics = Vec::new();
    for sensor in engine.sensors() {
        if sensor.label == UNKNOWN_SENSOR_LABEL {
            continue;
        }
        write_intrinsic_xml(&layout.intrinsic_path(&sensor.label), &sensor.calibration, None)?;
        intrinsics.push(sensor.label);
    }

    let mut extrinsics = Vec::new();
    for (label, pose) in eject_camera_poses(&*engine, cameras, frame)? {
        write_matrix4(&layout.extrinsic_path(&label), pose.matrix())?;
        extrinsics.push(label);
    }

    write_matrix4(&layout.mesh_coord_changer_path(), frame.mesh_coord_changer())?;
    let mesh_path = layout.mesh_path();
    engine_step("export_model", engine.export_model(&mesh_path))?;
    info!("Saved mesh to {}", mesh_path.display());
    Ok((intrinsics, extrinsics))
}

fn record<T>(log: &mut RunLog, stage: &str, result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => log.push(LogEntry::success(stage)),
        Err(e) => log.push(LogEntry::failure(stage, e.to_string())),
    }
    result
}

fn record_with_notes<T>(log: &mut RunLog, stage: &str, result: Result<T>, notes: String) -> Result<T> {
    match &result {
        Ok(_) => log.push(LogEntry::success_with_notes(stage, notes)),
        Err(e) => log.push(LogEntry::failure(stage, e.to_string())),
    }
    result
}
