//! Scripted in-memory engine for driver tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use nalgebra::Rotation3;
use rig_core::{make_transform, BrownConrady5, FrameIntrinsics, Mat4, ProjectionKind, Vec3};
use rig_recon::{
    CameraId, DepthMapOptions, EngineCamera, EngineError, EngineResult, EngineSensor,
    MatchOptions, PhotogrammetryEngine, Region, SensorId, SensorSpec,
};

#[derive(Debug, Clone)]
pub struct FakeSensor {
    pub spec: SensorSpec,
}

/// Engine that "aligns" camera `i` at `aligned_pose(i)` and exports one
/// triangle spanning the first three camera centres.
#[derive(Debug)]
pub struct FakeEngine {
    pub calls: Vec<String>,
    pub cameras: Vec<EngineCamera>,
    pub transforms: BTreeMap<CameraId, Mat4>,
    pub sensors: Vec<FakeSensor>,
    pub camera_sensor: BTreeMap<CameraId, SensorId>,
    pub region: Region,
    pub match_options: Option<MatchOptions>,
    pub depth_options: Option<DepthMapOptions>,
    pub fail_stage: Option<&'static str>,
    /// Cameras left unaligned by `align_cameras`.
    pub unaligned: Vec<CameraId>,
    /// Label cameras with the full file name instead of the stem.
    pub file_name_labels: bool,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            cameras: Vec::new(),
            transforms: BTreeMap::new(),
            sensors: Vec::new(),
            camera_sensor: BTreeMap::new(),
            region: Region {
                center: Vec3::new(0.5, 0.25, -2.0),
                rotation: *Rotation3::from_euler_angles(0.0, 0.0, 0.5).matrix(),
                size: Vec3::new(10.0, 10.0, 10.0),
            },
            match_options: None,
            depth_options: None,
            fail_stage: None,
            unaligned: Vec::new(),
            file_name_labels: false,
        }
    }
}

pub fn aligned_pose(i: usize) -> Mat4 {
    let rot = *Rotation3::from_euler_angles(0.1 * i as f64, -0.2, 0.05).matrix();
    make_transform(&rot, &Vec3::new(i as f64, 0.5, 3.0 - i as f64))
}

impl FakeEngine {
    pub fn failing_at(stage: &'static str) -> Self {
        Self {
            fail_stage: Some(stage),
            ..Self::default()
        }
    }

    fn call(&mut self, stage: &str) -> EngineResult<()> {
        self.calls.push(stage.to_string());
        if self.fail_stage == Some(stage) {
            return Err(EngineError::new(format!("scripted failure in {stage}")));
        }
        Ok(())
    }

    pub fn sensor_of(&self, label: &str) -> Option<&SensorSpec> {
        self.sensors.iter().map(|s| &s.spec).find(|s| s.label == label)
    }
}

fn default_calibration(spec: &SensorSpec) -> FrameIntrinsics {
    FrameIntrinsics {
        projection: ProjectionKind::Frame,
        width: spec.width,
        height: spec.height,
        f: 1200.0,
        cx: 1.5,
        cy: -2.0,
        distortion: BrownConrady5::default(),
    }
}

impl PhotogrammetryEngine for FakeEngine {
    fn add_photos(&mut self, photos: &[PathBuf]) -> EngineResult<()> {
        self.call("add_photos")?;
        // The engine always owns a placeholder sensor.
        self.sensors.push(FakeSensor {
            spec: SensorSpec {
                label: "unknown".into(),
                width: 0,
                height: 0,
                user_calibration: None,
                fixed: false,
            },
        });
        for photo in photos {
            let name = if self.file_name_labels {
                photo.file_name()
            } else {
                photo.file_stem()
            };
            let label = name
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            self.cameras.push(EngineCamera {
                id: self.cameras.len(),
                label,
                photo: photo.clone(),
            });
        }
        Ok(())
    }

    fn cameras(&self) -> Vec<EngineCamera> {
        self.cameras.clone()
    }

    fn add_sensor(&mut self, spec: SensorSpec) -> EngineResult<SensorId> {
        self.call("add_sensor")?;
        self.sensors.push(FakeSensor { spec });
        Ok(self.sensors.len() - 1)
    }

    fn set_camera_sensor(&mut self, camera: CameraId, sensor: SensorId) -> EngineResult<()> {
        self.camera_sensor.insert(camera, sensor);
        Ok(())
    }

    fn sensors(&self) -> Vec<EngineSensor> {
        self.sensors
            .iter()
            .enumerate()
            .map(|(id, s)| EngineSensor {
                id,
                label: s.spec.label.clone(),
                calibration: s
                    .spec
                    .user_calibration
                    .unwrap_or_else(|| default_calibration(&s.spec)),
            })
            .collect()
    }

    fn match_photos(&mut self, options: &MatchOptions) -> EngineResult<()> {
        self.call("match_photos")?;
        self.match_options = Some(options.clone());
        Ok(())
    }

    fn align_cameras(&mut self) -> EngineResult<()> {
        self.call("align_cameras")?;
        for cam in &self.cameras {
            if !self.unaligned.contains(&cam.id) {
                self.transforms.insert(cam.id, aligned_pose(cam.id));
            }
        }
        Ok(())
    }

    fn optimize_cameras(&mut self, _adaptive_fitting: bool) -> EngineResult<()> {
        self.call("optimize_cameras")
    }

    fn region(&self) -> Region {
        self.region
    }

    fn set_region(&mut self, region: Region) -> EngineResult<()> {
        self.call("set_region")?;
        self.region = region;
        Ok(())
    }

    fn camera_transform(&self, camera: CameraId) -> Option<Mat4> {
        self.transforms.get(&camera).copied()
    }

    fn set_camera_transform(&mut self, camera: CameraId, transform: Mat4) -> EngineResult<()> {
        self.transforms.insert(camera, transform);
        Ok(())
    }

    fn update_transform(&mut self) -> EngineResult<()> {
        self.call("update_transform")
    }

    fn build_depth_maps(&mut self, options: &DepthMapOptions) -> EngineResult<()> {
        self.call("build_depth_maps")?;
        self.depth_options = Some(*options);
        Ok(())
    }

    fn build_model(&mut self) -> EngineResult<()> {
        self.call("build_model")
    }

    fn build_uv(&mut self, _texture_size: u32) -> EngineResult<()> {
        self.call("build_uv")
    }

    fn build_texture(&mut self, _texture_size: u32) -> EngineResult<()> {
        self.call("build_texture")
    }

    fn export_model(&mut self, path: &Path) -> EngineResult<()> {
        self.call("export_model")?;
        let mut obj = String::new();
        for m in self.transforms.values().take(3) {
            let _ = writeln!(obj, "v {} {} {}", m[(0, 3)], m[(1, 3)], m[(2, 3)]);
        }
        obj.push_str("f 1 2 3\n");
        std::fs::write(path, obj).map_err(|e| EngineError::new(e.to_string()))
    }
}

/// Write `n` small PNGs named `cam00.png`, `cam01.png`, ...
pub fn write_images(dir: &Path, n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| {
            let path = dir.join(format!("cam{i:02}.png"));
            image::RgbImage::new(40 + i as u32, 30).save(&path).unwrap();
            path
        })
        .collect()
}
