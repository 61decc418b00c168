use std::path::Path;

use log::{debug, info};
use rig_core::io::{read_matrix4, RigLayout};
use rig_core::{Calibration, Mat4, Pose, Pt3, Real, Result, RigError, WorkingFrame};
use serde::{Deserialize, Serialize};

use crate::scene::{make_cam, make_origin, LineSet, Scene, TriangleMesh};
use crate::sink::SceneSink;

/// What to show and how large.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Show the mesh alone, without cameras or the origin triad.
    pub only_mesh: bool,
    /// Frustum size.
    pub camera_scale: Real,
    /// Axis length of the origin triad.
    pub origin_scale: Real,
    pub compute_normals: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            only_mesh: false,
            camera_scale: 0.1,
            origin_scale: 1.0,
            compute_normals: true,
        }
    }
}

/// Loads a reconstruction output directory into a [`Scene`].
#[derive(Debug, Clone, Default)]
pub struct Visualizer {
    options: ViewerOptions,
}

impl Visualizer {
    pub fn new(options: ViewerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    /// Read `mesh.obj`, `mesh_coord_changer.npy` and `extrinsics/` under `save_dir`.
    pub fn load(&self, save_dir: &Path) -> Result<Scene> {
        let layout = RigLayout::new(save_dir);
        let mesh = load_mesh(
            &layout.mesh_path(),
            &layout.mesh_coord_changer_path(),
            self.options.compute_normals,
        )?;
        if self.options.only_mesh {
            return Ok(Scene {
                mesh,
                ..Scene::default()
            });
        }
        let cameras = load_cameras(&layout, self.options.camera_scale)?;
        info!("Loaded {} cameras", cameras.len());
        Ok(Scene {
            mesh,
            cameras,
            origin: Some(make_origin(&Mat4::identity(), self.options.origin_scale)),
        })
    }

    /// Load `save_dir` and hand the scene to `sink`.
    pub fn run(&self, save_dir: &Path, sink: &mut dyn SceneSink) -> Result<Scene> {
        let scene = self.load(save_dir)?;
        sink.show(&scene)?;
        Ok(scene)
    }
}

/// Load an OBJ mesh and bring it from the working frame to the calibration
/// frame with the persisted `mesh_coord_changer`.
pub fn load_mesh(obj_path: &Path, mesh_coord_changer_path: &Path, compute_normals: bool) -> Result<TriangleMesh> {
    let frame = WorkingFrame::from_mesh_coord_changer(read_matrix4(mesh_coord_changer_path)?)?;
    let mut mesh = read_obj(obj_path)?;
    for v in &mut mesh.vertices {
        *v = frame.eject_point(v);
    }
    if compute_normals {
        mesh.compute_vertex_normals();
    }
    debug!(
        "mesh {}: {} vertices, {} triangles",
        obj_path.display(),
        mesh.vertices.len(),
        mesh.triangles.len()
    );
    Ok(mesh)
}

/// Read every model of an OBJ file into one triangulated mesh.
pub fn read_obj(path: &Path) -> Result<TriangleMesh> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options).map_err(|e| RigError::Mesh {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut mesh = TriangleMesh::default();
    for model in models {
        let m = model.mesh;
        let base = mesh.vertices.len() as u32;
        mesh.vertices.extend(
            m.positions
                .chunks_exact(3)
                .map(|p| Pt3::new(Real::from(p[0]), Real::from(p[1]), Real::from(p[2]))),
        );
        mesh.triangles.extend(
            m.indices
                .chunks_exact(3)
                .map(|t| [base + t[0], base + t[1], base + t[2]]),
        );
    }
    if mesh.vertices.is_empty() {
        return Err(RigError::Mesh {
            path: path.to_path_buf(),
            message: "no vertices".into(),
        });
    }
    Ok(mesh)
}

/// One frustum per extrinsic file, in file-name order.
///
/// Extrinsics under a reconstruction output are already in the calibration
/// frame and are drawn as stored.
pub fn load_cameras(layout: &RigLayout, scale: Real) -> Result<Vec<LineSet>> {
    layout
        .list_extrinsics()?
        .iter()
        .map(|path| {
            let pose = Pose::<Calibration>::try_new(read_matrix4(path)?)
                .map_err(|_| RigError::non_rigid(path.display().to_string()))?;
            Ok(make_cam(&pose, scale))
        })
        .collect()
}
