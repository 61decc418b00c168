//! Viewer backends.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use log::info;
use rig_core::{Result, RigError};

use crate::scene::Scene;

/// Something that can display or persist a [`Scene`].
pub trait SceneSink {
    fn show(&mut self, scene: &Scene) -> Result<()>;
}

/// Writes the whole scene into one OBJ file.
///
/// Mesh triangles become `f` elements. Every line segment gets its own pair
/// of vertices carrying the segment color (`v x y z r g b`) and an `l`
/// element, so per-line colors survive viewers that only know vertex colors.
#[derive(Debug, Clone)]
pub struct ObjSceneWriter {
    path: PathBuf,
}

impl ObjSceneWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render `scene` as OBJ text.
pub fn scene_to_obj(scene: &Scene) -> String {
    let mut out = String::from("# rig scene\n");
    let mesh = &scene.mesh;

    if !mesh.vertices.is_empty() {
        out.push_str("o mesh\n");
        for v in &mesh.vertices {
            let _ = writeln!(out, "v {} {} {}", v.x, v.y, v.z);
        }
        let with_normals = mesh.normals.len() == mesh.vertices.len();
        if with_normals {
            for n in &mesh.normals {
                let _ = writeln!(out, "vn {} {} {}", n.x, n.y, n.z);
            }
        }
        for t in &mesh.triangles {
            let [a, b, c] = t.map(|i| i + 1);
            if with_normals {
                let _ = writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}");
            } else {
                let _ = writeln!(out, "f {a} {b} {c}");
            }
        }
    }

    let mut next = mesh.vertices.len() + 1;
    for (i, set) in scene.line_sets().enumerate() {
        let _ = writeln!(out, "o lines_{i}");
        for (p, q, [r, g, b]) in set.segments() {
            let _ = writeln!(out, "v {} {} {} {r} {g} {b}", p.x, p.y, p.z);
            let _ = writeln!(out, "v {} {} {} {r} {g} {b}", q.x, q.y, q.z);
            let _ = writeln!(out, "l {} {}", next, next + 1);
            next += 2;
        }
    }
    out
}

impl SceneSink for ObjSceneWriter {
    fn show(&mut self, scene: &Scene) -> Result<()> {
        std::fs::write(&self.path, scene_to_obj(scene)).map_err(|e| RigError::io(&self.path, e))?;
        info!("Wrote scene to {}", self.path.display());
        Ok(())
    }
}

#[cfg(feature = "rerun")]
pub use self::rerun_sink::RerunSink;

#[cfg(feature = "rerun")]
mod rerun_sink {
    use rerun::RecordingStream;
    use rig_core::{Result, RigError};

    use super::SceneSink;
    use crate::scene::{Rgb, Scene};

    fn color(c: Rgb) -> [u8; 3] {
        c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Streams the scene to a spawned rerun viewer.
    pub struct RerunSink {
        rec: RecordingStream,
    }

    impl RerunSink {
        pub fn spawn(app_id: &str) -> Result<Self> {
            let rec = rerun::RecordingStreamBuilder::new(app_id)
                .spawn()
                .map_err(|e| RigError::Viewer(e.to_string()))?;
            Ok(Self { rec })
        }

        fn log(&self, path: &str, archetype: &impl rerun::AsComponents) -> Result<()> {
            self.rec
                .log(path, archetype)
                .map_err(|e| RigError::Viewer(e.to_string()))
        }
    }

    impl SceneSink for RerunSink {
        fn show(&mut self, scene: &Scene) -> Result<()> {
            self.rec
                .log_static("world", &rerun::ViewCoordinates::RDF())
                .map_err(|e| RigError::Viewer(e.to_string()))?;

            let mesh = &scene.mesh;
            let positions: Vec<[f32; 3]> = mesh
                .vertices
                .iter()
                .map(|v| [v.x as f32, v.y as f32, v.z as f32])
                .collect();
            let mut mesh3d = rerun::Mesh3D::new(positions).with_triangle_indices(mesh.triangles.clone());
            if mesh.normals.len() == mesh.vertices.len() {
                mesh3d = mesh3d.with_vertex_normals(
                    mesh.normals
                        .iter()
                        .map(|n| [n.x as f32, n.y as f32, n.z as f32])
                        .collect::<Vec<_>>(),
                );
            }
            self.log("world/mesh", &mesh3d)?;

            for (i, set) in scene.cameras.iter().enumerate() {
                let (strips, colors): (Vec<Vec<[f32; 3]>>, Vec<[u8; 3]>) = set
                    .segments()
                    .map(|(p, q, c)| {
                        (
                            vec![
                                [p.x as f32, p.y as f32, p.z as f32],
                                [q.x as f32, q.y as f32, q.z as f32],
                            ],
                            color(c),
                        )
                    })
                    .unzip();
                self.log(
                    &format!("world/cameras/{i}"),
                    &rerun::LineStrips3D::new(strips).with_colors(colors),
                )?;
            }

            if let Some(origin) = &scene.origin {
                self.log("world/origin", &rerun::Arrows3D::from_vectors(
                    origin.segments().map(|(p, q, _)| {
                        [(q.x - p.x) as f32, (q.y - p.y) as f32, (q.z - p.z) as f32]
                    }),
                )
                .with_origins(origin.segments().map(|(p, _, _)| [p.x as f32, p.y as f32, p.z as f32]))
                .with_colors(origin.colors.iter().map(|c| color(*c))))?;
            }
            Ok(())
        }
    }
}
