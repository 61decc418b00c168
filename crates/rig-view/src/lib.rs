//! Scene assembly for reconstructed rigs.
//!
//! [`Visualizer`] reads a reconstruction output directory, maps the mesh back
//! to the calibration frame and builds camera frustums; a [`SceneSink`]
//! displays or persists the result. `ObjSceneWriter` is always available,
//! `RerunSink` behind the `rerun` feature.

pub mod scene;
pub mod sink;
mod visualizer;

pub use scene::{make_cam, make_origin, LineSet, Rgb, Scene, TriangleMesh};
#[cfg(feature = "rerun")]
pub use sink::RerunSink;
pub use sink::{scene_to_obj, ObjSceneWriter, SceneSink};
pub use visualizer::{load_cameras, load_mesh, read_obj, ViewerOptions, Visualizer};
