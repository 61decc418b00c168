//! Geometry handed to viewer backends.

use rig_core::{apply_transform, Calibration, Mat4, Pose, Pt3, Real, Vec3};

/// Linear RGB in `[0, 1]`.
pub type Rgb = [f32; 3];

pub const RED: Rgb = [1.0, 0.0, 0.0];
pub const GREEN: Rgb = [0.0, 1.0, 0.0];
pub const BLUE: Rgb = [0.0, 0.0, 1.0];

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Pt3>,
    pub triangles: Vec<[u32; 3]>,
    /// Per-vertex normals; empty until computed.
    pub normals: Vec<Vec3>,
}

impl TriangleMesh {
    /// Area-weighted vertex normals.
    ///
    /// Vertices that belong to no triangle (or only degenerate ones) get a
    /// zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![Vec3::zeros(); self.vertices.len()];
        for tri in &self.triangles {
            let [a, b, c] = tri.map(|i| i as usize);
            if a >= acc.len() || b >= acc.len() || c >= acc.len() {
                continue;
            }
            // Cross product length is twice the triangle area.
            let n = (self.vertices[b] - self.vertices[a]).cross(&(self.vertices[c] - self.vertices[a]));
            for i in [a, b, c] {
                acc[i] += n;
            }
        }
        self.normals = acc
            .into_iter()
            .map(|n| n.try_normalize(Real::EPSILON).unwrap_or_else(Vec3::zeros))
            .collect();
    }
}

/// Colored line segments over a shared point list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSet {
    pub points: Vec<Pt3>,
    pub lines: Vec<[usize; 2]>,
    /// One color per line.
    pub colors: Vec<Rgb>,
}

impl LineSet {
    /// Endpoints and color of every line.
    pub fn segments(&self) -> impl Iterator<Item = (Pt3, Pt3, Rgb)> + '_ {
        self.lines
            .iter()
            .zip(&self.colors)
            .map(|(&[a, b], &c)| (self.points[a], self.points[b], c))
    }
}

const FRUSTUM_LINES: [[usize; 2]; 8] = [
    [0, 1],
    [0, 2],
    [0, 3],
    [0, 4],
    [1, 2],
    [2, 3],
    [3, 4],
    [4, 1],
];

/// Camera frustum: apex at the camera centre, image-plane rectangle along +z.
///
/// The first rectangle edge (the image's top side) is red, the rest green.
pub fn make_cam(pose: &Pose<Calibration>, scale: Real) -> LineSet {
    let k = scale / 40.0;
    let local = [
        Pt3::origin(),
        Pt3::new(-17.0 * k, -10.0 * k, 40.0 * k),
        Pt3::new(17.0 * k, -10.0 * k, 40.0 * k),
        Pt3::new(17.0 * k, 10.0 * k, 40.0 * k),
        Pt3::new(-17.0 * k, 10.0 * k, 40.0 * k),
    ];
    let mut colors = vec![GREEN; FRUSTUM_LINES.len()];
    colors[4] = RED;
    LineSet {
        points: local.iter().map(|p| pose.transform_point(p)).collect(),
        lines: FRUSTUM_LINES.to_vec(),
        colors,
    }
}

/// Axis triad: X red, Y green, Z blue.
pub fn make_origin(transform: &Mat4, scale: Real) -> LineSet {
    let local = [
        Pt3::origin(),
        Pt3::new(scale, 0.0, 0.0),
        Pt3::new(0.0, scale, 0.0),
        Pt3::new(0.0, 0.0, scale),
    ];
    LineSet {
        points: local.iter().map(|p| apply_transform(transform, p)).collect(),
        lines: vec![[0, 1], [0, 2], [0, 3]],
        colors: vec![RED, GREEN, BLUE],
    }
}

/// Everything one view shows.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub mesh: TriangleMesh,
    /// Camera frustums, in extrinsic file order.
    pub cameras: Vec<LineSet>,
    pub origin: Option<LineSet>,
}

impl Scene {
    /// Line sets in draw order: cameras first, then the origin.
    pub fn line_sets(&self) -> impl Iterator<Item = &LineSet> {
        self.cameras.iter().chain(self.origin.iter())
    }
}
