use serde::{Deserialize, Serialize};

use crate::{Mat3, Real};

/// Projection kind understood by the reconstruction engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Classic pinhole ("frame") camera.
    #[default]
    Frame,
    Fisheye,
    Spherical,
    Cylindrical,
}

impl ProjectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectionKind::Frame => "frame",
            ProjectionKind::Fisheye => "fisheye",
            ProjectionKind::Spherical => "spherical",
            ProjectionKind::Cylindrical => "cylindrical",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "frame" => Some(ProjectionKind::Frame),
            "fisheye" => Some(ProjectionKind::Fisheye),
            "spherical" => Some(ProjectionKind::Spherical),
            "cylindrical" => Some(ProjectionKind::Cylindrical),
            _ => None,
        }
    }
}

/// Brown-Conrady radial (k1..k3) and tangential (p1, p2) coefficients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BrownConrady5 {
    pub k1: Real,
    pub k2: Real,
    pub k3: Real,
    pub p1: Real,
    pub p2: Real,
}

impl BrownConrady5 {
    pub fn is_zero(&self) -> bool {
        [self.k1, self.k2, self.k3, self.p1, self.p2]
            .iter()
            .all(|v| *v == 0.0)
    }
}

/// Pinhole intrinsics with a single focal length and a centre-relative
/// principal point.
///
/// `cx`/`cy` are offsets from `(width / 2, height / 2)`, not absolute pixel
/// coordinates. Use [`FrameIntrinsics::from_k_matrix`] and
/// [`FrameIntrinsics::k_matrix`] to move between the two conventions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameIntrinsics {
    pub projection: ProjectionKind,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Focal length in pixels.
    pub f: Real,
    /// Principal point X offset from the image centre.
    pub cx: Real,
    /// Principal point Y offset from the image centre.
    pub cy: Real,
    #[serde(flatten)]
    pub distortion: BrownConrady5,
}

impl FrameIntrinsics {
    /// Derive intrinsics from an absolute 3×3 camera matrix.
    ///
    /// The focal length is the geometric mean `sqrt(K[0,0] · K[1,1])`, which
    /// assumes square pixels; skew is dropped.
    pub fn from_k_matrix(k: &Mat3, width: u32, height: u32, distortion: BrownConrady5) -> Self {
        let f = (k[(0, 0)] * k[(1, 1)]).sqrt();
        Self {
            projection: ProjectionKind::Frame,
            width,
            height,
            f,
            cx: k[(0, 2)] - Real::from(width) / 2.0,
            cy: k[(1, 2)] - Real::from(height) / 2.0,
            distortion,
        }
    }

    /// Absolute principal point in pixels.
    pub fn principal_point(&self) -> (Real, Real) {
        (
            self.cx + Real::from(self.width) / 2.0,
            self.cy + Real::from(self.height) / 2.0,
        )
    }

    /// Return the absolute 3×3 camera matrix K.
    pub fn k_matrix(&self) -> Mat3 {
        let (u0, v0) = self.principal_point();
        Mat3::new(self.f, 0.0, u0, 0.0, self.f, v0, 0.0, 0.0, 1.0)
    }
}
