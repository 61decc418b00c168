//! Canonical intrinsic calibration file (`<calibration>` XML).
//!
//! ```xml
//! <?xml version="1.0" ?>
//! <calibration>
//!   <projection>frame</projection>
//!   <width>667</width>
//!   <height>1024</height>
//!   <f>1234.5</f>
//!   <cx>-1.25</cx>
//!   <cy>3.0</cy>
//!   <k1>0.0</k1>
//!   ...
//!   <date>2024-11-15T08:30:00Z</date>
//! </calibration>
//! ```
//!
//! The reader ignores elements it does not know (engines add covariance
//! blocks and extra distortion terms) and defaults missing distortion terms
//! to zero.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use serde::Deserialize;

use crate::error::{Result, RigError};
use crate::{BrownConrady5, FrameIntrinsics, ProjectionKind, Real};

/// Intrinsics as read back from disk, with the stored creation date.
#[derive(Clone, Debug, PartialEq)]
pub struct IntrinsicRecord {
    pub intrinsics: FrameIntrinsics,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "calibration")]
struct CalibrationXml {
    #[serde(default)]
    projection: Option<String>,
    width: u32,
    height: u32,
    f: Real,
    #[serde(default)]
    cx: Real,
    #[serde(default)]
    cy: Real,
    #[serde(default)]
    k1: Real,
    #[serde(default)]
    k2: Real,
    #[serde(default)]
    k3: Real,
    #[serde(default)]
    p1: Real,
    #[serde(default)]
    p2: Real,
    #[serde(default)]
    date: Option<String>,
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn utc_timestamp() -> String {
    humantime::format_rfc3339_seconds(SystemTime::now()).to_string()
}

fn real(v: Real) -> String {
    // Debug keeps a trailing `.0` on integral values.
    format!("{v:?}")
}

/// Render intrinsics as a pretty-printed XML document.
pub fn to_xml_string(intr: &FrameIntrinsics, date: &str) -> String {
    let d = &intr.distortion;
    let fields: [(&str, String); 12] = [
        ("projection", intr.projection.as_str().to_string()),
        ("width", intr.width.to_string()),
        ("height", intr.height.to_string()),
        ("f", real(intr.f)),
        ("cx", real(intr.cx)),
        ("cy", real(intr.cy)),
        ("k1", real(d.k1)),
        ("k2", real(d.k2)),
        ("k3", real(d.k3)),
        ("p1", real(d.p1)),
        ("p2", real(d.p2)),
        ("date", date.to_string()),
    ];

    let mut out = String::from("<?xml version=\"1.0\" ?>\n<calibration>\n");
    for (tag, value) in fields {
        let _ = writeln!(out, "  <{tag}>{value}</{tag}>");
    }
    out.push_str("</calibration>\n");
    out
}

/// Parse an intrinsic XML document.
pub fn from_xml_str(xml: &str, path: &Path) -> Result<IntrinsicRecord> {
    let raw: CalibrationXml = serde_xml_rs::from_str(xml).map_err(|source| RigError::Xml {
        path: path.to_path_buf(),
        source,
    })?;

    let projection = match raw.projection.as_deref() {
        None => ProjectionKind::Frame,
        Some(tag) => ProjectionKind::parse(tag).ok_or_else(|| {
            RigError::invalid_input(format!(
                "{}: unknown projection `{tag}`",
                path.display()
            ))
        })?,
    };

    Ok(IntrinsicRecord {
        intrinsics: FrameIntrinsics {
            projection,
            width: raw.width,
            height: raw.height,
            f: raw.f,
            cx: raw.cx,
            cy: raw.cy,
            distortion: BrownConrady5 {
                k1: raw.k1,
                k2: raw.k2,
                k3: raw.k3,
                p1: raw.p1,
                p2: raw.p2,
            },
        },
        date: raw.date,
    })
}

/// Write intrinsics to `path`, stamping `date` (or the current time).
///
/// Overwrites any existing file.
pub fn write_intrinsic_xml(path: &Path, intr: &FrameIntrinsics, date: Option<&str>) -> Result<()> {
    let stamp = date.map(str::to_string).unwrap_or_else(utc_timestamp);
    fs::write(path, to_xml_string(intr, &stamp)).map_err(|e| RigError::io(path, e))?;
    log::debug!("wrote intrinsics {}", path.display());
    Ok(())
}

pub fn read_intrinsic_xml(path: &Path) -> Result<IntrinsicRecord> {
    let xml = fs::read_to_string(path).map_err(|e| RigError::io(path, e))?;
    from_xml_str(&xml, path)
}
