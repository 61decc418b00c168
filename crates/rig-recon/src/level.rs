//! Resolution levels shared by matching and dense reconstruction.

use std::fmt;

use rig_core::{Result, RigError};
use serde::{Deserialize, Serialize};

const MATCHING_DOWNSCALE: [u32; 5] = [0, 1, 2, 4, 8];
const DENSE_DOWNSCALE: [u32; 5] = [1, 2, 4, 8, 16];

/// Ordinal quality level, 0 (highest) to 4 (lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ResolutionLevel(u8);

impl ResolutionLevel {
    pub const HIGHEST: Self = Self(0);
    pub const LOWEST: Self = Self(4);

    pub fn value(self) -> u8 {
        self.0
    }

    /// Image downscale passed to feature matching.
    pub fn matching_downscale(self) -> u32 {
        MATCHING_DOWNSCALE[usize::from(self.0)]
    }

    /// Image downscale passed to depth-map generation.
    pub fn dense_downscale(self) -> u32 {
        DENSE_DOWNSCALE[usize::from(self.0)]
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (Self::HIGHEST.0..=Self::LOWEST.0).map(Self)
    }
}

impl Default for ResolutionLevel {
    fn default() -> Self {
        Self::HIGHEST
    }
}

impl TryFrom<u8> for ResolutionLevel {
    type Error = RigError;

    fn try_from(level: u8) -> Result<Self> {
        if level <= Self::LOWEST.0 {
            Ok(Self(level))
        } else {
            Err(RigError::invalid_input(format!(
                "resolution level {level} is out of range, choose among high-to-low [0, 1, 2, 3, 4]"
            )))
        }
    }
}

impl From<ResolutionLevel> for u8 {
    fn from(level: ResolutionLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for ResolutionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
