//! Resource Snapshots
//!
//! The indicator's visual resources bake in the theme color and the display
//! rotation at construction time. A [`ResourceSnapshot`] records those two
//! values so a later configuration change can be checked against them
//! without touching any rendering code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque theme color (ARGB)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeColor(pub u32);

impl ThemeColor {
    /// Create a color from its packed ARGB value
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    /// Packed ARGB value
    #[must_use]
    pub const fn argb(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// Display rotation, in quarter turns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    /// Natural orientation
    #[default]
    Deg0,
    /// Rotated 90 degrees
    Deg90,
    /// Rotated 180 degrees
    Deg180,
    /// Rotated 270 degrees
    Deg270,
}

impl Rotation {
    /// Rotation in degrees
    #[must_use]
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(format!("unsupported rotation: {other} degrees")),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Theme color and rotation a dialog resource was built with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Accent color of the indicator
    pub color: ThemeColor,
    /// Display rotation at build time
    pub rotation: Rotation,
}

impl ResourceSnapshot {
    /// Create a snapshot
    #[must_use]
    pub const fn new(color: ThemeColor, rotation: Rotation) -> Self {
        Self { color, rotation }
    }
}

impl fmt::Display for ResourceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.color, self.rotation)
    }
}

/// Whether resources built for `baseline` are stale under `fresh`
///
/// Compares field by field; any difference in color or rotation means the
/// dialog has to be rebuilt.
#[must_use]
pub fn needs_recreate(baseline: &ResourceSnapshot, fresh: &ResourceSnapshot) -> bool {
    baseline.color != fresh.color || baseline.rotation != fresh.rotation
}
