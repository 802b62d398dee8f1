//! Point types for the two coordinate spaces.
//!
//! Field space is measured in inches with the origin at the field center
//! and +Y pointing away from the driver (up on the image). Screen space is
//! measured in image pixels with the origin at the top-left and +Y down.
//! Keeping them as distinct types stops a pixel coordinate from being
//! stored where inches are expected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::FIELD_HALF;

/// A position on the field in inches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldPoint {
    pub x: f64,
    pub y: f64,
}

impl FieldPoint {
    pub const ZERO: FieldPoint = FieldPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the point with both axes clamped onto the field.
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_axis(self.x),
            y: clamp_axis(self.y),
        }
    }

    /// Reflection across the field's X axis (negates Y).
    pub fn mirrored_x(self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
        }
    }

    /// Reflection across the field's Y axis (negates X).
    pub fn mirrored_y(self) -> Self {
        Self {
            x: -self.x,
            y: self.y,
        }
    }

    pub fn distance_to(&self, other: &FieldPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

fn clamp_axis(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-FIELD_HALF, FIELD_HALF)
    }
}

impl fmt::Display for FieldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2} in, {:.2} in)", self.x, self.y)
    }
}

/// A position on the field image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const ZERO: ScreenPoint = ScreenPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &ScreenPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(&self, other: &ScreenPoint, t: f64) -> ScreenPoint {
        ScreenPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1} px, {:.1} px)", self.x, self.y)
    }
}

/// Which flavour of motion command the emitter writes.
///
/// `Basic` emits coordinates only; `Extended` also carries timeout, speed
/// and drive direction, and persists the direction on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitterVariant {
    Basic,
    #[default]
    Extended,
}

impl EmitterVariant {
    /// Whether drive direction is part of this variant.
    pub fn has_direction(&self) -> bool {
        matches!(self, Self::Extended)
    }
}

impl fmt::Display for EmitterVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Extended => write!(f, "extended"),
        }
    }
}

impl std::str::FromStr for EmitterVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" | "simple" => Ok(Self::Basic),
            "extended" | "full" => Ok(Self::Extended),
            _ => Err(format!("Unknown emitter variant: {}", s)),
        }
    }
}
