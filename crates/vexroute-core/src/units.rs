//! Angle and rounding utilities
//!
//! Headings are expressed in the field convention: degrees, 0 = up (north),
//! 90 = right (east), increasing clockwise. Screen angles follow `atan2` on
//! image coordinates: radians, 0 = right, increasing clockwise because the
//! image Y axis points down.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Drive direction for a motion command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Drive with the front of the robot leading
    Forwards,
    /// Drive with the back of the robot leading
    Backwards,
}

impl Default for Direction {
    fn default() -> Self {
        Self::Forwards
    }
}

impl Direction {
    /// Whether this is the forwards direction.
    pub fn is_forwards(&self) -> bool {
        matches!(self, Self::Forwards)
    }

    /// Returns the opposite direction.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Forwards => Self::Backwards,
            Self::Backwards => Self::Forwards,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forwards => write!(f, "forwards"),
            Self::Backwards => write!(f, "backwards"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forwards" | "forward" | "fwd" | "true" => Ok(Self::Forwards),
            "backwards" | "backward" | "rev" | "false" => Ok(Self::Backwards),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
///
/// Equivalent to repeatedly adding or subtracting 360 until the value is in
/// range: `-360` and `360` both map to `0`. The guard after the Euclidean
/// remainder catches tiny negative inputs that would otherwise round up to
/// exactly `360.0`. Non-finite input maps to `0`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        // adding +0.0 turns a -0.0 into 0.0
        wrapped + 0.0
    }
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Convert a field heading (degrees, 0 = up) to a screen angle in radians
/// (0 = +X on the image).
pub fn heading_to_screen_radians(heading_degrees: f64) -> f64 {
    (heading_degrees - 90.0) * PI / 180.0
}

/// Round to a fixed number of decimals, never producing negative zero.
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(i32::from(decimals));
    (value * factor).round() / factor + 0.0
}
