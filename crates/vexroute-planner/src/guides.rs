//! Field tile grid overlay.
//!
//! A VEX field is a 6x6 grid of 24 inch foam tiles. The editor draws the
//! seams as guide lines so waypoints can be lined up by eye.

use std::fmt;

use vexroute_core::constants::{FIELD_HALF, TILE_INCHES};
use vexroute_core::{FieldPoint, ScreenPoint};

use crate::transform::CoordinateTransform;

/// Finest supported grid; anything denser is not drawn.
pub const MIN_GUIDE_SPACING_INCHES: f64 = 1.0;

/// Orientation of a guide line on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAxis {
    /// Constant field X
    Vertical,
    /// Constant field Y
    Horizontal,
}

/// One guide line in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub start: ScreenPoint,
    pub end: ScreenPoint,
    /// The field coordinate the line sits on, in inches.
    pub field_coordinate: f64,
    pub axis: GuideAxis,
}

impl GuideLine {
    /// Axis label drawn next to the line, e.g. `x=-24` or `y=48`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GuideLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = match self.axis {
            GuideAxis::Vertical => "x",
            GuideAxis::Horizontal => "y",
        };
        write!(f, "{}={}", axis, self.field_coordinate)
    }
}

/// Grid lines every `spacing_inches` from edge to edge, both axes.
///
/// Empty without an image (every point would map to the origin) or with a
/// spacing below [`MIN_GUIDE_SPACING_INCHES`].
pub fn guide_lines(transform: &CoordinateTransform, spacing_inches: f64) -> Vec<GuideLine> {
    if !transform.has_image() || !(spacing_inches >= MIN_GUIDE_SPACING_INCHES) {
        return Vec::new();
    }

    let steps = (2.0 * FIELD_HALF / spacing_inches).floor() as usize;
    let mut lines = Vec::with_capacity((steps + 1) * 2);
    for step in 0..=steps {
        let coordinate = -FIELD_HALF + step as f64 * spacing_inches;
        lines.push(GuideLine {
            start: transform.to_screen(FieldPoint::new(coordinate, FIELD_HALF)),
            end: transform.to_screen(FieldPoint::new(coordinate, -FIELD_HALF)),
            field_coordinate: coordinate,
            axis: GuideAxis::Vertical,
        });
    }
    for step in 0..=steps {
        let coordinate = -FIELD_HALF + step as f64 * spacing_inches;
        lines.push(GuideLine {
            start: transform.to_screen(FieldPoint::new(-FIELD_HALF, coordinate)),
            end: transform.to_screen(FieldPoint::new(FIELD_HALF, coordinate)),
            field_coordinate: coordinate,
            axis: GuideAxis::Horizontal,
        });
    }
    lines
}

/// [`guide_lines`] on tile seams.
pub fn tile_guides(transform: &CoordinateTransform) -> Vec<GuideLine> {
    guide_lines(transform, TILE_INCHES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_grid_has_seven_lines_per_axis() {
        let t = CoordinateTransform::with_image(744.0, 744.0, 12.0);
        let lines = tile_guides(&t);
        assert_eq!(lines.len(), 14);

        let vertical: Vec<_> = lines
            .iter()
            .filter(|l| l.axis == GuideAxis::Vertical)
            .map(|l| l.field_coordinate)
            .collect();
        assert_eq!(vertical, vec![-72.0, -48.0, -24.0, 0.0, 24.0, 48.0, 72.0]);
    }

    #[test]
    fn test_lines_span_the_field_inset() {
        let t = CoordinateTransform::with_image(744.0, 744.0, 12.0);
        let lines = tile_guides(&t);
        let first = lines[0];
        assert_eq!(first.start, ScreenPoint::new(12.0, 12.0));
        assert_eq!(first.end, ScreenPoint::new(12.0, 732.0));

        let centre = lines
            .iter()
            .find(|l| l.axis == GuideAxis::Horizontal && l.field_coordinate == 0.0)
            .unwrap();
        assert_eq!(centre.start.y, 372.0);
        assert_eq!(centre.label(), "y=0");
    }

    #[test]
    fn test_no_image_or_bad_spacing_is_empty() {
        assert!(tile_guides(&CoordinateTransform::default()).is_empty());
        let t = CoordinateTransform::with_image(744.0, 744.0, 12.0);
        assert!(guide_lines(&t, 0.0).is_empty());
        assert!(guide_lines(&t, f64::NAN).is_empty());
        assert!(guide_lines(&t, 1e-300).is_empty());
        assert!(guide_lines(&t, 0.5).is_empty());
    }

    #[test]
    fn test_finest_spacing_is_bounded() {
        let t = CoordinateTransform::with_image(744.0, 744.0, 12.0);
        let lines = guide_lines(&t, MIN_GUIDE_SPACING_INCHES);
        assert_eq!(lines.len(), 2 * 145);
        assert_eq!(lines[144].field_coordinate, 72.0);
    }
}
