//! Effective heading resolution.
//!
//! Every waypoint except the last faces its successor; the heading is
//! derived from the screen-space vector between them. The last waypoint has
//! no successor, so its stored heading is used as-is.

use vexroute_core::{normalize_degrees, radians_to_degrees, ScreenPoint};

use crate::waypoint::Waypoint;

/// Field heading (degrees, 0 = up, clockwise) of the vector `from -> to`.
///
/// ```text
/// heading = normalize(degrees(atan2(dy, dx)) + 90)
/// ```
pub fn segment_heading(from: &ScreenPoint, to: &ScreenPoint) -> f64 {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    normalize_degrees(radians_to_degrees(angle) + 90.0)
}

/// Effective heading of the waypoint at `index`, or `None` past the end.
pub fn effective_heading(waypoints: &[Waypoint], index: usize) -> Option<f64> {
    let current = waypoints.get(index)?;
    match waypoints.get(index + 1) {
        Some(next) => Some(segment_heading(&current.screen(), &next.screen())),
        None => Some(current.heading()),
    }
}

/// Effective headings for the whole sequence, in order.
pub fn effective_headings(waypoints: &[Waypoint]) -> Vec<f64> {
    (0..waypoints.len())
        .filter_map(|i| effective_heading(waypoints, i))
        .collect()
}
