//! Nearest-point queries against the route.
//!
//! Used for hover feedback (which point on the path is under the cursor,
//! and how far along the route it is) and for picking waypoint markers.

use vexroute_core::constants::{HIT_RADIUS_PX, HOVER_THRESHOLD_PX};
use vexroute_core::ScreenPoint;

use crate::sampler::PathSampler;
use crate::waypoint::{Waypoint, WaypointId};

/// Closest point on the route to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathProjection {
    /// Foot of the perpendicular on the winning segment.
    pub point: ScreenPoint,
    /// Fraction of the total route length at `point`.
    pub progress: f64,
    /// Distance from the query to `point`, in pixels.
    pub distance: f64,
    pub segment_index: usize,
}

/// Projects screen points onto the route polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityProjector {
    threshold_px: f64,
}

impl Default for ProximityProjector {
    fn default() -> Self {
        Self::new(HOVER_THRESHOLD_PX)
    }
}

impl ProximityProjector {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px: threshold_px.max(0.0),
        }
    }

    pub fn threshold_px(&self) -> f64 {
        self.threshold_px
    }

    /// Closest point on any segment, or `None` when there is no path or the
    /// closest point is farther than the threshold.
    ///
    /// Segments are scanned in order and only a strictly smaller distance
    /// replaces the current best, so the earliest segment wins a tie.
    pub fn project(&self, waypoints: &[Waypoint], query: ScreenPoint) -> Option<PathProjection> {
        let sampler = PathSampler::new(waypoints)?;

        let mut best: Option<(usize, f64, ScreenPoint, f64)> = None;
        for (index, pair) in waypoints.windows(2).enumerate() {
            let (t, foot) = project_onto_segment(&pair[0].screen(), &pair[1].screen(), &query);
            let distance = query.distance_to(&foot);
            if best.map_or(true, |(_, _, _, best_distance)| distance < best_distance) {
                best = Some((index, t, foot, distance));
            }
        }

        let (index, t, foot, distance) = best?;
        if distance > self.threshold_px {
            return None;
        }

        let along = sampler.length_before(index) + t * sampler.segment_lengths()[index];
        Some(PathProjection {
            point: foot,
            progress: (along / sampler.total_length()).clamp(0.0, 1.0),
            distance,
            segment_index: index,
        })
    }
}

/// Perpendicular-foot parameter `t` in `[0, 1]` and the foot point.
///
/// ```text
/// t = clamp(dot(q - a, b - a) / |b - a|^2, 0, 1)
/// ```
fn project_onto_segment(a: &ScreenPoint, b: &ScreenPoint, q: &ScreenPoint) -> (f64, ScreenPoint) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq <= 0.0 {
        return (0.0, *a);
    }
    let t = (((q.x - a.x) * dx + (q.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    (t, a.lerp(b, t))
}

/// The waypoint whose marker is nearest `query` within `radius_px`.
pub fn hit_test(waypoints: &[Waypoint], query: ScreenPoint, radius_px: f64) -> Option<WaypointId> {
    let mut best: Option<(WaypointId, f64)> = None;
    for waypoint in waypoints {
        let distance = waypoint.screen().distance_to(&query);
        if distance <= radius_px && best.map_or(true, |(_, d)| distance < d) {
            best = Some((waypoint.id(), distance));
        }
    }
    best.map(|(id, _)| id)
}

/// [`hit_test`] with the default marker radius.
pub fn hit_test_default(waypoints: &[Waypoint], query: ScreenPoint) -> Option<WaypointId> {
    hit_test(waypoints, query, HIT_RADIUS_PX)
}
