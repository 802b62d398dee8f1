//! Distance-parameterized path sampling.
//!
//! Progress is a fraction of the total polyline length, not of the number
//! of segments, so the simulated robot moves at a constant screen speed
//! regardless of how the waypoints are spaced.

use vexroute_core::constants::EPSILON;
use vexroute_core::{heading_to_screen_radians, ScreenPoint};

use crate::waypoint::Waypoint;

/// Position and orientation of the robot at some progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPose {
    pub position: ScreenPoint,
    /// Screen-convention angle: radians, 0 = +X, clockwise (image Y is down).
    pub heading_radians: f64,
    /// Index of the segment the pose lies on.
    pub segment_index: usize,
    /// Distance along the path from the first waypoint, in pixels.
    pub distance: f64,
}

/// Segment lengths of a route, computed once and sampled many times.
#[derive(Debug, Clone)]
pub struct PathSampler<'a> {
    waypoints: &'a [Waypoint],
    lengths: Vec<f64>,
    total: f64,
}

impl<'a> PathSampler<'a> {
    /// Returns `None` when there is no path: fewer than two waypoints or
    /// every waypoint on the same spot.
    pub fn new(waypoints: &'a [Waypoint]) -> Option<Self> {
        if waypoints.len() < 2 {
            return None;
        }
        let lengths: Vec<f64> = waypoints
            .windows(2)
            .map(|pair| pair[0].screen().distance_to(&pair[1].screen()))
            .collect();
        let total: f64 = lengths.iter().sum();
        if total <= EPSILON {
            return None;
        }
        Some(Self {
            waypoints,
            lengths,
            total,
        })
    }

    pub fn total_length(&self) -> f64 {
        self.total
    }

    pub fn segment_lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Length of all segments before `segment_index`.
    pub fn length_before(&self, segment_index: usize) -> f64 {
        self.lengths[..segment_index.min(self.lengths.len())]
            .iter()
            .sum()
    }

    /// Pose at `progress` (clamped into `[0, 1]`).
    ///
    /// Walks segments accumulating length until the target distance falls
    /// inside one, then interpolates along it. Zero-length segments are
    /// skipped. At the end of the path the robot sits on the last waypoint
    /// facing its stored heading.
    pub fn sample_at(&self, progress: f64) -> SampledPose {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        if progress >= 1.0 {
            return self.final_pose();
        }

        let target = self.total * progress;
        let mut cumulative = 0.0;
        for (index, &length) in self.lengths.iter().enumerate() {
            if length <= 0.0 {
                continue;
            }
            if cumulative + length >= target {
                let start = self.waypoints[index].screen();
                let end = self.waypoints[index + 1].screen();
                let t = ((target - cumulative) / length).clamp(0.0, 1.0);
                return SampledPose {
                    position: start.lerp(&end, t),
                    heading_radians: (end.y - start.y).atan2(end.x - start.x),
                    segment_index: index,
                    distance: target,
                };
            }
            cumulative += length;
        }

        self.final_pose()
    }

    fn final_pose(&self) -> SampledPose {
        let last = &self.waypoints[self.waypoints.len() - 1];
        SampledPose {
            position: last.screen(),
            heading_radians: heading_to_screen_radians(last.heading()),
            segment_index: self.lengths.len() - 1,
            distance: self.total,
        }
    }
}

/// Pose at `progress`, or `None` when there is no path to sample.
pub fn sample_at(waypoints: &[Waypoint], progress: f64) -> Option<SampledPose> {
    PathSampler::new(waypoints).map(|sampler| sampler.sample_at(progress))
}

/// Total screen length of the route; zero when there is no path.
pub fn total_length(waypoints: &[Waypoint]) -> f64 {
    PathSampler::new(waypoints).map_or(0.0, |sampler| sampler.total_length())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::WaypointStore;
    use crate::transform::CoordinateTransform;
    use std::f64::consts::PI;
    use vexroute_core::FieldPoint;

    fn route(points: &[(f64, f64)]) -> (WaypointStore, CoordinateTransform) {
        // 5 px per inch
        let t = CoordinateTransform::with_image(744.0, 744.0, 12.0);
        let mut store = WaypointStore::new();
        for &(x, y) in points {
            store.push(FieldPoint::new(x, y), &t).unwrap();
        }
        (store, t)
    }

    #[test]
    fn test_no_path_cases() {
        let (store, _) = route(&[]);
        assert!(sample_at(store.waypoints(), 0.5).is_none());
        let (store, _) = route(&[(1.0, 1.0)]);
        assert!(sample_at(store.waypoints(), 0.5).is_none());
        let (store, _) = route(&[(1.0, 1.0), (1.0, 1.0)]);
        assert!(sample_at(store.waypoints(), 0.5).is_none());
        assert_eq!(total_length(store.waypoints()), 0.0);
    }

    #[test]
    fn test_start_is_first_waypoint() {
        let (store, _) = route(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let pose = sample_at(store.waypoints(), 0.0).unwrap();
        assert_eq!(pose.position, store.at(0).unwrap().screen());
        assert_eq!(pose.segment_index, 0);
        assert!(pose.heading_radians.abs() < 1e-12);
    }

    #[test]
    fn test_end_uses_stored_heading() {
        let (mut store, _) = route(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        store.set_heading(2, 180.0).unwrap();
        let pose = sample_at(store.waypoints(), 1.0).unwrap();
        assert_eq!(pose.position, store.at(2).unwrap().screen());
        assert!((pose.heading_radians - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_progress_is_by_distance() {
        // 10 in then 30 in: a quarter of the way is the end of segment 0
        let (store, t) = route(&[(0.0, 0.0), (10.0, 0.0), (10.0, 30.0)]);
        let sampler = PathSampler::new(store.waypoints()).unwrap();
        assert!((sampler.total_length() - 200.0).abs() < 1e-9);

        let pose = sampler.sample_at(0.5);
        let field = t.to_field(pose.position);
        assert!((field.x - 10.0).abs() < 1e-9);
        assert!((field.y - 10.0).abs() < 1e-9);
        assert_eq!(pose.segment_index, 1);
        // heading up the screen
        assert!((pose.heading_radians + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_continuous_at_segment_boundary() {
        let (store, _) = route(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let sampler = PathSampler::new(store.waypoints()).unwrap();
        let before = sampler.sample_at(0.5 - 1e-9).position;
        let after = sampler.sample_at(0.5 + 1e-9).position;
        assert!(before.distance_to(&after) < 1e-3);
    }

    #[test]
    fn test_clamps_out_of_range_progress() {
        let (store, _) = route(&[(0.0, 0.0), (10.0, 0.0)]);
        let sampler = PathSampler::new(store.waypoints()).unwrap();
        assert_eq!(sampler.sample_at(-2.0), sampler.sample_at(0.0));
        assert_eq!(sampler.sample_at(5.0), sampler.sample_at(1.0));
        assert_eq!(sampler.sample_at(f64::NAN), sampler.sample_at(0.0));
    }

    #[test]
    fn test_skips_zero_length_segments() {
        let (store, _) = route(&[(0.0, 0.0), (0.0, 0.0), (10.0, 0.0)]);
        let sampler = PathSampler::new(store.waypoints()).unwrap();
        let pose = sampler.sample_at(0.0);
        assert_eq!(pose.segment_index, 1);
        assert_eq!(pose.position, store.at(0).unwrap().screen());
        assert!(pose.heading_radians.is_finite());
    }

    #[test]
    fn test_monotonic_distance() {
        let (store, _) = route(&[(0.0, 0.0), (20.0, 5.0), (-10.0, 30.0), (40.0, -40.0)]);
        let sampler = PathSampler::new(store.waypoints()).unwrap();
        let mut last = -1.0;
        for step in 0..=200 {
            let pose = sampler.sample_at(step as f64 / 200.0);
            assert!(pose.distance >= last);
            last = pose.distance;
        }
    }
}
