//! # VexRoute Planner
//!
//! Route geometry and simulation engine for VexRoute.
//! Includes the field coordinate transform, waypoint store, heading
//! resolver, path sampler, proximity projector, simulation clock, code
//! emitter, route import/export and the tile guide overlay.

pub mod emitter;
pub mod guides;
pub mod heading;
pub mod planner_state;
pub mod projector;
pub mod sampler;
pub mod serialization;
pub mod simulation;
pub mod store;
pub mod transform;
pub mod waypoint;

pub use emitter::{CodeEmitter, EmittedLine};
pub use guides::{guide_lines, tile_guides, GuideAxis, GuideLine};
pub use heading::{effective_heading, effective_headings, segment_heading};
pub use planner_state::{PlannerOptions, PlannerState};
pub use projector::{hit_test, hit_test_default, PathProjection, ProximityProjector};
pub use sampler::{sample_at, total_length, PathSampler, SampledPose};
pub use serialization::{export_json, import_waypoints, parse_records, WaypointRecord};
pub use simulation::{
    total_duration_ms, FrameScheduler, FrameToken, FrameUpdate, ManualScheduler,
    SimulationClock, StartOutcome,
};
pub use store::WaypointStore;
pub use transform::{CoordinateTransform, FieldImage};
pub use waypoint::{Waypoint, WaypointDefaults, WaypointId};
