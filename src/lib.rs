//! # VexRoute
//!
//! A route planner for VEX robots:
//! - Place, drag and tune waypoints on a top-down field image
//! - Preview the route with a frame-driven simulation
//! - Generate LemLib-style motion code from the route
//!
//! ## Architecture
//!
//! VexRoute is organized as a workspace with multiple crates:
//!
//! 1. **vexroute-core** - Geometry primitives, angle helpers, errors, listener trait
//! 2. **vexroute-planner** - Transform, waypoint store, sampler, projector, clock, emitter
//! 3. **vexroute-settings** - Configuration persistence and validation
//! 4. **vexroute** - Library facade and the headless command line tool

use anyhow::Context;

pub use vexroute_core::constants;
pub use vexroute_planner as planner;

pub use vexroute_core::{
    Direction, EmitterVariant, Error, FieldPoint, ImportError, ListenerHandle, Result,
    ScreenPoint, SimulationListener, SimulationState, WaypointError,
};

pub use vexroute_planner::{
    CodeEmitter, CoordinateTransform, EmittedLine, FieldImage, FrameScheduler, FrameToken,
    FrameUpdate, GuideLine, ManualScheduler, PathProjection, PlannerOptions, PlannerState,
    ProximityProjector, SampledPose, SimulationClock, StartOutcome, Waypoint, WaypointDefaults,
    WaypointId, WaypointStore,
};

pub use vexroute_settings::{
    Config, EditorSettings, FieldSettings, SettingsError, SimulationSettings,
    WaypointDefaultSettings,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, so generated code on stdout stays clean
/// - RUST_LOG environment variable support (INFO when unset)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}

/// Initialize logging as one JSON object per line on stderr
pub fn init_json_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_current_span(false);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Planner knobs taken from a config
pub fn planner_options(config: &Config) -> PlannerOptions {
    let defaults = &config.waypoint_defaults;
    PlannerOptions {
        border_px: config.field.border_px,
        variant: config.editor.variant,
        precision: config.editor.precision,
        hover_threshold_px: config.editor.hover_threshold_px,
        hit_radius_px: config.editor.hit_radius_px,
        show_guides: config.editor.show_guides,
        defaults: WaypointDefaults {
            heading: defaults.heading,
            timeout_ms: defaults.timeout_ms,
            speed: defaults.speed,
            direction: defaults.direction,
        },
        chassis_name: config.editor.chassis_name.clone(),
    }
}

/// Field image metadata: read from the configured image, or the explicit size
pub fn field_image(config: &Config) -> anyhow::Result<FieldImage> {
    match &config.field.image_path {
        Some(path) => FieldImage::from_path(path),
        None => Ok(FieldImage::new(
            config.field.image_width,
            config.field.image_height,
        )),
    }
}

/// A planner set up from a config, using the manual frame scheduler
pub fn planner_from_config(config: &Config) -> anyhow::Result<PlannerState> {
    let image = field_image(config)?;
    Ok(PlannerState::new(
        Some(image),
        planner_options(config),
        ManualScheduler::new(),
    ))
}

/// Field-space view of a sampled pose: inches and heading degrees
pub fn pose_on_field(transform: &CoordinateTransform, pose: &SampledPose) -> (FieldPoint, f64) {
    let field = transform.to_field(pose.position);
    let heading = vexroute_core::normalize_degrees(
        vexroute_core::radians_to_degrees(pose.heading_radians) + 90.0,
    );
    (field, heading)
}
