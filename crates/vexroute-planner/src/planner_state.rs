//! Owned editor state.
//!
//! `PlannerState` ties the transform, the waypoint store, the simulation
//! clock and the code emitter together. A host (GUI or CLI) owns one value
//! and routes pointer input, frame callbacks and file actions through it.

use std::path::Path;

use tracing::{debug, info};
use vexroute_core::constants::{
    DEFAULT_BORDER_PX, DEFAULT_PRECISION, HIT_RADIUS_PX, HOVER_THRESHOLD_PX,
};
use vexroute_core::{
    Direction, EmitterVariant, FieldPoint, ImportError, Result, ScreenPoint, WaypointError,
};

use crate::emitter::{CodeEmitter, EmittedLine};
use crate::guides::{tile_guides, GuideLine};
use crate::heading;
use crate::projector::{hit_test, PathProjection, ProximityProjector};
use crate::sampler::{self, SampledPose};
use crate::serialization;
use crate::simulation::{
    total_duration_ms, FrameScheduler, FrameToken, FrameUpdate, ManualScheduler,
    SimulationClock, StartOutcome,
};
use crate::store::WaypointStore;
use crate::transform::{CoordinateTransform, FieldImage};
use crate::waypoint::{Waypoint, WaypointDefaults, WaypointId};

/// Editor knobs, usually filled from the settings file.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerOptions {
    pub border_px: f64,
    pub variant: EmitterVariant,
    pub precision: u8,
    pub hover_threshold_px: f64,
    pub hit_radius_px: f64,
    pub show_guides: bool,
    pub defaults: WaypointDefaults,
    pub chassis_name: String,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            border_px: DEFAULT_BORDER_PX,
            variant: EmitterVariant::default(),
            precision: DEFAULT_PRECISION,
            hover_threshold_px: HOVER_THRESHOLD_PX,
            hit_radius_px: HIT_RADIUS_PX,
            show_guides: true,
            defaults: WaypointDefaults::default(),
            chassis_name: "chassis".to_string(),
        }
    }
}

/// Everything the route editor knows about the current session.
#[derive(Debug)]
pub struct PlannerState<S: FrameScheduler = ManualScheduler> {
    transform: CoordinateTransform,
    store: WaypointStore,
    clock: SimulationClock<S>,
    emitter: CodeEmitter,
    projector: ProximityProjector,
    hit_radius_px: f64,
    selected: Option<WaypointId>,
    agent_visible: bool,
    show_guides: bool,
}

impl Default for PlannerState<ManualScheduler> {
    fn default() -> Self {
        Self::new(None, PlannerOptions::default(), ManualScheduler::new())
    }
}

impl<S: FrameScheduler> PlannerState<S> {
    pub fn new(image: Option<FieldImage>, options: PlannerOptions, scheduler: S) -> Self {
        Self {
            transform: CoordinateTransform::new(image, options.border_px),
            store: WaypointStore::with_defaults(options.defaults),
            clock: SimulationClock::new(scheduler),
            emitter: CodeEmitter::new(options.variant, options.precision)
                .with_chassis_name(options.chassis_name),
            projector: ProximityProjector::new(options.hover_threshold_px),
            hit_radius_px: options.hit_radius_px,
            selected: None,
            agent_visible: false,
            show_guides: options.show_guides,
        }
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn store(&self) -> &WaypointStore {
        &self.store
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        self.store.waypoints()
    }

    pub fn clock(&self) -> &SimulationClock<S> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock<S> {
        &mut self.clock
    }

    pub fn emitter(&self) -> &CodeEmitter {
        &self.emitter
    }

    pub fn selected(&self) -> Option<WaypointId> {
        self.selected
    }

    pub fn is_agent_visible(&self) -> bool {
        self.agent_visible
    }

    /// Swap the field image and re-sync every cached screen position.
    pub fn set_field_image(&mut self, image: Option<FieldImage>) {
        self.transform.set_image(image);
        self.store.resync(&self.transform);
        debug!(
            ppi = self.transform.pixels_per_inch(),
            "field image changed"
        );
    }

    /// Reads the image header at `path` and uses it as the field image.
    pub fn load_field_image(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let image = FieldImage::from_path(path)?;
        self.set_field_image(Some(image));
        Ok(())
    }

    // ---- route editing ----

    /// Appends a waypoint at a field position and selects it.
    ///
    /// Fails with `WaypointError::IdsExhausted` once the id counter has run
    /// out; the route and selection are left unchanged.
    pub fn place_waypoint(&mut self, field: FieldPoint) -> Result<WaypointId> {
        let id = self.store.push(field, &self.transform)?;
        self.selected = Some(id);
        Ok(id)
    }

    /// Appends a waypoint under a pointer position.
    pub fn place_waypoint_at_screen(&mut self, screen: ScreenPoint) -> Result<WaypointId> {
        let field = self.transform.to_field(screen);
        self.place_waypoint(field)
    }

    pub fn insert_waypoint(&mut self, index: usize, field: FieldPoint) -> Result<WaypointId> {
        let id = self.store.insert(index, field, &self.transform)?;
        self.selected = Some(id);
        Ok(id)
    }

    pub fn move_waypoint(&mut self, id: WaypointId, field: FieldPoint) -> Result<()> {
        self.store.move_to(id, field, &self.transform)?;
        Ok(())
    }

    /// Drag handler: moves a waypoint under the pointer.
    pub fn move_waypoint_to_screen(&mut self, id: WaypointId, screen: ScreenPoint) -> Result<()> {
        let field = self.transform.to_field(screen);
        self.move_waypoint(id, field)
    }

    pub fn set_heading(&mut self, id: WaypointId, degrees: f64) -> Result<()> {
        self.store.set_heading(id, degrees)?;
        Ok(())
    }

    pub fn set_timeout(&mut self, id: WaypointId, timeout_ms: i64) -> Result<()> {
        self.store.set_timeout(id, timeout_ms)?;
        Ok(())
    }

    pub fn set_speed(&mut self, id: WaypointId, speed: i64) -> Result<()> {
        self.store.set_speed(id, speed)?;
        Ok(())
    }

    pub fn set_direction(&mut self, id: WaypointId, direction: Direction) -> Result<()> {
        self.store.set_direction(id, direction)?;
        Ok(())
    }

    /// Deletes a waypoint; a selection pointing at it is cleared.
    pub fn delete_waypoint(&mut self, id: WaypointId) -> Result<Waypoint> {
        let removed = self.store.remove(id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(removed)
    }

    pub fn mirror_x(&mut self) {
        self.store.mirror_x(&self.transform);
    }

    pub fn mirror_y(&mut self) {
        self.store.mirror_y(&self.transform);
    }

    /// Removes every waypoint and stops any running simulation.
    pub fn clear(&mut self) {
        self.clock.reset();
        self.agent_visible = false;
        self.store.clear();
        self.selected = None;
    }

    // ---- selection and pointer queries ----

    /// Selects a waypoint, or clears the selection with `None`.
    pub fn select(&mut self, id: Option<WaypointId>) -> Result<()> {
        if let Some(id) = id {
            if self.store.get(id).is_none() {
                return Err(WaypointError::UnknownId { id }.into());
            }
        }
        self.selected = id;
        Ok(())
    }

    /// Selects the waypoint that produced the given code line.
    ///
    /// Separator lines select nothing and leave the selection unchanged.
    pub fn select_code_line(&mut self, line_index: usize) -> Option<WaypointId> {
        let source = self.code_lines().get(line_index)?.source?;
        let id = self.store.at(source)?.id();
        self.selected = Some(id);
        Some(id)
    }

    /// The waypoint marker under the pointer, if any.
    pub fn waypoint_at(&self, screen: ScreenPoint) -> Option<WaypointId> {
        hit_test(self.store.waypoints(), screen, self.hit_radius_px)
    }

    /// Closest point on the route to the pointer, within the hover threshold.
    pub fn hover(&self, screen: ScreenPoint) -> Option<PathProjection> {
        self.projector.project(self.store.waypoints(), screen)
    }

    // ---- derived outputs ----

    pub fn effective_heading(&self, index: usize) -> Option<f64> {
        heading::effective_heading(self.store.waypoints(), index)
    }

    pub fn effective_headings(&self) -> Vec<f64> {
        heading::effective_headings(self.store.waypoints())
    }

    pub fn total_duration_ms(&self) -> u64 {
        total_duration_ms(self.store.waypoints())
    }

    pub fn total_length_px(&self) -> f64 {
        sampler::total_length(self.store.waypoints())
    }

    /// Simulated robot pose at the clock's progress; `None` while the robot
    /// is hidden or there is no path.
    pub fn agent_pose(&self) -> Option<SampledPose> {
        if !self.agent_visible {
            return None;
        }
        sampler::sample_at(self.store.waypoints(), self.clock.progress())
    }

    pub fn code_lines(&self) -> Vec<EmittedLine> {
        self.emitter.emit(self.store.waypoints())
    }

    pub fn code_text(&self) -> String {
        self.emitter.emit_text(self.store.waypoints())
    }

    /// Tile grid lines, or nothing when guides are switched off.
    pub fn guide_overlay(&self) -> Vec<GuideLine> {
        if self.show_guides {
            tile_guides(&self.transform)
        } else {
            Vec::new()
        }
    }

    pub fn set_show_guides(&mut self, show: bool) {
        self.show_guides = show;
    }

    // ---- simulation ----

    /// Starts (or resumes) the simulation over the route's current duration.
    pub fn start_simulation(&mut self) -> StartOutcome {
        let outcome = self.clock.start(self.total_duration_ms());
        if outcome == StartOutcome::Started {
            self.agent_visible = true;
        }
        outcome
    }

    pub fn stop_simulation(&mut self) -> bool {
        self.clock.stop()
    }

    /// Frame callback from the host.
    pub fn on_frame(&mut self, token: FrameToken, now_ms: f64) -> Option<FrameUpdate> {
        let update = self.clock.on_frame(token, now_ms)?;
        if update.hide_agent {
            self.agent_visible = false;
        }
        Some(update)
    }

    /// Scrubs the idle clock and shows the robot at that progress.
    pub fn seek_simulation(&mut self, progress: f64) {
        if self.clock.is_running() {
            return;
        }
        self.clock.seek(progress);
        self.agent_visible = true;
    }

    // ---- persistence ----

    /// Replaces the route with a JSON payload.
    ///
    /// The payload is fully validated first; on error the current route,
    /// selection and id counter are left as they were.
    pub fn import_json(&mut self, json: &str) -> std::result::Result<usize, ImportError> {
        let waypoints =
            serialization::import_waypoints(json, &self.transform, self.store.defaults())?;
        let count = waypoints.len();
        self.clock.reset();
        self.agent_visible = false;
        self.store.replace_all(waypoints);
        self.selected = None;
        Ok(count)
    }

    pub fn export_json(&self) -> anyhow::Result<String> {
        serialization::export_json(self.store.waypoints(), self.emitter.variant())
    }

    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<usize> {
        let waypoints = serialization::load_from_file(
            path.as_ref(),
            &self.transform,
            self.store.defaults(),
        )?;
        let count = waypoints.len();
        self.clock.reset();
        self.agent_visible = false;
        self.store.replace_all(waypoints);
        self.selected = None;
        info!(path = %path.as_ref().display(), count, "route loaded");
        Ok(count)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        serialization::save_to_file(self.store.waypoints(), self.emitter.variant(), path)
    }
}
