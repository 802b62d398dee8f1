//! Waypoint model.
//!
//! A waypoint keeps its field position authoritative and caches the matching
//! screen position. The cache is only ever written together with the field
//! position, through a [`CoordinateTransform`], so the two never drift.

use vexroute_core::constants::{DEFAULT_TIMEOUT_MS, MAX_SPEED, MIN_SPEED};
use vexroute_core::{normalize_degrees, Direction, FieldPoint, ScreenPoint};

use crate::transform::CoordinateTransform;

/// Identifier assigned by the store; never reused within a session.
pub type WaypointId = u32;

/// Values given to a freshly placed waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointDefaults {
    pub heading: f64,
    pub timeout_ms: u32,
    pub speed: u8,
    pub direction: Direction,
}

impl Default for WaypointDefaults {
    fn default() -> Self {
        Self {
            heading: 0.0,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            speed: MAX_SPEED,
            direction: Direction::Forwards,
        }
    }
}

/// One stop or pass-through point on the route.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    id: WaypointId,
    field: FieldPoint,
    screen: ScreenPoint,
    heading: f64,
    timeout_ms: u32,
    speed: u8,
    direction: Direction,
}

impl Waypoint {
    /// Creates a waypoint; the position is clamped onto the field.
    pub fn new(
        id: WaypointId,
        field: FieldPoint,
        transform: &CoordinateTransform,
        defaults: &WaypointDefaults,
    ) -> Self {
        let field = field.clamped();
        Self {
            id,
            field,
            screen: transform.to_screen(field),
            heading: normalize_degrees(defaults.heading),
            timeout_ms: defaults.timeout_ms,
            speed: clamp_speed(i64::from(defaults.speed)),
            direction: defaults.direction,
        }
    }

    pub fn id(&self) -> WaypointId {
        self.id
    }

    pub fn field(&self) -> FieldPoint {
        self.field
    }

    pub fn screen(&self) -> ScreenPoint {
        self.screen
    }

    /// Stored heading in degrees; only authoritative for the last waypoint.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn set_field(&mut self, field: FieldPoint, transform: &CoordinateTransform) {
        self.field = field.clamped();
        self.screen = transform.to_screen(self.field);
    }

    pub(crate) fn resync(&mut self, transform: &CoordinateTransform) {
        self.screen = transform.to_screen(self.field);
    }

    pub(crate) fn set_heading(&mut self, degrees: f64) {
        self.heading = normalize_degrees(degrees);
    }

    pub(crate) fn set_timeout(&mut self, timeout_ms: i64) {
        self.timeout_ms = clamp_timeout(timeout_ms);
    }

    pub(crate) fn set_speed(&mut self, speed: i64) {
        self.speed = clamp_speed(speed);
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Builder-style heading override, normalized into `[0, 360)`.
    pub fn with_heading(mut self, degrees: f64) -> Self {
        self.set_heading(degrees);
        self
    }

    /// Builder-style timeout override; negative values clamp to zero.
    pub fn with_timeout(mut self, timeout_ms: i64) -> Self {
        self.set_timeout(timeout_ms);
        self
    }

    /// Builder-style speed override, clamped into `[1, 127]`.
    pub fn with_speed(mut self, speed: i64) -> Self {
        self.set_speed(speed);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

pub(crate) fn clamp_speed(speed: i64) -> u8 {
    // both bounds fit in u8
    speed.clamp(i64::from(MIN_SPEED), i64::from(MAX_SPEED)) as u8
}

pub(crate) fn clamp_timeout(timeout_ms: i64) -> u32 {
    timeout_ms.clamp(0, i64::from(u32::MAX)) as u32
}
