//! # VexRoute Core
//!
//! Core types, traits, and utilities for VexRoute.
//! Provides the geometry primitives shared by the planner and the
//! settings crate, the angle helpers, the error taxonomy, and the
//! listener trait the simulation clock publishes through.

pub mod constants;
pub mod error;
pub mod listener;
pub mod types;
pub mod units;

pub use error::{Error, ImportError, Result, WaypointError};

pub use listener::{ListenerHandle, ListenerRegistry, SimulationListener, SimulationState};

pub use types::{EmitterVariant, FieldPoint, ScreenPoint};

pub use units::{
    degrees_to_radians, heading_to_screen_radians, normalize_degrees, radians_to_degrees,
    round_to, Direction,
};
