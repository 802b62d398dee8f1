//! VexRoute Settings Crate
//!
//! Handles application configuration: the field image, editor knobs,
//! defaults for new waypoints and the headless simulation step.

pub mod config;
pub mod error;

pub use config::{
    Config, EditorSettings, FieldSettings, SimulationSettings, WaypointDefaultSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
