//! Configuration and settings management for VexRoute
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Field image (path or explicit size, border inset)
//! - Editor preferences (emitter variant, precision, pointer radii, guides)
//! - Defaults for newly placed waypoints
//! - Headless simulation stepping

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use vexroute_core::constants::{
    DEFAULT_BORDER_PX, DEFAULT_IMAGE_SIZE_PX, DEFAULT_PRECISION, DEFAULT_TIMEOUT_MS,
    HIT_RADIUS_PX, HOVER_THRESHOLD_PX, MAX_SPEED, MIN_SPEED,
};
use vexroute_core::{Direction, EmitterVariant};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Directory name under the platform config directory.
const APP_DIR: &str = "vexroute";

/// Default configuration file name.
const CONFIG_FILE: &str = "config.toml";

/// Largest supported decimal precision for emitted numbers.
pub const MAX_PRECISION: u8 = 6;

/// Field image settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Background image; its header gives the size when set
    pub image_path: Option<PathBuf>,
    /// Image width in pixels, used when no image path is set
    pub image_width: f64,
    /// Image height in pixels, used when no image path is set
    pub image_height: f64,
    /// Pixels of border around the playable field
    pub border_px: f64,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            image_path: None,
            image_width: DEFAULT_IMAGE_SIZE_PX,
            image_height: DEFAULT_IMAGE_SIZE_PX,
            border_px: DEFAULT_BORDER_PX,
        }
    }
}

/// Editor preference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Which flavour of motion code to emit
    pub variant: EmitterVariant,
    /// Decimal places for emitted coordinates and headings
    pub precision: u8,
    /// Hover snapping distance in pixels
    pub hover_threshold_px: f64,
    /// Waypoint marker pick radius in pixels
    pub hit_radius_px: f64,
    /// Draw the tile grid
    pub show_guides: bool,
    /// Variable name of the chassis in generated code
    pub chassis_name: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            variant: EmitterVariant::default(),
            precision: DEFAULT_PRECISION,
            hover_threshold_px: HOVER_THRESHOLD_PX,
            hit_radius_px: HIT_RADIUS_PX,
            show_guides: true,
            chassis_name: "chassis".to_string(),
        }
    }
}

/// Values for newly placed waypoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointDefaultSettings {
    pub heading: f64,
    pub timeout_ms: u32,
    pub speed: u8,
    pub direction: Direction,
}

impl Default for WaypointDefaultSettings {
    fn default() -> Self {
        Self {
            heading: 0.0,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            speed: MAX_SPEED,
            direction: Direction::default(),
        }
    }
}

/// Headless simulation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Simulated time between frames
    pub frame_interval_ms: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 1000.0 / 60.0,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Field image settings
    pub field: FieldSettings,
    /// Editor preferences
    pub editor: EditorSettings,
    /// New waypoint defaults
    pub waypoint_defaults: WaypointDefaultSettings,
    /// Simulation settings
    pub simulation: SimulationSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config directory for VexRoute
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no config or home directory".to_string())
            })
    }

    /// Default config file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load the default config file, or defaults when it does not exist yet
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    ///
    /// Missing parent directories are created.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = Format::from_path(path)?;

        let content = match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        info!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        // Validate field settings
        let field = &self.field;
        if field.image_path.is_none() {
            if !(field.image_width > 0.0) {
                return Err(ConfigError::out_of_range("field.image_width", field.image_width));
            }
            if !(field.image_height > 0.0) {
                return Err(ConfigError::out_of_range(
                    "field.image_height",
                    field.image_height,
                ));
            }
        }
        if !(field.border_px >= 0.0) {
            return Err(ConfigError::out_of_range("field.border_px", field.border_px));
        }
        if field.image_path.is_none() && 2.0 * field.border_px >= field.image_width {
            return Err(ConfigError::InvalidSetting {
                key: "field.border_px".to_string(),
                reason: "border leaves no room for the field".to_string(),
            });
        }

        // Validate editor settings
        let editor = &self.editor;
        if editor.precision > MAX_PRECISION {
            return Err(ConfigError::out_of_range("editor.precision", editor.precision));
        }
        if !(editor.hover_threshold_px > 0.0) {
            return Err(ConfigError::out_of_range(
                "editor.hover_threshold_px",
                editor.hover_threshold_px,
            ));
        }
        if !(editor.hit_radius_px > 0.0) {
            return Err(ConfigError::out_of_range(
                "editor.hit_radius_px",
                editor.hit_radius_px,
            ));
        }
        if !is_identifier(&editor.chassis_name) {
            return Err(ConfigError::InvalidSetting {
                key: "editor.chassis_name".to_string(),
                reason: format!("'{}' is not a valid identifier", editor.chassis_name),
            });
        }

        // Validate waypoint defaults
        let defaults = &self.waypoint_defaults;
        if !defaults.heading.is_finite() {
            return Err(ConfigError::out_of_range(
                "waypoint_defaults.heading",
                defaults.heading,
            ));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&defaults.speed) {
            return Err(ConfigError::out_of_range(
                "waypoint_defaults.speed",
                defaults.speed,
            ));
        }

        // Validate simulation settings
        if !(self.simulation.frame_interval_ms > 0.0) {
            return Err(ConfigError::out_of_range(
                "simulation.frame_interval_ms",
                self.simulation.frame_interval_ms,
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}
