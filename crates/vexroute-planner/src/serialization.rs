//! Route import and export.
//!
//! A route file is a JSON array of waypoint records:
//!
//! ```json
//! [
//!   { "id": 0, "x": -60.0, "y": -36.0, "heading": 90.0, "timeout": 1000, "speed": 127 },
//!   { "id": 1, "x": -24.0, "y": -36.0, "heading": 0.0, "timeout": 1500, "speed": 90, "direction": "backwards" }
//! ]
//! ```
//!
//! Import validates the whole payload before anything is replaced, so a
//! rejected file leaves the current route untouched.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use vexroute_core::{Direction, EmitterVariant, FieldPoint, ImportError};

use crate::transform::CoordinateTransform;
use crate::waypoint::{Waypoint, WaypointDefaults, WaypointId};

/// Serialized waypoint record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointRecord {
    pub id: WaypointId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub heading: f64,
    #[serde(default = "default_timeout")]
    pub timeout: i64,
    #[serde(default = "default_speed")]
    pub speed: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

fn default_timeout() -> i64 {
    i64::from(WaypointDefaults::default().timeout_ms)
}

fn default_speed() -> i64 {
    i64::from(WaypointDefaults::default().speed)
}

impl WaypointRecord {
    /// Record for a waypoint; direction is only kept when `variant` has one.
    pub fn from_waypoint(waypoint: &Waypoint, variant: EmitterVariant) -> Self {
        let field = waypoint.field();
        Self {
            id: waypoint.id(),
            x: field.x,
            y: field.y,
            heading: waypoint.heading(),
            timeout: i64::from(waypoint.timeout_ms()),
            speed: i64::from(waypoint.speed()),
            direction: variant.has_direction().then(|| waypoint.direction()),
        }
    }

    /// Builds the waypoint, clamping every out-of-range value.
    pub fn to_waypoint(
        &self,
        transform: &CoordinateTransform,
        defaults: &WaypointDefaults,
    ) -> Waypoint {
        Waypoint::new(self.id, FieldPoint::new(self.x, self.y), transform, defaults)
            .with_heading(self.heading)
            .with_timeout(self.timeout)
            .with_speed(self.speed)
            .with_direction(self.direction.unwrap_or(defaults.direction))
    }
}

/// Parses and validates a route payload.
///
/// Rejects malformed JSON, a root that is not an array, repeated ids, and
/// `WaypointId::MAX`, which would leave the id counter no successor.
pub fn parse_records(json: &str) -> std::result::Result<Vec<WaypointRecord>, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(ImportError::NotASequence {
            found: json_type_name(&value).to_string(),
        });
    }
    let records: Vec<WaypointRecord> = serde_json::from_value(value)?;

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if record.id == WaypointId::MAX {
            return Err(ImportError::IdOutOfRange { id: record.id });
        }
        if !seen.insert(record.id) {
            return Err(ImportError::DuplicateId { id: record.id });
        }
    }
    Ok(records)
}

/// Parses a payload straight into waypoints.
pub fn import_waypoints(
    json: &str,
    transform: &CoordinateTransform,
    defaults: &WaypointDefaults,
) -> std::result::Result<Vec<Waypoint>, ImportError> {
    let records = parse_records(json).inspect_err(|e| warn!("route import rejected: {}", e))?;
    info!(count = records.len(), "route imported");
    Ok(records
        .iter()
        .map(|r| r.to_waypoint(transform, defaults))
        .collect())
}

/// Serializes waypoints as a pretty-printed JSON array.
pub fn export_json(waypoints: &[Waypoint], variant: EmitterVariant) -> Result<String> {
    let records: Vec<WaypointRecord> = waypoints
        .iter()
        .map(|w| WaypointRecord::from_waypoint(w, variant))
        .collect();
    serde_json::to_string_pretty(&records).context("Failed to serialize route")
}

/// Save a route to file
pub fn save_to_file(
    waypoints: &[Waypoint],
    variant: EmitterVariant,
    path: impl AsRef<Path>,
) -> Result<()> {
    let json = export_json(waypoints, variant)?;
    std::fs::write(path.as_ref(), json).context("Failed to write route file")?;
    info!(path = %path.as_ref().display(), count = waypoints.len(), "route saved");
    Ok(())
}

/// Load a route from file
pub fn load_from_file(
    path: impl AsRef<Path>,
    transform: &CoordinateTransform,
    defaults: &WaypointDefaults,
) -> Result<Vec<Waypoint>> {
    let content =
        std::fs::read_to_string(path.as_ref()).context("Failed to read route file")?;
    let waypoints =
        import_waypoints(&content, transform, defaults).context("Failed to parse route file")?;
    Ok(waypoints)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> CoordinateTransform {
        CoordinateTransform::with_image(744.0, 744.0, 12.0)
    }

    #[test]
    fn test_parse_minimal_records_uses_defaults() {
        let records = parse_records(r#"[{"id": 3, "x": 1.5, "y": -2}]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timeout, 1000);
        assert_eq!(records[0].speed, 127);
        assert_eq!(records[0].direction, None);
    }

    #[test]
    fn test_non_array_root_is_rejected() {
        let err = parse_records(r#"{"id": 0, "x": 0, "y": 0}"#).unwrap_err();
        assert!(matches!(err, ImportError::NotASequence { ref found } if found == "object"));

        let err = parse_records("42").unwrap_err();
        assert!(matches!(err, ImportError::NotASequence { ref found } if found == "number"));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            parse_records("[{"),
            Err(ImportError::Malformed(_))
        ));
        assert!(matches!(
            parse_records(r#"[{"id": "a", "x": 0, "y": 0}]"#),
            Err(ImportError::Malformed(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let err = parse_records(r#"[{"id": 1, "x": 0, "y": 0}, {"id": 1, "x": 5, "y": 5}]"#)
            .unwrap_err();
        assert!(matches!(err, ImportError::DuplicateId { id: 1 }));
    }

    #[test]
    fn test_last_id_is_rejected() {
        let json = r#"[{"id": 0, "x": 0, "y": 0}, {"id": 4294967295, "x": 0, "y": 0}]"#;
        let err = parse_records(json).unwrap_err();
        assert!(matches!(err, ImportError::IdOutOfRange { id: u32::MAX }));

        let records = parse_records(r#"[{"id": 4294967294, "x": 0, "y": 0}]"#).unwrap();
        assert_eq!(records[0].id, u32::MAX - 1);
    }

    #[test]
    fn test_import_clamps_values() {
        let json = r#"[{"id": 0, "x": 100, "y": -80, "heading": -90, "timeout": -5, "speed": 900}]"#;
        let waypoints = import_waypoints(json, &transform(), &WaypointDefaults::default()).unwrap();
        let wp = &waypoints[0];
        assert_eq!(wp.field(), FieldPoint::new(72.0, -72.0));
        assert_eq!(wp.heading(), 270.0);
        assert_eq!(wp.timeout_ms(), 0);
        assert_eq!(wp.speed(), 127);
    }

    #[test]
    fn test_basic_export_omits_direction() {
        let t = transform();
        let defaults = WaypointDefaults::default();
        let waypoints = vec![Waypoint::new(0, FieldPoint::new(1.0, 2.0), &t, &defaults)
            .with_direction(Direction::Backwards)];

        let basic = export_json(&waypoints, EmitterVariant::Basic).unwrap();
        assert!(!basic.contains("direction"));

        let extended = export_json(&waypoints, EmitterVariant::Extended).unwrap();
        assert!(extended.contains(r#""direction": "backwards""#));
    }

    #[test]
    fn test_file_round_trip() {
        let t = transform();
        let defaults = WaypointDefaults::default();
        let waypoints = vec![
            Waypoint::new(2, FieldPoint::new(-60.0, -36.0), &t, &defaults).with_heading(90.0),
            Waypoint::new(5, FieldPoint::new(-24.0, -36.0), &t, &defaults)
                .with_timeout(1500)
                .with_speed(90)
                .with_direction(Direction::Backwards),
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.json");
        save_to_file(&waypoints, EmitterVariant::Extended, &path).unwrap();
        let loaded = load_from_file(&path, &t, &defaults).unwrap();
        assert_eq!(loaded, waypoints);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_from_file(
            "/nonexistent/route.json",
            &transform(),
            &WaypointDefaults::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read route file"));
    }
}
