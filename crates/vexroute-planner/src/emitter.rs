//! Motion code generation from a waypoint sequence.
//!
//! Output targets a LemLib-style chassis API. The first waypoint sets the
//! starting pose; each later waypoint turns to face it and then drives to
//! it. Every line remembers which waypoint produced it so the editor can
//! select a waypoint by clicking its code.

use vexroute_core::constants::DEFAULT_PRECISION;
use vexroute_core::{normalize_degrees, round_to, EmitterVariant};

use crate::heading::effective_heading;
use crate::waypoint::Waypoint;

/// One generated line of code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedLine {
    pub text: String,
    /// Index of the waypoint that produced the line; `None` for separators.
    pub source: Option<usize>,
}

impl EmittedLine {
    fn code(text: String, source: usize) -> Self {
        Self {
            text,
            source: Some(source),
        }
    }

    fn separator() -> Self {
        Self {
            text: String::new(),
            source: None,
        }
    }
}

/// Code generator for converting a route to chassis commands.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeEmitter {
    variant: EmitterVariant,
    precision: u8,
    chassis: String,
}

impl Default for CodeEmitter {
    fn default() -> Self {
        Self::new(EmitterVariant::default(), DEFAULT_PRECISION)
    }
}

impl CodeEmitter {
    /// Creates a new generator writing to a chassis object named `chassis`.
    pub fn new(variant: EmitterVariant, precision: u8) -> Self {
        Self {
            variant,
            precision,
            chassis: "chassis".to_string(),
        }
    }

    /// Use a different chassis variable name in generated calls.
    pub fn with_chassis_name(mut self, name: impl Into<String>) -> Self {
        self.chassis = name.into();
        self
    }

    pub fn variant(&self) -> EmitterVariant {
        self.variant
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Generates the lines for a route. Pure: same input, same output.
    pub fn emit(&self, waypoints: &[Waypoint]) -> Vec<EmittedLine> {
        let mut lines = Vec::with_capacity(waypoints.len().saturating_sub(1) * 3 + 1);

        for (index, waypoint) in waypoints.iter().enumerate() {
            let field = waypoint.field();
            let x = self.number(field.x);
            let y = self.number(field.y);

            if index == 0 {
                let heading = effective_heading(waypoints, 0).unwrap_or(waypoint.heading());
                lines.push(EmittedLine::code(
                    format!(
                        "{}.setPose({}, {}, {});",
                        self.chassis,
                        x,
                        y,
                        self.heading(heading)
                    ),
                    index,
                ));
                continue;
            }

            lines.push(EmittedLine::separator());
            match self.variant {
                EmitterVariant::Basic => {
                    lines.push(EmittedLine::code(
                        format!("{}.turnToPoint({}, {});", self.chassis, x, y),
                        index,
                    ));
                    lines.push(EmittedLine::code(
                        format!("{}.moveToPoint({}, {});", self.chassis, x, y),
                        index,
                    ));
                }
                EmitterVariant::Extended => {
                    let params = format!(
                        "{}, {{.forwards = {}, .maxSpeed = {}}}",
                        waypoint.timeout_ms(),
                        waypoint.direction().is_forwards(),
                        waypoint.speed()
                    );
                    lines.push(EmittedLine::code(
                        format!("{}.turnToPoint({}, {}, {});", self.chassis, x, y, params),
                        index,
                    ));
                    lines.push(EmittedLine::code(
                        format!("{}.moveToPoint({}, {}, {});", self.chassis, x, y, params),
                        index,
                    ));
                }
            }
        }

        lines
    }

    /// Generated code as a single newline-separated string.
    pub fn emit_text(&self, waypoints: &[Waypoint]) -> String {
        let mut text = self
            .emit(waypoints)
            .into_iter()
            .map(|line| line.text)
            .collect::<Vec<_>>()
            .join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }

    fn number(&self, value: f64) -> String {
        format!("{}", round_to(value, self.precision))
    }

    // 359.999 rounds up to 360, which is written as 0
    fn heading(&self, degrees: f64) -> String {
        format!("{}", normalize_degrees(round_to(degrees, self.precision)))
    }
}
