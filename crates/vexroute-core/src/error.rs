//! Error handling for VexRoute
//!
//! Degenerate geometry (an empty route, a zero-length path) is never an
//! error here; those cases produce `None` or zero from the planner. The
//! error types below cover the operations that can genuinely be refused:
//! - Import errors (a payload that is not a waypoint sequence)
//! - Waypoint errors (an edit addressed to a waypoint that does not exist,
//!   or a placement once the id counter has run out)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Import error type
///
/// Raised when a waypoint payload is rejected. The store is never touched
/// when one of these is returned.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The payload is not valid JSON or a record is malformed
    #[error("Malformed route data: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The payload parsed, but the root is not a sequence of waypoints
    #[error("Expected a sequence of waypoints, found {found}")]
    NotASequence {
        /// The JSON type that was found instead.
        found: String,
    },

    /// Two records share an id
    #[error("Duplicate waypoint id {id}")]
    DuplicateId {
        /// The repeated id.
        id: u32,
    },

    /// A record uses the last id, leaving none for new waypoints
    #[error("Waypoint id {id} leaves no room for new ids")]
    IdOutOfRange {
        /// The offending id.
        id: u32,
    },
}

/// Waypoint error type
///
/// Raised when an edit refers to a waypoint the store does not hold, or
/// when no id is left for a new one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaypointError {
    /// No waypoint has this id
    #[error("Unknown waypoint id {id}")]
    UnknownId {
        /// The requested id.
        id: u32,
    },

    /// Index past the end of the sequence
    #[error("Waypoint index {index} out of range for {len} waypoints")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The current number of waypoints.
        len: usize,
    },

    /// The id counter has no values left
    #[error("No waypoint ids left to allocate")]
    IdsExhausted,
}

/// Main error type for VexRoute
#[derive(Error, Debug)]
pub enum Error {
    /// Import error
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Waypoint error
    #[error(transparent)]
    Waypoint(#[from] WaypointError),
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
