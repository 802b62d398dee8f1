//! Field and editor constants shared across crates.

/// Width (and height) of a VEX competition field in inches.
pub const FIELD_INCHES: f64 = 144.0;

/// Half of the field width; field coordinates span `-FIELD_HALF..=FIELD_HALF`.
pub const FIELD_HALF: f64 = FIELD_INCHES / 2.0;

/// Side length of a single foam field tile in inches.
pub const TILE_INCHES: f64 = 24.0;

/// Pixels of field-image border that sit outside the playable area.
pub const DEFAULT_BORDER_PX: f64 = 12.0;

/// Default field image size when no image metadata is available from disk.
pub const DEFAULT_IMAGE_SIZE_PX: f64 = 720.0;

/// Hover projection gives up beyond this screen distance.
pub const HOVER_THRESHOLD_PX: f64 = 10.0;

/// Radius of a waypoint marker for hit testing.
pub const HIT_RADIUS_PX: f64 = 8.0;

/// Lowest motor speed a waypoint may request.
pub const MIN_SPEED: u8 = 1;

/// Highest motor speed a waypoint may request (V5 motor voltage units).
pub const MAX_SPEED: u8 = 127;

/// Default travel budget for a newly placed waypoint.
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;

/// Default decimal precision for emitted coordinates.
pub const DEFAULT_PRECISION: u8 = 2;

/// Geometric comparisons below this are treated as zero.
pub const EPSILON: f64 = 1e-9;
