//! Coordinate transformation between the field and the field image.
//!
//! Handles conversion between field coordinates (inches, origin at the
//! field center, +Y away from the driver) and pixel coordinates on the
//! background image (origin top-left, +Y down). The playable field is
//! inset from the image edge by a constant border.

use std::path::Path;

use anyhow::{Context, Result};
use vexroute_core::constants::{DEFAULT_BORDER_PX, FIELD_INCHES};
use vexroute_core::{FieldPoint, ScreenPoint};

/// Pixel dimensions of the field image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldImage {
    pub width: f64,
    pub height: f64,
}

impl FieldImage {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Reads the dimensions from an image file header without decoding pixels.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (width, height) = image::image_dimensions(path)
            .with_context(|| format!("Failed to read field image {}", path.display()))?;
        Ok(Self::new(f64::from(width), f64::from(height)))
    }
}

/// Maps points between field inches and image pixels.
///
/// With no image loaded every conversion yields the zero point.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateTransform {
    image: Option<FieldImage>,
    border_px: f64,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new(None, DEFAULT_BORDER_PX)
    }
}

impl CoordinateTransform {
    pub fn new(image: Option<FieldImage>, border_px: f64) -> Self {
        Self {
            image,
            border_px: border_px.max(0.0),
        }
    }

    /// Creates a transform for an image of the given size.
    pub fn with_image(width: f64, height: f64, border_px: f64) -> Self {
        Self::new(Some(FieldImage::new(width, height)), border_px)
    }

    pub fn image(&self) -> Option<FieldImage> {
        self.image
    }

    /// Replaces the image metadata. Cached screen positions must be re-synced.
    pub fn set_image(&mut self, image: Option<FieldImage>) {
        self.image = image;
    }

    pub fn border_px(&self) -> f64 {
        self.border_px
    }

    pub fn has_image(&self) -> bool {
        self.pixels_per_inch() > 0.0
    }

    /// Pixels per field inch; zero when no usable image is loaded.
    ///
    /// ```text
    /// pixels_per_inch = (image_width - 2 * border) / 144
    /// ```
    pub fn pixels_per_inch(&self) -> f64 {
        match self.image {
            Some(image) => ((image.width - 2.0 * self.border_px) / FIELD_INCHES).max(0.0),
            None => 0.0,
        }
    }

    /// Converts field coordinates to image pixels.
    ///
    /// ```text
    /// pixel_x = width / 2 + field_x * ppi
    /// pixel_y = height / 2 - field_y * ppi   // Flip Y-axis
    /// ```
    pub fn to_screen(&self, field: FieldPoint) -> ScreenPoint {
        let ppi = self.pixels_per_inch();
        match self.image {
            Some(image) if ppi > 0.0 => ScreenPoint::new(
                image.width / 2.0 + field.x * ppi,
                image.height / 2.0 - field.y * ppi,
            ),
            _ => ScreenPoint::ZERO,
        }
    }

    /// Converts image pixels to field coordinates (inverse of [`Self::to_screen`]).
    pub fn to_field(&self, screen: ScreenPoint) -> FieldPoint {
        let ppi = self.pixels_per_inch();
        match self.image {
            Some(image) if ppi > 0.0 => FieldPoint::new(
                (screen.x - image.width / 2.0) / ppi,
                (image.height / 2.0 - screen.y) / ppi,
            ),
            _ => FieldPoint::ZERO,
        }
    }

    /// Scales a length in inches to pixels.
    pub fn inches_to_pixels(&self, inches: f64) -> f64 {
        inches * self.pixels_per_inch()
    }
}
