//! Physical units, pixel conversion at the fixed print DPI, and sheet size.
//!
//! Everything on the canvas is stored in pixels. Physical lengths only enter
//! through user input (resize dimensions, sheet size) and leave through ruler
//! labels and the PDF page size, so conversions happen at those edges.

#[cfg(test)]
#[path = "units_test.rs"]
mod units_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{CM_PER_INCH, DEFAULT_SHEET_HEIGHT_IN, DEFAULT_SHEET_WIDTH_IN, DPI, POINTS_PER_INCH};
use crate::error::EditorError;

/// Display unit for physical lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    /// Inches (the default).
    #[default]
    #[serde(rename = "in")]
    Inches,
    /// Centimeters.
    #[serde(rename = "cm")]
    Centimeters,
}

impl Unit {
    /// Short label used in prompts and captions.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Inches => "in",
            Self::Centimeters => "cm",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "inch" | "inches" => Ok(Self::Inches),
            "cm" | "centimeter" | "centimeters" => Ok(Self::Centimeters),
            other => Err(EditorError::InvalidInput(format!("unknown unit `{other}`"))),
        }
    }
}

/// Convert a physical length to canvas pixels.
#[must_use]
pub fn to_pixels(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Inches => value * DPI,
        Unit::Centimeters => (value / CM_PER_INCH) * DPI,
    }
}

/// Convert canvas pixels back to a physical length.
#[must_use]
pub fn to_unit(pixels: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Inches => pixels / DPI,
        Unit::Centimeters => (pixels / DPI) * CM_PER_INCH,
    }
}

/// Pixel distance between ruler labels: one whole unit, rounded.
#[must_use]
pub fn ruler_step_px(unit: Unit) -> f64 {
    to_pixels(1.0, unit).round()
}

/// Parse a user-entered length. Rejects non-numeric, non-finite and non-positive values.
///
/// # Errors
///
/// Returns [`EditorError::InvalidInput`] when `raw` is not a positive number.
pub fn parse_length(raw: &str) -> Result<f64, EditorError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| EditorError::InvalidInput(format!("`{trimmed}` is not a number")))?;
    check_positive(value)
}

fn check_positive(value: f64) -> Result<f64, EditorError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EditorError::InvalidInput(format!("`{value}` must be a positive number")));
    }
    Ok(value)
}

/// Parse a `"width,height"` prompt answer into two physical lengths.
///
/// # Errors
///
/// Returns [`EditorError::EmptyPrompt`] for blank input and
/// [`EditorError::InvalidInput`] for anything that is not two positive numbers.
pub fn parse_dimensions(raw: &str) -> Result<(f64, f64), EditorError> {
    if raw.trim().is_empty() {
        return Err(EditorError::EmptyPrompt);
    }
    let mut parts = raw.split(',');
    let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(EditorError::InvalidInput(format!("expected `width,height`, got `{}`", raw.trim())));
    };
    Ok((parse_length(w)?, parse_length(h)?))
}

/// Physical size of the gang sheet. Pixel dimensions are always derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetSize {
    /// Width in inches.
    pub width_in: f64,
    /// Height in inches.
    pub height_in: f64,
}

impl Default for SheetSize {
    fn default() -> Self {
        Self { width_in: DEFAULT_SHEET_WIDTH_IN, height_in: DEFAULT_SHEET_HEIGHT_IN }
    }
}

impl SheetSize {
    #[must_use]
    pub fn new(width_in: f64, height_in: f64) -> Self {
        Self { width_in, height_in }
    }

    /// A sheet size from numbers that did not come through [`parse_length`].
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidInput`] unless both sides are positive and finite.
    pub fn try_new(width_in: f64, height_in: f64) -> Result<Self, EditorError> {
        Ok(Self::new(check_positive(width_in)?, check_positive(height_in)?))
    }

    /// Width in canvas pixels.
    #[must_use]
    pub fn width_px(&self) -> f64 {
        to_pixels(self.width_in, Unit::Inches)
    }

    /// Height in canvas pixels.
    #[must_use]
    pub fn height_px(&self) -> f64 {
        to_pixels(self.height_in, Unit::Inches)
    }

    /// Integer pixel dimensions of the backing raster.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn pixel_dims(&self) -> (u32, u32) {
        (self.width_px().round() as u32, self.height_px().round() as u32)
    }

    /// Page size in PDF points.
    #[must_use]
    pub fn points(&self) -> (f64, f64) {
        (self.width_in * POINTS_PER_INCH, self.height_in * POINTS_PER_INCH)
    }

    /// Status caption, e.g. `22" × 39" @ 300 DPI`.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{}\" × {}\" @ {DPI} DPI", self.width_in, self.height_in)
    }
}
