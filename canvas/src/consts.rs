//! Shared numeric constants for the canvas crate.

// ── Print resolution ────────────────────────────────────────────

/// Fixed print resolution in dots per inch.
pub const DPI: f64 = 300.0;

/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// PDF user-space points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Default sheet width in inches.
pub const DEFAULT_SHEET_WIDTH_IN: f64 = 22.0;

/// Default sheet height in inches.
pub const DEFAULT_SHEET_HEIGHT_IN: f64 = 39.0;

// ── Placement ───────────────────────────────────────────────────

/// Canvas-pixel position where new uploads and text labels land.
pub const PLACEMENT_ORIGIN_PX: f64 = 100.0;

/// Margin between elements (and from the sheet edge) used by auto-arrange.
pub const ARRANGE_MARGIN_PX: f64 = 50.0;

/// Quarter turn applied by "rotate selected".
pub const ROTATE_STEP_RAD: f64 = std::f64::consts::FRAC_PI_2;

// ── Rendering ───────────────────────────────────────────────────

/// Spacing of the optional grid lattice in canvas pixels.
pub const GRID_STEP_PX: f64 = 150.0;

/// Grid line width in canvas pixels.
pub const GRID_LINE_WIDTH_PX: f64 = 1.0;

/// Font size of ruler tick labels in canvas pixels.
pub const RULER_FONT_PX: f64 = 36.0;

/// Inset of ruler labels from the sheet edge in canvas pixels.
pub const RULER_INSET_PX: f64 = 4.0;

/// Stroke width of the selection outline in canvas pixels.
pub const SELECTION_STROKE_PX: f64 = 4.0;

/// Font size of text labels in canvas pixels.
pub const TEXT_FONT_PX: f64 = 30.0;

/// Height of a text label's hit box in canvas pixels.
pub const TEXT_BOX_HEIGHT_PX: f64 = 40.0;

/// Average glyph advance as a fraction of the font size, used to size text hit boxes.
pub const TEXT_ADVANCE_RATIO: f64 = 0.6;

// ── Export ──────────────────────────────────────────────────────

/// Default download name for PNG exports.
pub const PNG_FILE_NAME: &str = "DTF_Gangsheet_300dpi.png";

/// Default download name for PDF exports.
pub const PDF_FILE_NAME: &str = "DTF_Gangsheet.pdf";

// ── Prompts ─────────────────────────────────────────────────────

/// Pre-filled answer of the resize prompt.
pub const RESIZE_PROMPT_DEFAULT: &str = "2,2";
