//! Error types for editor commands and exports.

/// Failure of a user-facing editor command.
///
/// The dispatcher turns every variant except [`EditorError::EmptyPrompt`]
/// into a user-visible alert; none of them leave partial state behind.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Malformed or out-of-range numeric text.
    #[error("Invalid values: {0}")]
    InvalidInput(String),
    /// A command that needs a selection ran with nothing selected.
    #[error("Select an image first.")]
    NoSelection,
    /// The prompt was cancelled or left blank.
    #[error("prompt cancelled")]
    EmptyPrompt,
    /// Resize or rotate was requested on a text label.
    #[error("Only images can be resized or rotated.")]
    NotAnImage,
    /// An uploaded file could not be decoded as an image.
    #[error("Could not load image: {0}")]
    Decode(#[from] image::ImageError),
}

impl EditorError {
    /// Whether the error should be swallowed without telling the user.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::EmptyPrompt)
    }
}

/// Failure while rasterizing or encoding an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The raster surface could not be allocated (zero or oversized dimensions).
    #[error("cannot allocate a {width}x{height} raster")]
    Allocation { width: u32, height: u32 },
    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
    /// The supplied font could not be parsed.
    #[error("invalid font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),
    /// PDF assembly or serialization failed.
    #[error("PDF encoding failed: {0}")]
    Pdf(String),
    /// The on-screen canvas could not be read back.
    #[error("canvas snapshot failed: {0}")]
    Snapshot(String),
}
