use thiserror::Error;

/// Result type alias for operations that may fail with [`CutoutError`].
pub type CutoutResult<T> = std::result::Result<T, CutoutError>;

/// Error types that can occur while editing or exporting an image.
///
/// This enum covers errors from image I/O, numeric input validation,
/// wand edits, and undo bookkeeping.
#[derive(Debug, Error)]
pub enum CutoutError {
    /// Image loading, decoding, or encoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// TIFF encoding or decoding error.
    #[error("TIFF processing failed: {0}")]
    Tiff(#[from] tiff::TiffError),
    /// Rejected numeric entry; the previous value is retained.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    /// Seed coordinate outside the image.
    #[error("Point ({x}, {y}) lies outside the {width}x{height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// Undo requested with no snapshots on the stack.
    #[error("Nothing to undo")]
    EmptyHistory,
}
