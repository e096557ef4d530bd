pub mod backend;
pub mod config;
pub mod dimensions;
pub mod error;
pub mod export;
pub mod history;
pub mod preview;
pub mod segment;
pub mod session;
pub mod wand;

pub use backend::{BackendError, MatteBackend, UnavailableBackend};
pub use config::{ExportOptions, RemovalMethod, RemovalOptions, TiffCompression};
pub use dimensions::PrintDimensions;
pub use error::{CutoutError, CutoutResult};
pub use export::ExportFormat;
pub use history::History;
pub use preview::Projection;
pub use session::{ClickOutcome, ReprocessOutcome, Session};
pub use wand::FillOutcome;

use std::path::Path;

use image::RgbaImage;

/// Entry point for configuring and opening an editing session.
pub struct Cutout {
    pub(crate) removal: RemovalOptions,
    pub(crate) export: ExportOptions,
    pub(crate) dpi: u32,
    pub(crate) backend: Box<dyn MatteBackend>,
}

impl Cutout {
    pub fn new() -> Self {
        Self {
            removal: RemovalOptions::default(),
            export: ExportOptions::default(),
            dpi: 300,
            backend: Box::new(UnavailableBackend),
        }
    }

    /// Set the background removal options used by reprocessing.
    pub fn with_removal(mut self, removal: RemovalOptions) -> Self {
        self.removal = removal;
        self
    }

    /// Set the export encoding options.
    pub fn with_export(mut self, export: ExportOptions) -> Self {
        self.export = export;
        self
    }

    /// Set the print resolution in dots per inch.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Inject an external background-removal collaborator.
    pub fn with_backend(mut self, backend: Box<dyn MatteBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Whether the configured backend expects to succeed.
    pub fn backend_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Decode the image at `path` and open an editing session on it.
    pub fn for_image(self, path: impl AsRef<Path>) -> CutoutResult<Session> {
        let original = image::open(path)?.to_rgba8();
        Session::new(original, self)
    }

    /// Open an editing session on an already-decoded buffer.
    pub fn for_buffer(self, original: RgbaImage) -> CutoutResult<Session> {
        Session::new(original, self)
    }
}

impl Default for Cutout {
    fn default() -> Self {
        Self::new()
    }
}
