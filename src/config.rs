/// Which engine produces the transparency mask during a reprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMethod {
    /// Delegate to the injected matte backend, falling back to the
    /// threshold pass when it fails or is absent.
    Ai,
    /// Knock out every pixel at least as bright as the threshold.
    Threshold,
}

/// Options describing how the background is removed.
#[derive(Debug, Clone)]
pub struct RemovalOptions {
    /// Whether removal runs at all during a reprocess.
    pub enabled: bool,
    pub method: RemovalMethod,
    /// Brightness cutoff for the threshold pass (applied per RGB channel).
    pub threshold: u8,
    /// Per-channel color tolerance for wand clicks.
    pub tolerance: u8,
}

impl Default for RemovalOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            method: RemovalMethod::Threshold,
            threshold: 240,
            tolerance: 32,
        }
    }
}

impl RemovalOptions {
    /// Enable or disable removal while keeping the other settings.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the removal method.
    pub fn with_method(mut self, method: RemovalMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the brightness cutoff for the threshold pass.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the wand color tolerance.
    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Compression schemes supported for TIFF export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    None,
    Lzw,
    Deflate,
}

/// Options for encoding exported files.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
    pub tiff_compression: TiffCompression,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            tiff_compression: TiffCompression::Lzw,
        }
    }
}

impl ExportOptions {
    /// Set the JPEG quality.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Set the TIFF compression scheme.
    pub fn with_tiff_compression(mut self, compression: TiffCompression) -> Self {
        self.tiff_compression = compression;
        self
    }
}
