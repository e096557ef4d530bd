use std::path::Path;

use image::RgbaImage;

use crate::Cutout;
use crate::backend::{BackendCache, BackendError, MatteBackend};
use crate::config::{ExportOptions, RemovalMethod, RemovalOptions};
use crate::dimensions::PrintDimensions;
use crate::export::{self, ExportFormat};
use crate::history::History;
use crate::preview::{self, Projection};
use crate::segment;
use crate::wand::{self, FillOutcome};
use crate::{CutoutError, CutoutResult};

/// Outcome of a reprocessing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReprocessOutcome {
    /// The processed buffer was regenerated from the original.
    Completed {
        /// Present when the backend failed and the threshold fallback ran.
        fallback_warning: Option<String>,
    },
    /// Another reprocess was already in flight; this request was dropped.
    Dropped,
}

/// Outcome of a magic-wand click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A connected region was made transparent.
    Removed { pixels: usize },
    /// The clicked pixel was already fully transparent.
    AlreadyTransparent,
    /// The click landed outside the image and was ignored.
    OutsideImage,
}

/// One editing session over a single source image.
///
/// The session is the sole owner of the live processed buffer; the original
/// stays untouched and serves only as the source for regeneration. Every
/// parameter change rebuilds the processed buffer from the original
/// (background removal at the original resolution first, then the resample
/// to the target pixel size) and clears the undo history. Wand clicks mutate
/// the processed buffer in place behind a snapshot.
pub struct Session {
    original: RgbaImage,
    processed: RgbaImage,
    history: History,
    dimensions: PrintDimensions,
    removal: RemovalOptions,
    export_options: ExportOptions,
    backend: Box<dyn MatteBackend>,
    cache: BackendCache,
    reprocessing: bool,
    fallback_warning: Option<String>,
}

impl Session {
    pub(crate) fn new(original: RgbaImage, builder: Cutout) -> CutoutResult<Self> {
        let (width, height) = original.dimensions();
        let dimensions = PrintDimensions::new(width, height, builder.dpi)?;
        let mut session = Self {
            processed: original.clone(),
            original,
            history: History::new(),
            dimensions,
            removal: builder.removal,
            export_options: builder.export,
            backend: builder.backend,
            cache: BackendCache::default(),
            reprocessing: false,
            fallback_warning: None,
        };
        session.reprocess()?;
        Ok(session)
    }

    /// Swap in a new source image: fresh original, cleared history and cache,
    /// scale reset to 1.0 at the current dpi.
    pub fn load(&mut self, path: impl AsRef<Path>) -> CutoutResult<ReprocessOutcome> {
        let original = image::open(path)?.to_rgba8();
        let (width, height) = original.dimensions();
        let lock_aspect = self.dimensions.lock_aspect();
        let mut dimensions = PrintDimensions::new(width, height, self.dimensions.dpi())?;
        dimensions.set_lock_aspect(lock_aspect);

        self.original = original;
        self.dimensions = dimensions;
        self.cache.clear();
        self.history.clear();
        self.reprocess()
    }

    /// Regenerate the processed buffer from the untouched original.
    ///
    /// Removal runs at the original resolution before the resample;
    /// resampling first would feed already-interpolated colors into the mask
    /// and blur its boundary. A request arriving while another reprocess is
    /// in flight is dropped, not queued.
    pub fn reprocess(&mut self) -> CutoutResult<ReprocessOutcome> {
        if self.reprocessing {
            return Ok(ReprocessOutcome::Dropped);
        }
        self.reprocessing = true;
        let result = self.reprocess_inner();
        self.reprocessing = false;
        result
    }

    fn reprocess_inner(&mut self) -> CutoutResult<ReprocessOutcome> {
        self.history.clear();
        let mut warning = None;

        let buffer = if self.removal.enabled {
            match self.removal.method {
                RemovalMethod::Ai => match self.segment_with_backend() {
                    Ok(matte) => matte,
                    Err(err) => {
                        warning = Some(format!("{err}; falling back to threshold removal"));
                        segment::threshold_knockout(&self.original, self.removal.threshold)
                    }
                },
                RemovalMethod::Threshold => {
                    segment::threshold_knockout(&self.original, self.removal.threshold)
                }
            }
        } else {
            self.original.clone()
        };

        let (target_width, target_height) = self.dimensions.target_pixels();
        self.processed = export::resample(&buffer, target_width, target_height);
        self.fallback_warning = warning.clone();
        Ok(ReprocessOutcome::Completed {
            fallback_warning: warning,
        })
    }

    fn segment_with_backend(&mut self) -> Result<RgbaImage, BackendError> {
        let key = BackendCache::key(&self.original, RemovalMethod::Ai);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }
        let matte = self.backend.segment(&self.original)?;
        self.cache.put(key, matte.clone());
        Ok(matte)
    }

    /// Set the scale factor through the direct numeric entry.
    pub fn set_scale(&mut self, value: f64) -> CutoutResult<ReprocessOutcome> {
        self.dimensions.set_scale(value)?;
        self.reprocess()
    }

    /// Set the scale factor through the incremental control.
    pub fn set_scale_stepped(&mut self, value: f64) -> CutoutResult<ReprocessOutcome> {
        self.dimensions.set_scale_stepped(value)?;
        self.reprocess()
    }

    pub fn set_width_inches(&mut self, value: f64) -> CutoutResult<ReprocessOutcome> {
        self.dimensions.set_width_inches(value)?;
        self.reprocess()
    }

    pub fn set_height_inches(&mut self, value: f64) -> CutoutResult<ReprocessOutcome> {
        self.dimensions.set_height_inches(value)?;
        self.reprocess()
    }

    pub fn set_dpi(&mut self, dpi: u32) -> CutoutResult<ReprocessOutcome> {
        self.dimensions.set_dpi(dpi)?;
        self.reprocess()
    }

    /// Aspect locking only affects future width/height edits; the target
    /// size is unchanged, so no reprocess happens.
    pub fn set_lock_aspect(&mut self, lock: bool) {
        self.dimensions.set_lock_aspect(lock);
    }

    pub fn set_threshold(&mut self, threshold: u8) -> CutoutResult<ReprocessOutcome> {
        self.removal.threshold = threshold;
        self.reprocess()
    }

    /// The tolerance only drives future wand clicks; no reprocess.
    pub fn set_tolerance(&mut self, tolerance: u8) {
        self.removal.tolerance = tolerance;
    }

    pub fn set_removal_enabled(&mut self, enabled: bool) -> CutoutResult<ReprocessOutcome> {
        self.removal.enabled = enabled;
        self.reprocess()
    }

    pub fn toggle_removal(&mut self) -> CutoutResult<ReprocessOutcome> {
        self.removal.enabled = !self.removal.enabled;
        self.reprocess()
    }

    pub fn set_method(&mut self, method: RemovalMethod) -> CutoutResult<ReprocessOutcome> {
        if self.removal.method != method {
            self.cache.clear();
        }
        self.removal.method = method;
        self.reprocess()
    }

    /// Route a display-space click through the projector into the wand.
    /// Clicks that miss the image are silently ignored.
    pub fn click_display(
        &mut self,
        px: f64,
        py: f64,
        viewport_width: u32,
        viewport_height: u32,
    ) -> CutoutResult<ClickOutcome> {
        match self
            .projection(viewport_width, viewport_height)
            .to_image(px, py)
        {
            Some((x, y)) => self.click(x, y),
            None => Ok(ClickOutcome::OutsideImage),
        }
    }

    /// Magic-wand click at an image coordinate: snapshot the buffer, then
    /// punch the connected region transparent.
    pub fn click(&mut self, x: u32, y: u32) -> CutoutResult<ClickOutcome> {
        let (width, height) = self.processed.dimensions();
        if x >= width || y >= height {
            return Err(CutoutError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        if self.processed.get_pixel(x, y)[3] == 0 {
            return Ok(ClickOutcome::AlreadyTransparent);
        }

        self.history.push(self.processed.clone());
        match wand::flood_fill_transparent(&mut self.processed, x, y, self.removal.tolerance)? {
            FillOutcome::Removed { pixels } => Ok(ClickOutcome::Removed { pixels }),
            FillOutcome::AlreadyTransparent => {
                // The fill made no edit, so the snapshot has nothing to undo.
                self.history.discard_last();
                Ok(ClickOutcome::AlreadyTransparent)
            }
        }
    }

    /// Undo the most recent wand edit, returning the remaining undo depth.
    pub fn undo(&mut self) -> CutoutResult<usize> {
        match self.history.pop() {
            Some(snapshot) => {
                self.processed = snapshot;
                Ok(self.history.len())
            }
            None => Err(CutoutError::EmptyHistory),
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn processed(&self) -> &RgbaImage {
        &self.processed
    }

    pub fn original(&self) -> &RgbaImage {
        &self.original
    }

    pub fn dimensions(&self) -> &PrintDimensions {
        &self.dimensions
    }

    pub fn removal(&self) -> &RemovalOptions {
        &self.removal
    }

    /// Warning from the most recent reprocess, if the backend fell back.
    pub fn fallback_warning(&self) -> Option<&str> {
        self.fallback_warning.as_deref()
    }

    /// Fit-to-viewport projection for the current processed buffer.
    pub fn projection(&self, viewport_width: u32, viewport_height: u32) -> Projection {
        let (width, height) = self.processed.dimensions();
        Projection::fit(width, height, viewport_width, viewport_height)
    }

    /// Render the checkerboard-composited preview for a viewport.
    pub fn preview(&self, viewport_width: u32, viewport_height: u32) -> image::RgbImage {
        preview::render(
            &self.processed,
            &self.projection(viewport_width, viewport_height),
        )
    }

    /// Encode the processed buffer in the requested format.
    ///
    /// JPEG is flattened over white first; TIFF keeps the alpha channel and
    /// drops to RGB only when the buffer is fully opaque.
    pub fn export(&self, format: ExportFormat) -> CutoutResult<Vec<u8>> {
        let dpi = self.dimensions.dpi();
        match format {
            ExportFormat::Jpeg => {
                let flat = export::flatten_onto_white(&self.processed);
                export::encode_jpeg(&flat, self.export_options.jpeg_quality, dpi)
            }
            ExportFormat::Tiff => {
                if self.processed.pixels().all(|px| px[3] == u8::MAX) {
                    let rgb = image::DynamicImage::ImageRgba8(self.processed.clone()).to_rgb8();
                    export::encode_tiff_rgb(&rgb, self.export_options.tiff_compression, dpi)
                } else {
                    export::encode_tiff(&self.processed, self.export_options.tiff_compression, dpi)
                }
            }
        }
    }

    /// Encode and write the processed buffer to `path`.
    pub fn export_to(&self, path: impl AsRef<Path>, format: ExportFormat) -> CutoutResult<()> {
        let bytes = self.export(format)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
