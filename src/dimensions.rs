use crate::{CutoutError, CutoutResult};

/// Scale range accepted by the direct numeric entry.
pub const SCALE_RANGE: (f64, f64) = (0.1, 20.0);
/// Scale range accepted by the incremental control.
pub const STEPPED_SCALE_RANGE: (f64, f64) = (1.0, 8.0);

/// Round to two decimal places, the precision used for inch dimensions and
/// derived scale factors.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Keeps scale factor, physical size, and resolution mutually consistent for
/// one loaded image.
///
/// The original pixel size is fixed per image; every setter re-derives the
/// dependent values so that scale, inches, and dpi always agree. Setters
/// reject non-finite or non-positive input and leave all fields untouched.
#[derive(Debug, Clone)]
pub struct PrintDimensions {
    original_width: u32,
    original_height: u32,
    dpi: u32,
    lock_aspect: bool,
    scale: f64,
    width_inches: f64,
    height_inches: f64,
}

impl PrintDimensions {
    /// Create a resolver for an image of the given pixel size, at scale 1.0.
    pub fn new(original_width: u32, original_height: u32, dpi: u32) -> CutoutResult<Self> {
        if original_width == 0 || original_height == 0 {
            return Err(CutoutError::InvalidInput {
                field: "image size",
                reason: format!("expected positive dimensions, got {original_width}x{original_height}"),
            });
        }
        Self::check_dpi(dpi)?;
        let mut dimensions = Self {
            original_width,
            original_height,
            dpi,
            lock_aspect: true,
            scale: 1.0,
            width_inches: 0.0,
            height_inches: 0.0,
        };
        dimensions.sync_inches_from_scale();
        Ok(dimensions)
    }

    fn check_dpi(dpi: u32) -> CutoutResult<()> {
        if dpi == 0 {
            return Err(CutoutError::InvalidInput {
                field: "dpi",
                reason: "expected a positive resolution".to_string(),
            });
        }
        Ok(())
    }

    fn checked_positive(field: &'static str, value: f64) -> CutoutResult<f64> {
        if !value.is_finite() || value <= 0.0 {
            return Err(CutoutError::InvalidInput {
                field,
                reason: format!("expected a positive number, got {value}"),
            });
        }
        Ok(value)
    }

    fn sync_inches_from_scale(&mut self) {
        let dpi = f64::from(self.dpi);
        self.width_inches = round2(f64::from(self.original_width) * self.scale / dpi);
        self.height_inches = round2(f64::from(self.original_height) * self.scale / dpi);
    }

    /// Set the scale factor through the direct numeric entry (0.1-20).
    pub fn set_scale(&mut self, value: f64) -> CutoutResult<()> {
        let (lo, hi) = SCALE_RANGE;
        self.scale = Self::checked_positive("scale", value)?.clamp(lo, hi);
        self.sync_inches_from_scale();
        Ok(())
    }

    /// Set the scale factor through the incremental control (1.0-8.0).
    pub fn set_scale_stepped(&mut self, value: f64) -> CutoutResult<()> {
        let (lo, hi) = STEPPED_SCALE_RANGE;
        self.scale = Self::checked_positive("scale", value)?.clamp(lo, hi);
        self.sync_inches_from_scale();
        Ok(())
    }

    /// Set the physical width; the scale follows, and so does the height when
    /// the aspect ratio is locked.
    pub fn set_width_inches(&mut self, value: f64) -> CutoutResult<()> {
        let width = Self::checked_positive("width", value)?;
        let dpi = f64::from(self.dpi);
        self.width_inches = round2(width);
        self.scale = round2(width * dpi / f64::from(self.original_width));
        if self.lock_aspect {
            self.height_inches =
                round2(width * f64::from(self.original_height) / f64::from(self.original_width));
        }
        Ok(())
    }

    /// Set the physical height; symmetric to [`Self::set_width_inches`].
    pub fn set_height_inches(&mut self, value: f64) -> CutoutResult<()> {
        let height = Self::checked_positive("height", value)?;
        let dpi = f64::from(self.dpi);
        self.height_inches = round2(height);
        self.scale = round2(height * dpi / f64::from(self.original_height));
        if self.lock_aspect {
            self.width_inches =
                round2(height * f64::from(self.original_width) / f64::from(self.original_height));
        }
        Ok(())
    }

    /// Change the resolution; inch dimensions are re-derived from the current
    /// scale at the new dpi.
    pub fn set_dpi(&mut self, dpi: u32) -> CutoutResult<()> {
        Self::check_dpi(dpi)?;
        self.dpi = dpi;
        self.sync_inches_from_scale();
        Ok(())
    }

    pub fn set_lock_aspect(&mut self, lock: bool) {
        self.lock_aspect = lock;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn width_inches(&self) -> f64 {
        self.width_inches
    }

    pub fn height_inches(&self) -> f64 {
        self.height_inches
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn lock_aspect(&self) -> bool {
        self.lock_aspect
    }

    pub fn original_size(&self) -> (u32, u32) {
        (self.original_width, self.original_height)
    }

    /// Target pixel dimensions for the final resample.
    pub fn target_pixels(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.width_inches * dpi).round() as u32,
            (self.height_inches * dpi).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(w: u32, h: u32, dpi: u32) -> PrintDimensions {
        PrintDimensions::new(w, h, dpi).unwrap()
    }

    mod print_dimensions {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn new_derives_inches_at_scale_one() {
                let dims = resolver(600, 300, 300);
                assert_eq!(dims.scale(), 1.0);
                assert_eq!(dims.width_inches(), 2.0);
                assert_eq!(dims.height_inches(), 1.0);
            }

            #[test]
            fn zero_sized_image_rejected() {
                assert!(PrintDimensions::new(0, 100, 300).is_err());
                assert!(PrintDimensions::new(100, 0, 300).is_err());
            }

            #[test]
            fn zero_dpi_rejected() {
                assert!(PrintDimensions::new(100, 100, 0).is_err());
            }

            #[test]
            fn width_two_inches_at_300dpi_is_scale_one() {
                let mut dims = resolver(600, 300, 300);
                dims.set_width_inches(2.0).unwrap();
                assert_eq!(dims.scale(), 1.0);
            }

            #[test]
            fn doubling_width_doubles_scale_and_locked_height() {
                let mut dims = resolver(600, 300, 300);
                dims.set_width_inches(4.0).unwrap();
                assert_eq!(dims.scale(), 2.0);
                // Original aspect is 2:1, so height follows proportionally.
                assert_eq!(dims.height_inches(), 2.0);
            }

            #[test]
            fn unlocked_height_stays_put_on_width_change() {
                let mut dims = resolver(600, 300, 300);
                dims.set_lock_aspect(false);
                let height_before = dims.height_inches();
                dims.set_width_inches(4.0).unwrap();
                assert_eq!(dims.height_inches(), height_before);
            }

            #[test]
            fn set_height_is_symmetric() {
                let mut dims = resolver(600, 300, 300);
                dims.set_height_inches(2.0).unwrap();
                assert_eq!(dims.scale(), 2.0);
                assert_eq!(dims.width_inches(), 4.0);
            }

            #[test]
            fn direct_scale_clamps_to_wide_range() {
                let mut dims = resolver(600, 300, 300);
                dims.set_scale(0.01).unwrap();
                assert_eq!(dims.scale(), 0.1);
                dims.set_scale(100.0).unwrap();
                assert_eq!(dims.scale(), 20.0);
            }

            #[test]
            fn stepped_scale_clamps_to_narrow_range() {
                let mut dims = resolver(600, 300, 300);
                dims.set_scale_stepped(0.5).unwrap();
                assert_eq!(dims.scale(), 1.0);
                dims.set_scale_stepped(12.0).unwrap();
                assert_eq!(dims.scale(), 8.0);
            }

            #[test]
            fn rejected_input_leaves_state_untouched() {
                let mut dims = resolver(600, 300, 300);
                dims.set_scale(2.0).unwrap();

                assert!(dims.set_scale(f64::NAN).is_err());
                assert!(dims.set_scale(-1.0).is_err());
                assert!(dims.set_width_inches(0.0).is_err());
                assert!(dims.set_height_inches(f64::INFINITY).is_err());
                assert!(dims.set_dpi(0).is_err());

                assert_eq!(dims.scale(), 2.0);
                assert_eq!(dims.width_inches(), 4.0);
                assert_eq!(dims.height_inches(), 2.0);
                assert_eq!(dims.dpi(), 300);
            }

            #[test]
            fn dpi_change_rederives_inches_from_scale() {
                let mut dims = resolver(600, 300, 300);
                dims.set_dpi(150).unwrap();
                assert_eq!(dims.scale(), 1.0);
                assert_eq!(dims.width_inches(), 4.0);
                assert_eq!(dims.height_inches(), 2.0);
            }

            #[test]
            fn target_pixels_round_from_inches() {
                let mut dims = resolver(600, 300, 300);
                dims.set_scale(1.5).unwrap();
                assert_eq!(dims.target_pixels(), (900, 450));
            }

            #[test]
            fn inches_round_to_two_decimals() {
                let dims = resolver(1000, 1000, 300);
                // 1000/300 = 3.333...
                assert_eq!(dims.width_inches(), 3.33);
                assert_eq!(dims.height_inches(), 3.33);
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// Setting the width derived from a scale recovers that scale
                /// within the 2-decimal rounding error.
                #[test]
                fn scale_width_roundtrip(
                    orig_w in 100u32..4000,
                    orig_h in 100u32..4000,
                    dpi in prop_oneof![Just(72u32), Just(150), Just(300), Just(600)],
                    scale in 0.5f64..8.0
                ) {
                    let mut dims = resolver(orig_w, orig_h, dpi);
                    dims.set_scale(scale).unwrap();
                    let width = dims.width_inches();
                    dims.set_width_inches(width).unwrap();

                    // Width rounding contributes up to 0.005 inches, the final
                    // scale rounding up to 0.005 more.
                    let bound = 0.005 * f64::from(dpi) / f64::from(orig_w) + 0.005 + 1e-9;
                    prop_assert!((dims.scale() - scale).abs() <= bound);
                }

                /// After a successful scale change, inches agree with the
                /// derivation formulas at the current dpi.
                #[test]
                fn inches_consistent_after_set_scale(
                    orig_w in 1u32..5000,
                    orig_h in 1u32..5000,
                    dpi in 1u32..1200,
                    scale in 0.1f64..20.0
                ) {
                    let mut dims = resolver(orig_w, orig_h, dpi);
                    dims.set_scale(scale).unwrap();

                    let expected_w = round2(f64::from(orig_w) * dims.scale() / f64::from(dpi));
                    let expected_h = round2(f64::from(orig_h) * dims.scale() / f64::from(dpi));
                    prop_assert_eq!(dims.width_inches(), expected_w);
                    prop_assert_eq!(dims.height_inches(), expected_h);
                }

                /// Locked aspect keeps width/height in the original ratio.
                #[test]
                fn locked_aspect_preserves_ratio(
                    orig_w in 100u32..2000,
                    orig_h in 100u32..2000,
                    width in 0.5f64..40.0
                ) {
                    let mut dims = resolver(orig_w, orig_h, 300);
                    dims.set_width_inches(width).unwrap();

                    let expected =
                        round2(width * f64::from(orig_h) / f64::from(orig_w));
                    prop_assert_eq!(dims.height_inches(), expected);
                }
            }
        }
    }
}
