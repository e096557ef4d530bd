use image::{Rgba, RgbaImage};

/// Replace every pixel at least as bright as `threshold` in all three color
/// channels with fully transparent white, keeping everything else opaque.
pub fn threshold_knockout(image: &RgbaImage, threshold: u8) -> RgbaImage {
    let mut out = image.clone();
    knockout_in_place(&mut out, threshold);
    out
}

/// In-place variant of [`threshold_knockout`].
pub fn knockout_in_place(image: &mut RgbaImage, threshold: u8) {
    for pixel in image.pixels_mut() {
        let Rgba([r, g, b, _]) = *pixel;
        // Alpha never participates in the brightness test.
        if r >= threshold && g >= threshold && b >= threshold {
            *pixel = Rgba([255, 255, 255, 0]);
        }
    }
}
