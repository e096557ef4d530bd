use image::{Rgb, RgbImage, Rgba, RgbaImage, imageops};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Edge length of one checkerboard square in display pixels.
const CHECKER_SQUARE: u32 = 10;
const CHECKER_LIGHT: Rgb<u8> = Rgb([255, 255, 255]);
const CHECKER_DARK: Rgb<u8> = Rgb([200, 200, 200]);

/// Mapping between a full-resolution image and its fit-to-viewport preview.
///
/// The preview is only ever shrunk to fit, never enlarged, and is centered in
/// the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    image_width: u32,
    image_height: u32,
    pub scale: f64,
    pub display_width: u32,
    pub display_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl Projection {
    /// Fit an image of the given size into a viewport.
    pub fn fit(image_width: u32, image_height: u32, viewport_width: u32, viewport_height: u32) -> Self {
        let scale = (f64::from(viewport_width) / f64::from(image_width))
            .min(f64::from(viewport_height) / f64::from(image_height))
            .min(1.0);
        let display_width = (f64::from(image_width) * scale) as u32;
        let display_height = (f64::from(image_height) * scale) as u32;
        Self {
            image_width,
            image_height,
            scale,
            display_width,
            display_height,
            offset_x: (viewport_width - display_width) / 2,
            offset_y: (viewport_height - display_height) / 2,
        }
    }

    /// Map a display-space point back to an image pixel, or `None` when the
    /// point misses the image.
    pub fn to_image(&self, px: f64, py: f64) -> Option<(u32, u32)> {
        if self.scale <= 0.0 {
            return None;
        }
        let x = ((px - f64::from(self.offset_x)) / self.scale).floor();
        let y = ((py - f64::from(self.offset_y)) / self.scale).floor();
        if x < 0.0 || y < 0.0 || x >= f64::from(self.image_width) || y >= f64::from(self.image_height)
        {
            return None;
        }
        Some((x as u32, y as u32))
    }
}

/// Checkerboard backdrop that shows through transparent regions of the
/// preview.
pub fn checkerboard(width: u32, height: u32) -> RgbImage {
    let mut board = RgbImage::from_pixel(width, height, CHECKER_LIGHT);
    for row in 0..=(height / CHECKER_SQUARE) {
        for col in 0..=(width / CHECKER_SQUARE) {
            if (row + col) % 2 != 0 {
                continue;
            }
            let (x, y) = (col * CHECKER_SQUARE, row * CHECKER_SQUARE);
            if x >= width || y >= height {
                continue;
            }
            draw_filled_rect_mut(
                &mut board,
                Rect::at(x as i32, y as i32).of_size(CHECKER_SQUARE, CHECKER_SQUARE),
                CHECKER_DARK,
            );
        }
    }
    board
}

/// Render the preview for a projection: the processed buffer scaled down to
/// display size and alpha-composited over the checkerboard.
///
/// Read-only with respect to the processed buffer.
pub fn render(processed: &RgbaImage, projection: &Projection) -> RgbImage {
    let (dw, dh) = (projection.display_width, projection.display_height);
    if dw == 0 || dh == 0 {
        return RgbImage::new(dw, dh);
    }
    let scaled = if processed.dimensions() == (dw, dh) {
        processed.clone()
    } else {
        imageops::resize(processed, dw, dh, imageops::FilterType::Lanczos3)
    };

    let mut board = checkerboard(dw, dh);
    for (board_px, scaled_px) in board.pixels_mut().zip(scaled.pixels()) {
        let Rgba([r, g, b, a]) = *scaled_px;
        let alpha = u32::from(a);
        for (channel, value) in board_px.0.iter_mut().zip([r, g, b]) {
            let base = u32::from(*channel);
            *channel = ((u32::from(value) * alpha + base * (255 - alpha)) / 255) as u8;
        }
    }
    board
}
