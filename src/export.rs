use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage, imageops};
use tiff::encoder::{Rational, TiffEncoder, colortype, compression};
use tiff::tags::ResolutionUnit;

use crate::CutoutResult;
use crate::config::TiffCompression;

/// Output formats offered by the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Jpeg,
    Tiff,
}

impl ExportFormat {
    /// Conventional file extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Tiff => "tiff",
        }
    }
}

/// Blend an RGBA buffer over an opaque white background, producing the RGB
/// buffer that opaque formats require.
pub fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    let (w, h) = image.dimensions();
    let mut flat = RgbImage::new(w, h);
    for (out_px, src_px) in flat.pixels_mut().zip(image.pixels()) {
        let Rgba([r, g, b, a]) = *src_px;
        let alpha = u32::from(a);
        let blend = |channel: u8| ((u32::from(channel) * alpha + 255 * (255 - alpha)) / 255) as u8;
        *out_px = Rgb([blend(r), blend(g), blend(b)]);
    }
    flat
}

/// One high-quality resampling pass to exactly the target dimensions.
///
/// A zero target dimension skips the resample and returns the buffer as-is,
/// as does an exact size match.
pub fn resample(image: &RgbaImage, target_width: u32, target_height: u32) -> RgbaImage {
    if target_width == 0 || target_height == 0 || image.dimensions() == (target_width, target_height)
    {
        return image.clone();
    }
    imageops::resize(image, target_width, target_height, imageops::FilterType::Lanczos3)
}

/// Encode an RGB buffer as JPEG at the given quality, stamping the dpi into
/// the JFIF header so the physical size travels with the file.
pub fn encode_jpeg(image: &RgbImage, quality: u8, dpi: u32) -> CutoutResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    stamp_jfif_density(&mut bytes, dpi);
    Ok(bytes)
}

/// Rewrite the JFIF APP0 density fields to dots-per-inch.
///
/// Leaves the stream untouched when no JFIF segment leads it.
fn stamp_jfif_density(bytes: &mut [u8], dpi: u32) {
    // SOI, APP0 marker, segment length, then the "JFIF\0" identifier;
    // density unit and X/Y density follow the two version bytes.
    if bytes.len() < 18 || &bytes[6..11] != b"JFIF\0" {
        return;
    }
    let dpi = dpi.min(u32::from(u16::MAX)) as u16;
    let [hi, lo] = dpi.to_be_bytes();
    bytes[13] = 1; // dots per inch
    bytes[14] = hi;
    bytes[15] = lo;
    bytes[16] = hi;
    bytes[17] = lo;
}

/// Encode an RGBA buffer as TIFF with the chosen compression and the dpi
/// written as resolution metadata.
pub fn encode_tiff(image: &RgbaImage, compression: TiffCompression, dpi: u32) -> CutoutResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor)?;
        match compression {
            TiffCompression::None => {
                let mut out = encoder.new_image_with_compression::<colortype::RGBA8, _>(
                    image.width(),
                    image.height(),
                    compression::Uncompressed,
                )?;
                out.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
                out.write_data(image.as_raw())?;
            }
            TiffCompression::Lzw => {
                let mut out = encoder.new_image_with_compression::<colortype::RGBA8, _>(
                    image.width(),
                    image.height(),
                    compression::Lzw,
                )?;
                out.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
                out.write_data(image.as_raw())?;
            }
            TiffCompression::Deflate => {
                let mut out = encoder.new_image_with_compression::<colortype::RGBA8, _>(
                    image.width(),
                    image.height(),
                    compression::Deflate::default(),
                )?;
                out.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
                out.write_data(image.as_raw())?;
            }
        }
    }
    Ok(cursor.into_inner())
}

/// RGB variant of [`encode_tiff`], used when the buffer carries no
/// transparency worth preserving.
pub fn encode_tiff_rgb(image: &RgbImage, compression: TiffCompression, dpi: u32) -> CutoutResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor)?;
        match compression {
            TiffCompression::None => {
                let mut out = encoder.new_image_with_compression::<colortype::RGB8, _>(
                    image.width(),
                    image.height(),
                    compression::Uncompressed,
                )?;
                out.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
                out.write_data(image.as_raw())?;
            }
            TiffCompression::Lzw => {
                let mut out = encoder.new_image_with_compression::<colortype::RGB8, _>(
                    image.width(),
                    image.height(),
                    compression::Lzw,
                )?;
                out.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
                out.write_data(image.as_raw())?;
            }
            TiffCompression::Deflate => {
                let mut out = encoder.new_image_with_compression::<colortype::RGB8, _>(
                    image.width(),
                    image.height(),
                    compression::Deflate::default(),
                )?;
                out.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
                out.write_data(image.as_raw())?;
            }
        }
    }
    Ok(cursor.into_inner())
}
