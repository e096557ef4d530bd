use std::collections::VecDeque;

use image::{Rgba, RgbaImage};

use crate::{CutoutError, CutoutResult};

/// Outcome of a magic-wand fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// The connected region around the seed was punched transparent.
    Removed { pixels: usize },
    /// The seed pixel was already fully transparent; nothing changed.
    AlreadyTransparent,
}

/// Grow a region outward from the seed pixel across 4-connected neighbors and
/// set the alpha of every matching pixel to zero.
///
/// A pixel matches when each of its RGB channels is within `tolerance` of the
/// seed's channel independently; alpha is ignored for matching. Fully
/// transparent pixels and non-matching pixels bound the region. RGB values of
/// cleared pixels are retained.
pub fn flood_fill_transparent(
    image: &mut RgbaImage,
    seed_x: u32,
    seed_y: u32,
    tolerance: u8,
) -> CutoutResult<FillOutcome> {
    let (width, height) = image.dimensions();
    if seed_x >= width || seed_y >= height {
        return Err(CutoutError::OutOfBounds {
            x: seed_x,
            y: seed_y,
            width,
            height,
        });
    }

    let Rgba([seed_r, seed_g, seed_b, seed_a]) = *image.get_pixel(seed_x, seed_y);
    if seed_a == 0 {
        return Ok(FillOutcome::AlreadyTransparent);
    }

    let row = width as usize;
    let mut visited = vec![false; row * height as usize];
    let mut queue = VecDeque::new();
    queue.push_back((seed_x, seed_y));

    let tol = i16::from(tolerance);
    let near = |channel: u8, seed: u8| (i16::from(channel) - i16::from(seed)).abs() <= tol;
    let mut removed = 0usize;

    while let Some((x, y)) = queue.pop_front() {
        let id = y as usize * row + x as usize;
        if visited[id] {
            continue;
        }
        visited[id] = true;

        let pixel = image.get_pixel_mut(x, y);
        let Rgba([r, g, b, a]) = *pixel;
        // Transparent pixels bound the region without being reprocessed.
        if a == 0 {
            continue;
        }
        if !(near(r, seed_r) && near(g, seed_g) && near(b, seed_b)) {
            continue;
        }

        *pixel = Rgba([r, g, b, 0]);
        removed += 1;

        // Neighbors are enqueued unconditionally; the visited array
        // deduplicates when they are popped.
        if x > 0 {
            queue.push_back((x - 1, y));
        }
        if x + 1 < width {
            queue.push_back((x + 1, y));
        }
        if y > 0 {
            queue.push_back((x, y - 1));
        }
        if y + 1 < height {
            queue.push_back((x, y + 1));
        }
    }

    Ok(FillOutcome::Removed { pixels: removed })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba_image(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(color))
    }

    mod flood_fill_transparent {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn seed_out_of_bounds_is_error() {
                let mut image = rgba_image(4, 4, [100, 100, 100, 255]);
                let err = flood_fill_transparent(&mut image, 4, 0, 32).unwrap_err();
                match err {
                    CutoutError::OutOfBounds {
                        x,
                        y,
                        width,
                        height,
                    } => {
                        assert_eq!((x, y), (4, 0));
                        assert_eq!((width, height), (4, 4));
                    }
                    other => panic!("unexpected error: {other:?}"),
                }
                // No mutation happened.
                for px in image.pixels() {
                    assert_eq!(px.0, [100, 100, 100, 255]);
                }
            }

            #[test]
            fn transparent_seed_is_a_no_op() {
                let mut image = rgba_image(3, 3, [100, 100, 100, 0]);
                let outcome = flood_fill_transparent(&mut image, 1, 1, 255).unwrap();
                assert_eq!(outcome, FillOutcome::AlreadyTransparent);
            }

            #[test]
            fn uniform_image_fully_cleared() {
                let mut image = rgba_image(5, 4, [120, 130, 140, 255]);
                let outcome = flood_fill_transparent(&mut image, 2, 2, 0).unwrap();
                assert_eq!(outcome, FillOutcome::Removed { pixels: 20 });
                for px in image.pixels() {
                    assert_eq!(px.0, [120, 130, 140, 0]);
                }
            }

            #[test]
            fn tolerance_admits_near_colors_and_blocks_far_ones() {
                // Seed (240,240,240), tolerance 32: (235,241,239) joins the
                // region, (150,150,150) bounds it.
                let mut image = RgbaImage::new(3, 1);
                image.put_pixel(0, 0, Rgba([240, 240, 240, 255]));
                image.put_pixel(1, 0, Rgba([235, 241, 239, 255]));
                image.put_pixel(2, 0, Rgba([150, 150, 150, 255]));

                let outcome = flood_fill_transparent(&mut image, 0, 0, 32).unwrap();

                assert_eq!(outcome, FillOutcome::Removed { pixels: 2 });
                assert_eq!(image.get_pixel(0, 0).0, [240, 240, 240, 0]);
                assert_eq!(image.get_pixel(1, 0).0, [235, 241, 239, 0]);
                assert_eq!(image.get_pixel(2, 0).0, [150, 150, 150, 255]);
            }

            #[test]
            fn per_channel_bound_not_euclidean() {
                // Each channel differs by exactly the tolerance: the combined
                // distance is large, but the per-channel rule still matches.
                let mut image = RgbaImage::new(2, 1);
                image.put_pixel(0, 0, Rgba([100, 100, 100, 255]));
                image.put_pixel(1, 0, Rgba([132, 68, 132, 255]));

                let outcome = flood_fill_transparent(&mut image, 0, 0, 32).unwrap();

                assert_eq!(outcome, FillOutcome::Removed { pixels: 2 });
            }

            #[test]
            fn one_channel_past_tolerance_blocks() {
                let mut image = RgbaImage::new(2, 1);
                image.put_pixel(0, 0, Rgba([100, 100, 100, 255]));
                image.put_pixel(1, 0, Rgba([100, 133, 100, 255]));

                let outcome = flood_fill_transparent(&mut image, 0, 0, 32).unwrap();

                assert_eq!(outcome, FillOutcome::Removed { pixels: 1 });
                assert_eq!(image.get_pixel(1, 0).0[3], 255);
            }

            #[test]
            fn transparent_pixels_bound_the_region() {
                // Matching color on the far side of a transparent column must
                // not be reached.
                let mut image = rgba_image(3, 1, [200, 200, 200, 255]);
                image.put_pixel(1, 0, Rgba([200, 200, 200, 0]));

                let outcome = flood_fill_transparent(&mut image, 0, 0, 10).unwrap();

                assert_eq!(outcome, FillOutcome::Removed { pixels: 1 });
                assert_eq!(image.get_pixel(2, 0).0[3], 255);
            }

            #[test]
            fn diagonal_neighbors_not_connected() {
                // 2x2 checker of matching color: the seed's diagonal twin is
                // separated by non-matching pixels.
                let mut image = RgbaImage::new(2, 2);
                image.put_pixel(0, 0, Rgba([200, 200, 200, 255]));
                image.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
                image.put_pixel(0, 1, Rgba([0, 0, 0, 255]));
                image.put_pixel(1, 1, Rgba([200, 200, 200, 255]));

                let outcome = flood_fill_transparent(&mut image, 0, 0, 10).unwrap();

                assert_eq!(outcome, FillOutcome::Removed { pixels: 1 });
                assert_eq!(image.get_pixel(1, 1).0[3], 255);
            }

            #[test]
            fn repeat_fill_is_a_fixed_point() {
                let mut image = rgba_image(4, 4, [90, 90, 90, 255]);
                let first = flood_fill_transparent(&mut image, 0, 0, 16).unwrap();
                assert_eq!(first, FillOutcome::Removed { pixels: 16 });

                let second = flood_fill_transparent(&mut image, 0, 0, 16).unwrap();
                assert_eq!(second, FillOutcome::AlreadyTransparent);
            }

            #[test]
            fn rgb_retained_on_cleared_pixels() {
                let mut image = rgba_image(2, 2, [12, 34, 56, 255]);
                flood_fill_transparent(&mut image, 0, 0, 0).unwrap();
                for px in image.pixels() {
                    assert_eq!(px.0, [12, 34, 56, 0]);
                }
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// A uniform opaque image is always cleared completely.
                #[test]
                fn uniform_image_clears_all_pixels(
                    w in 1u32..16,
                    h in 1u32..16,
                    r in proptest::num::u8::ANY,
                    g in proptest::num::u8::ANY,
                    b in proptest::num::u8::ANY,
                    tolerance in proptest::num::u8::ANY
                ) {
                    let mut image = RgbaImage::from_pixel(w, h, Rgba([r, g, b, 255]));
                    let outcome = flood_fill_transparent(&mut image, 0, 0, tolerance).unwrap();

                    prop_assert_eq!(outcome, FillOutcome::Removed { pixels: (w * h) as usize });
                    for px in image.pixels() {
                        prop_assert_eq!(px.0, [r, g, b, 0]);
                    }
                }

                /// Only the alpha channel is ever written.
                #[test]
                fn rgb_never_changes(
                    colors in proptest::collection::vec(proptest::num::u8::ANY, 27),
                    tolerance in proptest::num::u8::ANY
                ) {
                    let mut image = RgbaImage::new(3, 3);
                    for (i, chunk) in colors.chunks(3).enumerate() {
                        let (x, y) = (i as u32 % 3, i as u32 / 3);
                        image.put_pixel(x, y, Rgba([chunk[0], chunk[1], chunk[2], 255]));
                    }
                    let before = image.clone();

                    flood_fill_transparent(&mut image, 1, 1, tolerance).unwrap();

                    for (after_px, before_px) in image.pixels().zip(before.pixels()) {
                        prop_assert_eq!(&after_px.0[..3], &before_px.0[..3]);
                    }
                }

                /// The reported count equals the number of alpha transitions.
                #[test]
                fn count_matches_cleared_pixels(
                    colors in proptest::collection::vec(proptest::num::u8::ANY, 16),
                    tolerance in proptest::num::u8::ANY
                ) {
                    let mut image = RgbaImage::new(4, 4);
                    for (i, &value) in colors.iter().enumerate() {
                        let (x, y) = (i as u32 % 4, i as u32 / 4);
                        image.put_pixel(x, y, Rgba([value, value, value, 255]));
                    }

                    let outcome = flood_fill_transparent(&mut image, 0, 0, tolerance).unwrap();
                    let cleared = image.pixels().filter(|px| px.0[3] == 0).count();

                    prop_assert_eq!(outcome, FillOutcome::Removed { pixels: cleared });
                }
            }
        }
    }
}
