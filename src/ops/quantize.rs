// ============================================================================
// QUANTIZATION: colour reduction and histogram palette
// ============================================================================

use image::{Rgb, RgbImage};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Count pixels per colour.
pub fn color_histogram(image: &RgbImage) -> HashMap<[u8; 3], u32> {
    let mut counts: HashMap<[u8; 3], u32> = HashMap::new();
    for p in image.pixels() {
        *counts.entry(p.0).or_insert(0) += 1;
    }
    counts
}

/// True when the picture uses at most `limit` distinct colours.
fn fits_in(image: &RgbImage, limit: usize) -> bool {
    let mut seen: HashSet<[u8; 3]> = HashSet::with_capacity(limit + 1);
    for p in image.pixels() {
        seen.insert(p.0);
        if seen.len() > limit {
            return false;
        }
    }
    true
}

/// Reduce the picture to at most `max_colors` colours.
///
/// Pictures that already fit are returned unchanged, so flat line art keeps
/// its exact colours. Everything else goes through NeuQuant and each pixel is
/// snapped to its nearest palette entry.
pub fn quantize(image: &RgbImage, max_colors: usize) -> RgbImage {
    if fits_in(image, max_colors) {
        return image.clone();
    }

    let rgba: Vec<u8> = image
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2], 255])
        .collect();
    let nq = color_quant::NeuQuant::new(10, max_colors, &rgba);
    let palette = nq.color_map_rgb();

    let mut out = image.clone();
    let buf: &mut [u8] = &mut out;
    buf.par_chunks_exact_mut(3).for_each(|px| {
        let idx = nq.index_of(&[px[0], px[1], px[2], 255]);
        px.copy_from_slice(&palette[idx * 3..idx * 3 + 3]);
    });
    out
}

/// Build the swatch list for a (quantized) picture.
///
/// Colours covering more than `threshold_percent` of the pixels are kept.
/// When fewer than `defaults.len()` survive, the defaults are appended
/// (skipping ones already present). The result is sorted by RGB value,
/// truncated to `size` and padded with `pad` up to `size`.
pub fn derive_palette(
    image: &RgbImage,
    threshold_percent: f32,
    defaults: &[Rgb<u8>],
    size: usize,
    pad: Rgb<u8>,
) -> Vec<Rgb<u8>> {
    let enough = image.width() as f64 * image.height() as f64 * threshold_percent as f64 / 100.0;

    let mut used: Vec<[u8; 3]> = color_histogram(image)
        .into_iter()
        .filter(|&(_, count)| count as f64 > enough)
        .map(|(color, _)| color)
        .collect();

    if used.len() < defaults.len() {
        for d in defaults {
            if !used.contains(&d.0) {
                used.push(d.0);
            }
        }
    }

    used.sort_unstable();
    used.truncate(size);

    let mut palette: Vec<Rgb<u8>> = used.into_iter().map(Rgb).collect();
    palette.resize(size, pad);
    palette
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BLUE, DEFAULT_COLOURS, RED, WHITE};

    fn red_and_blue() -> RgbImage {
        // 90 red pixels, 10 blue ones
        RgbImage::from_fn(10, 10, |_, y| if y == 9 { BLUE } else { RED })
    }

    #[test]
    fn histogram_counts_every_pixel() {
        let counts = color_histogram(&red_and_blue());
        assert_eq!(counts[&RED.0], 90);
        assert_eq!(counts[&BLUE.0], 10);
        assert_eq!(counts.values().sum::<u32>(), 100);
    }

    #[test]
    fn few_colours_survive_quantization_exactly() {
        let img = red_and_blue();
        assert_eq!(quantize(&img, 32), img);
    }

    #[test]
    fn gradient_is_reduced_to_limit() {
        let img = RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, 128]));
        let out = quantize(&img, 16);
        assert_eq!(out.dimensions(), img.dimensions());
        assert!(color_histogram(&out).len() <= 16);
    }

    #[test]
    fn palette_keeps_dominant_colours() {
        let palette = derive_palette(&red_and_blue(), 1.0, &DEFAULT_COLOURS, 32, WHITE);
        assert_eq!(palette.len(), 32);
        assert!(palette.contains(&RED));
        assert!(palette.contains(&BLUE));
    }

    #[test]
    fn uniform_picture_is_padded_with_defaults() {
        let img = RgbImage::from_pixel(20, 20, Rgb([12, 34, 56]));
        let palette = derive_palette(&img, 1.0, &DEFAULT_COLOURS, 32, WHITE);
        assert!(palette.contains(&Rgb([12, 34, 56])));
        for d in DEFAULT_COLOURS {
            assert!(palette.contains(&d), "missing default {:?}", d);
        }
    }

    #[test]
    fn rare_colours_are_dropped() {
        // one stray pixel in 400 is below 1%
        let mut img = RgbImage::from_pixel(20, 20, WHITE);
        img.put_pixel(3, 3, Rgb([1, 2, 3]));
        let palette = derive_palette(&img, 1.0, &DEFAULT_COLOURS, 32, WHITE);
        assert!(!palette.contains(&Rgb([1, 2, 3])));
    }

    #[test]
    fn palette_is_sorted_then_padded() {
        let palette = derive_palette(&red_and_blue(), 1.0, &DEFAULT_COLOURS, 32, WHITE);
        let distinct = &palette[..8];
        assert!(distinct.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(palette[8..].iter().all(|&c| c == WHITE));
    }
}
