use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::error::{PadError, Result};

/// Shrink by `factor` with area averaging, then scale back to the original
/// size. Thin anti-aliased lines merge into solid ones, which leaves fewer
/// stray pixels for the flood fill to trip over.
pub fn simplify(image: &RgbImage, factor: u32) -> Result<RgbImage> {
    let (w, h) = image.dimensions();
    let sw = w / factor.max(1);
    let sh = h / factor.max(1);
    if sw == 0 || sh == 0 {
        return Err(PadError::TooSmall {
            width: w,
            height: h,
        });
    }
    let small = imageops::thumbnail(image, sw, sh);
    Ok(imageops::resize(&small, w, h, FilterType::CatmullRom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn keeps_dimensions() {
        let img = RgbImage::from_fn(31, 17, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 0]));
        let out = simplify(&img, 2).unwrap();
        assert_eq!(out.dimensions(), (31, 17));
    }

    #[test]
    fn flat_picture_stays_flat() {
        let img = RgbImage::from_pixel(20, 20, Rgb([90, 160, 30]));
        let out = simplify(&img, 2).unwrap();
        assert!(out.pixels().all(|p| *p == Rgb([90, 160, 30])));
    }

    #[test]
    fn tiny_picture_is_rejected() {
        let img = RgbImage::from_pixel(1, 40, Rgb([0, 0, 0]));
        assert!(matches!(simplify(&img, 2), Err(PadError::TooSmall { width: 1, height: 40 })));
    }
}
