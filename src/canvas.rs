use eframe::egui;
use egui::{Color32, ColorImage, Pos2, Rect, TextureHandle, TextureOptions, Vec2};
use image::RgbImage;
use rayon::prelude::*;

use crate::error::{PadError, Result};
use crate::ops::quantize;

// ============================================================================
// ZOOM: logarithmic slider <-> percentage
// ============================================================================

pub const SLIDER_MIN: i32 = 1;
pub const SLIDER_MAX: i32 = 14;
/// Slider position that means 100%.
const SLIDER_ORIGIN: i32 = 10;

/// `100 * 2^((slider - 10) / 2)`, rounded to a whole percent.
pub fn percent_for_slider(slider: i32) -> u32 {
    let exp = (slider - SLIDER_ORIGIN) as f64 / 2.0;
    (100.0 * exp.exp2()).round() as u32
}

/// Nearest slider position for a percentage, clamped to the slider range.
pub fn slider_for_percent(percent: f64) -> i32 {
    if percent <= 0.0 {
        return SLIDER_MIN;
    }
    let pos = (percent / 100.0).log2() * 2.0 + SLIDER_ORIGIN as f64;
    (pos.round() as i32).clamp(SLIDER_MIN, SLIDER_MAX)
}

/// Size of the displayed bitmap: `round(side * zoom / 100) + 2`.
pub fn rendered_size(width: u32, height: u32, zoom_percent: u32) -> (u32, u32) {
    let ratio = zoom_percent as f64 / 100.0;
    (
        (width as f64 * ratio).round() as u32 + 2,
        (height as f64 * ratio).round() as u32 + 2,
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomController {
    zoom_percent: u32,
    slider: i32,
    /// Last slider value acted upon; repeats are ignored.
    last_slider: Option<i32>,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self {
            zoom_percent: 100,
            slider: SLIDER_ORIGIN,
            last_slider: None,
        }
    }
}

impl ZoomController {
    pub fn zoom_percent(&self) -> u32 {
        self.zoom_percent
    }

    pub fn slider(&self) -> i32 {
        self.slider
    }

    pub fn ratio(&self) -> f32 {
        self.zoom_percent as f32 / 100.0
    }

    /// Set an exact percentage and move the slider to the closest notch.
    pub fn set_zoom_percent(&mut self, percent: f64) {
        self.zoom_percent = percent.max(1.0).round() as u32;
        self.slider = slider_for_percent(percent);
        self.last_slider = Some(self.slider);
    }

    /// Handle a slider event. Returns true when the zoom changed and the
    /// view must be re-rendered.
    pub fn on_slider_moved(&mut self, value: i32) -> bool {
        let value = value.clamp(SLIDER_MIN, SLIDER_MAX);
        if self.last_slider == Some(value) {
            return false;
        }
        self.last_slider = Some(value);
        self.slider = value;
        self.zoom_percent = percent_for_slider(value);
        true
    }

    /// Zoom so the whole picture fits `viewport`, never above 100%.
    pub fn fit(&mut self, image: (u32, u32), viewport: Vec2) {
        let (w, h) = (image.0.max(1) as f64, image.1.max(1) as f64);
        let (vw, vh) = if viewport.x < 2.0 || viewport.y < 2.0 {
            (w, h)
        } else {
            (viewport.x as f64, viewport.y as f64)
        };
        let ratio = 1.0_f64.min(vw / w).min(vh / h);
        self.set_zoom_percent(ratio * 100.0);
    }

    /// Picture pixel under a point given relative to the bitmap's top-left
    /// corner. `None` outside the picture.
    pub fn pixel_at(&self, pos: Vec2, image: (u32, u32)) -> Option<(u32, u32)> {
        let ratio = self.ratio();
        if ratio <= 0.0 || pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let x = (pos.x / ratio).floor() as u32;
        let y = (pos.y / ratio).floor() as u32;
        (x < image.0 && y < image.1).then_some((x, y))
    }
}

// ============================================================================
// RENDER: quantize, scale, upload
// ============================================================================

/// Quantize `image` to `max_colors`, scale it to the rendered size for
/// `zoom_percent` with nearest-neighbour sampling and return the bitmap.
///
/// Fails without side effects when the bitmap would exceed `max_side` or its
/// buffer cannot be allocated.
pub fn render(
    image: &RgbImage,
    zoom_percent: u32,
    max_colors: usize,
    max_side: usize,
) -> Result<ColorImage> {
    let (w, h) = rendered_size(image.width(), image.height(), zoom_percent);
    if w as usize > max_side || h as usize > max_side {
        return Err(PadError::TooLarge {
            width: w,
            height: h,
            max_side,
        });
    }
    let count = (w as usize)
        .checked_mul(h as usize)
        .ok_or(PadError::OutOfMemory { width: w, height: h })?;
    let mut pixels: Vec<Color32> = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| PadError::OutOfMemory { width: w, height: h })?;
    pixels.resize(count, Color32::BLACK);

    let reduced = quantize::quantize(image, max_colors);
    let (sw, sh) = reduced.dimensions();
    pixels
        .par_chunks_mut(w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let sy = ((y as u64 * sh as u64) / h as u64).min(sh as u64 - 1) as u32;
            for (x, out) in row.iter_mut().enumerate() {
                let sx = ((x as u64 * sw as u64) / w as u64).min(sw as u64 - 1) as u32;
                let p = reduced.get_pixel(sx, sy);
                *out = Color32::from_rgb(p[0], p[1], p[2]);
            }
        });

    Ok(ColorImage {
        size: [w as usize, h as usize],
        pixels,
    })
}

/// Zoom of the bitmap currently on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Displayed {
    zoom: ZoomController,
    size: [usize; 2],
}

/// The scrollable picture view.
#[derive(Default)]
pub struct Canvas {
    texture: Option<TextureHandle>,
    displayed: Option<Displayed>,
}

impl Canvas {
    /// Re-render at the current zoom. On failure the previous bitmap stays up
    /// and the zoom reverts to the one it was rendered at, so the caller can
    /// simply try a smaller zoom.
    pub fn refresh(
        &mut self,
        ctx: &egui::Context,
        image: &RgbImage,
        zoom: &mut ZoomController,
        max_colors: usize,
    ) -> Result<()> {
        let max_side = ctx.input(|i| i.max_texture_side);
        match render(image, zoom.zoom_percent(), max_colors, max_side) {
            Ok(bitmap) => {
                let size = bitmap.size;
                match &mut self.texture {
                    Some(tex) => tex.set(bitmap, TextureOptions::NEAREST),
                    None => {
                        self.texture =
                            Some(ctx.load_texture("picture", bitmap, TextureOptions::NEAREST));
                    }
                }
                self.displayed = Some(Displayed { zoom: *zoom, size });
                Ok(())
            }
            Err(e) => {
                if let Some(shown) = self.displayed {
                    *zoom = shown.zoom;
                }
                Err(e)
            }
        }
    }

    /// Draw the bitmap inside a scroll area. Returns the screen rectangle it
    /// occupies and the visible part of the scroll area, or `None` before the
    /// first render.
    pub fn show(&self, ui: &mut egui::Ui) -> Option<(Rect, Rect)> {
        let (tex, shown) = (self.texture.as_ref()?, self.displayed?);
        let size = Vec2::new(shown.size[0] as f32, shown.size[1] as f32);
        let mut drawn = None;
        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
                ui.painter().image(
                    tex.id(),
                    rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
                drawn = Some((rect, ui.clip_rect()));
            });
        drawn
    }
}
