// ============================================================================
// PAINT: flood fill, fix patch and colour sampling
// ============================================================================

use image::{Rgb, RgbImage};

use crate::components::tools::Tool;
use crate::project::Project;

/// What a paint request did to the picture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintOutcome {
    /// Flood fill recoloured this many pixels.
    Filled(usize),
    /// Fix patch covered this many pixels.
    Patched(usize),
    /// Dropper read this colour; the picture is untouched.
    Sampled(Rgb<u8>),
    /// Outside the picture, or nothing to change.
    Unchanged,
}

impl PaintOutcome {
    pub fn changed_image(&self) -> bool {
        matches!(self, PaintOutcome::Filled(_) | PaintOutcome::Patched(_))
    }
}

/// Recolour every 4-connected pixel that exactly matches the seed colour.
/// Returns the number of pixels changed (0 when the seed is out of bounds or
/// already `color`).
pub fn flood_fill(image: &mut RgbImage, x: u32, y: u32, color: Rgb<u8>) -> usize {
    let (w, h) = image.dimensions();
    if x >= w || y >= h {
        return 0;
    }
    let target = *image.get_pixel(x, y);
    if target == color {
        return 0;
    }

    // Pixels are recoloured as they are pushed, so the image doubles as the
    // visited set.
    let mut stack: Vec<(u32, u32)> = Vec::with_capacity(1024);
    image.put_pixel(x, y, color);
    stack.push((x, y));
    let mut filled = 1;

    while let Some((px, py)) = stack.pop() {
        let mut visit = |nx: u32, ny: u32, stack: &mut Vec<(u32, u32)>| {
            if *image.get_pixel(nx, ny) == target {
                image.put_pixel(nx, ny, color);
                stack.push((nx, ny));
                filled += 1;
            }
        };
        if px > 0 {
            visit(px - 1, py, &mut stack);
        }
        if px + 1 < w {
            visit(px + 1, py, &mut stack);
        }
        if py > 0 {
            visit(px, py - 1, &mut stack);
        }
        if py + 1 < h {
            visit(px, py + 1, &mut stack);
        }
    }
    filled
}

/// Half-width of the fix patch for a picture of the given size.
pub fn fix_half_width(width: u32, height: u32, granularity: f32) -> u32 {
    (width.min(height) as f32 * granularity / 2.0).floor() as u32
}

/// Fill the square `[x - delta, x + delta] × [y - delta, y + delta]`,
/// clipped to the picture. Returns the number of pixels covered.
pub fn fix_patch(image: &mut RgbImage, x: u32, y: u32, delta: u32, color: Rgb<u8>) -> usize {
    let (w, h) = image.dimensions();
    if x >= w || y >= h {
        return 0;
    }
    let x0 = x.saturating_sub(delta);
    let y0 = y.saturating_sub(delta);
    let x1 = x.saturating_add(delta).min(w - 1);
    let y1 = y.saturating_add(delta).min(h - 1);
    for py in y0..=y1 {
        for px in x0..=x1 {
            image.put_pixel(px, py, color);
        }
    }
    ((x1 - x0 + 1) * (y1 - y0 + 1)) as usize
}

/// Colour under the dropper, `None` outside the picture.
pub fn sample(image: &RgbImage, x: u32, y: u32) -> Option<Rgb<u8>> {
    if x < image.width() && y < image.height() {
        Some(*image.get_pixel(x, y))
    } else {
        None
    }
}

/// Apply `tool` at `pos` (picture coordinates).
///
/// Fill and Fix take an undo snapshot first (when the gate allows) and mark
/// the project dirty once pixels actually change. Dropper never touches the
/// picture; the caller decides what to do with the sampled colour.
pub fn paint(
    project: &mut Project,
    pos: Option<(u32, u32)>,
    tool: Tool,
    color: Rgb<u8>,
    granularity: f32,
) -> PaintOutcome {
    let Some((x, y)) = pos else {
        return PaintOutcome::Unchanged;
    };
    let Some(target) = sample(project.current(), x, y) else {
        return PaintOutcome::Unchanged;
    };

    match tool {
        Tool::Fill => {
            if target == color {
                return PaintOutcome::Unchanged;
            }
            project.snapshot_if_needed();
            let n = flood_fill(&mut project.image, x, y, color);
            project.mark_dirty();
            PaintOutcome::Filled(n)
        }
        Tool::Fix => {
            let (w, h) = project.image.dimensions();
            let delta = fix_half_width(w, h, granularity);
            project.snapshot_if_needed();
            let n = fix_patch(&mut project.image, x, y, delta, color);
            project.mark_dirty();
            PaintOutcome::Patched(n)
        }
        Tool::Dropper => PaintOutcome::Sampled(target),
    }
}
