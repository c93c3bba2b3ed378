use eframe::egui;
use egui::{Color32, Stroke, Vec2};
use image::Rgb;

// ============================================================================
// PaletteStrip: fixed row of selectable swatches
// ============================================================================

/// A selection or colour change, queued for the owner to pick up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwatchChange {
    pub index: usize,
    pub color: Rgb<u8>,
}

/// What the user did to the strip during one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwatchEvent {
    Selected(usize),
    /// Double click: open the colour picker for this swatch.
    EditRequested(usize),
}

pub struct PaletteStrip {
    colors: Vec<Rgb<u8>>,
    selected: usize,
    pending: Vec<SwatchChange>,
}

impl PaletteStrip {
    /// `count` swatches seeded from `seed`; the rest get `fill`.
    pub fn new(seed: &[Rgb<u8>], count: usize, fill: Rgb<u8>) -> Self {
        let mut strip = Self {
            colors: vec![fill; count.max(1)],
            selected: 0,
            pending: Vec::new(),
        };
        strip.reseed(seed, fill);
        strip
    }

    /// Replace every swatch (new picture loaded) and select the first one.
    /// The swatch count never changes.
    pub fn reseed(&mut self, seed: &[Rgb<u8>], fill: Rgb<u8>) {
        for (i, slot) in self.colors.iter_mut().enumerate() {
            *slot = seed.get(i).copied().unwrap_or(fill);
        }
        self.pending.clear();
        self.select(0);
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgb<u8>] {
        &self.colors
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn color(&self, index: usize) -> Option<Rgb<u8>> {
        self.colors.get(index).copied()
    }

    pub fn selected_color(&self) -> Rgb<u8> {
        self.colors[self.selected]
    }

    /// Make `index` the only selected swatch. Out-of-range indices are
    /// ignored.
    pub fn select(&mut self, index: usize) {
        if let Some(&color) = self.colors.get(index) {
            self.selected = index;
            self.pending.push(SwatchChange { index, color });
        }
    }

    /// Recolour a swatch; it becomes the selected one.
    pub fn set_color(&mut self, index: usize, color: Rgb<u8>) {
        if let Some(slot) = self.colors.get_mut(index) {
            *slot = color;
            self.selected = index;
            self.pending.push(SwatchChange { index, color });
        }
    }

    /// Drain the changes made since the last call.
    pub fn take_changes(&mut self) -> Vec<SwatchChange> {
        std::mem::take(&mut self.pending)
    }

    /// Draw the strip. A click selects immediately; a double click also
    /// asks for the colour picker.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<SwatchEvent> {
        let mut event = None;
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = Vec2::new(3.0, 3.0);
            for i in 0..self.colors.len() {
                let (rect, resp) = ui.allocate_exact_size(Vec2::splat(22.0), egui::Sense::click());
                if ui.is_rect_visible(rect) {
                    let p = ui.painter();
                    p.rect_filled(rect, 3.0, to_color32(self.colors[i]));
                    let border = if i == self.selected {
                        Stroke::new(2.5, ui.visuals().selection.stroke.color)
                    } else {
                        Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
                    };
                    p.rect_stroke(rect, 3.0, border);
                }
                let resp = resp.on_hover_text(to_hex(self.colors[i]));
                if resp.double_clicked() {
                    self.select(i);
                    event = Some(SwatchEvent::EditRequested(i));
                } else if resp.clicked() {
                    self.select(i);
                    event = Some(SwatchEvent::Selected(i));
                }
            }
        });
        event
    }
}

pub fn to_color32(c: Rgb<u8>) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

pub fn from_color32(c: Color32) -> Rgb<u8> {
    Rgb([c.r(), c.g(), c.b()])
}

/// `#rrggbb`
pub fn to_hex(c: Rgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2])
}
