use eframe::egui;
use egui::Color32;
use image::Rgb;

use super::palette::{from_color32, to_color32};

fn centered(title: &str) -> egui::Window<'static> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

// ============================================================================
// Colour picker for one swatch
// ============================================================================

pub enum ColourDialogResult {
    Accepted { index: usize, color: Rgb<u8> },
    Cancelled,
}

#[derive(Default)]
pub struct ColourDialog {
    /// Swatch being edited and the working colour.
    editing: Option<(usize, Color32)>,
}

impl ColourDialog {
    /// Open seeded with the swatch's current colour.
    pub fn open(&mut self, index: usize, current: Rgb<u8>) {
        self.editing = Some((index, to_color32(current)));
    }

    pub fn is_open(&self) -> bool {
        self.editing.is_some()
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<ColourDialogResult> {
        let (index, mut working) = self.editing?;
        let mut result = None;
        centered("Change colour").show(ctx, |ui| {
            egui::color_picker::color_picker_color32(
                ui,
                &mut working,
                egui::color_picker::Alpha::Opaque,
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    result = Some(ColourDialogResult::Accepted {
                        index,
                        color: from_color32(working),
                    });
                }
                if ui.button("Cancel").clicked() {
                    result = Some(ColourDialogResult::Cancelled);
                }
            });
        });
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            result = Some(ColourDialogResult::Cancelled);
        }
        self.editing = if result.is_some() {
            None
        } else {
            Some((index, working))
        };
        result
    }
}

// ============================================================================
// Yes / No confirmation
// ============================================================================

/// Actions that must be confirmed while the picture has unsaved changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    Load,
    Exit,
}

impl ConfirmAction {
    fn question(self) -> &'static str {
        match self {
            ConfirmAction::Load => "Do you want to load without saving it?",
            ConfirmAction::Exit => "Do you want to quit without saving it?",
        }
    }
}

#[derive(Default)]
pub struct ConfirmDialog {
    pending: Option<ConfirmAction>,
}

impl ConfirmDialog {
    pub fn ask(&mut self, action: ConfirmAction) {
        self.pending = Some(action);
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the action once the user says yes. "No" just closes.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<ConfirmAction> {
        let action = self.pending?;
        let mut yes = false;
        let mut no = false;
        centered("Colouring Pad")
            .id(egui::Id::new("confirm_dialog"))
            .show(ctx, |ui| {
                ui.label("Unsaved picture!");
                ui.label(action.question());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    yes = ui.button("Yes").clicked();
                    no = ui.button("No").clicked();
                });
            });
        if yes || no {
            self.pending = None;
        }
        yes.then_some(action)
    }
}

// ============================================================================
// Error / information messages
// ============================================================================

#[derive(Default)]
pub struct MessageDialog {
    message: Option<(String, String)>,
}

impl MessageDialog {
    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some(("Colouring Pad - Oops!".to_string(), text.into()));
    }

    pub fn is_open(&self) -> bool {
        self.message.is_some()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let Some((title, text)) = &self.message else {
            return;
        };
        let mut close = false;
        centered(title).show(ctx, |ui| {
            ui.label(text.as_str());
            ui.add_space(8.0);
            close = ui.button("OK").clicked();
        });
        if close {
            self.message = None;
        }
    }
}

/// Small "Please wait" window shown while a slow operation is queued.
pub fn show_wait(ctx: &egui::Context, what: &str) {
    egui::Window::new("Please Wait")
        .collapsible(false)
        .resizable(false)
        .title_bar(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(what);
            });
        });
}
