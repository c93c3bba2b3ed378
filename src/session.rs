use egui::Vec2;
use image::Rgb;
use std::path::Path;

use crate::canvas::ZoomController;
use crate::components::palette::PaletteStrip;
use crate::components::tools::{Tool, ToolState};
use crate::config::PadConfig;
use crate::error::Result;
use crate::ops::adjust;
use crate::ops::paint::{self, PaintOutcome};
use crate::project::Project;
use crate::{log_info, log_warn};

/// Everything the colouring pad knows between two input events.
pub struct Session {
    pub config: PadConfig,
    pub project: Project,
    pub palette: PaletteStrip,
    pub tools: ToolState,
    pub zoom: ZoomController,
    /// Where the pointer went down, relative to the picture's top-left.
    pressed_at: Option<Vec2>,
}

impl Session {
    pub fn new(config: PadConfig) -> Self {
        let project = Project::new_blank(&config);
        Self::with_project(config, project)
    }

    pub fn with_project(config: PadConfig, project: Project) -> Self {
        let mut palette =
            PaletteStrip::new(&project.colours, config.palette_size, config.default_colour);
        palette.take_changes();
        Self {
            config,
            project,
            palette,
            tools: ToolState::default(),
            zoom: ZoomController::default(),
            pressed_at: None,
        }
    }

    /// Colour the next Fill or Fix uses.
    pub fn chosen_color(&self) -> Rgb<u8> {
        self.palette.selected_color()
    }

    /// Replace the picture with the one at `path`, reseed the palette and
    /// fit the zoom to `viewport`. On error nothing changes.
    pub fn load(&mut self, path: &Path, viewport: Vec2) -> Result<()> {
        let project = Project::load(path, &self.config)?;
        self.replace_project(project, viewport);
        Ok(())
    }

    pub fn replace_project(&mut self, project: Project, viewport: Vec2) {
        self.project = project;
        self.palette
            .reseed(&self.project.colours, self.config.default_colour);
        self.palette.take_changes();
        self.pressed_at = None;
        self.zoom.fit(self.project.image.dimensions(), viewport);
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.project.save(path)
    }

    /// Switch tools. A change of tool starts a new undo run.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tools.set(tool) {
            self.project.history.reopen();
        }
    }

    /// Pick up swatch selections and recolourings. Any of them starts a new
    /// undo run. Returns true when something changed.
    pub fn apply_palette_changes(&mut self) -> bool {
        let changes = self.palette.take_changes();
        if let Some(last) = changes.last() {
            log_info!("Swatch {} selected ({:?})", last.index, last.color.0);
            self.project.history.reopen();
            true
        } else {
            false
        }
    }

    pub fn press(&mut self, pos: Vec2) {
        self.pressed_at = Some(pos);
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Commit the click at the release point. Only the release position
    /// matters; a release without a press is ignored.
    pub fn release(&mut self, pos: Vec2) -> PaintOutcome {
        if self.pressed_at.take().is_none() {
            return PaintOutcome::Unchanged;
        }
        let pixel = self.zoom.pixel_at(pos, self.project.image.dimensions());
        self.paint_at(pixel)
    }

    /// Apply the active tool at a picture pixel.
    pub fn paint_at(&mut self, pixel: Option<(u32, u32)>) -> PaintOutcome {
        let tool = self.tools.active();
        let color = self.chosen_color();
        let outcome = paint::paint(
            &mut self.project,
            pixel,
            tool,
            color,
            self.config.granularity,
        );
        match outcome {
            PaintOutcome::Sampled(color) => {
                let index = self.palette.selected();
                self.palette.set_color(index, color);
                self.apply_palette_changes();
                self.tools.finish_dropper();
            }
            PaintOutcome::Filled(n) | PaintOutcome::Patched(n) => {
                log_info!("{} at {:?}: {} pixels", tool.label(), pixel, n);
            }
            PaintOutcome::Unchanged => {}
        }
        outcome
    }

    /// Roll back to the snapshot. Returns false when there was none.
    pub fn undo(&mut self) -> bool {
        let undone = self.project.undo().is_some();
        if undone {
            log_info!("Undo");
        }
        undone
    }

    /// Merge thin lines by shrinking and restoring the picture.
    pub fn adjust(&mut self) -> Result<()> {
        let simplified = adjust::simplify(&self.project.image, self.config.adjust_factor)
            .inspect_err(|e| {
                log_warn!("Adjust failed: {}", e);
            })?;
        self.project.snapshot_if_needed();
        self.project.image = simplified;
        self.project.mark_dirty();
        log_info!("Adjusted picture by factor {}", self.config.adjust_factor);
        Ok(())
    }
}
