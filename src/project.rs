use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

use crate::components::history::UndoHistory;
use crate::config::PadConfig;
use crate::error::Result;
use crate::io;
use crate::ops::quantize;
use crate::{log_info, log_warn};

/// The picture being coloured, its derived palette and its undo snapshot.
pub struct Project {
    pub image: RgbImage,
    pub history: UndoHistory,
    /// `None` until the picture was loaded from or saved to disk.
    pub path: Option<PathBuf>,
    pub is_dirty: bool,
    /// Display name (file name or "Untitled")
    pub name: String,
    /// Swatches derived from the picture at load time.
    pub colours: Vec<Rgb<u8>>,
}

impl Project {
    /// Blank canvas in the default colour with the default palette.
    pub fn new_blank(config: &PadConfig) -> Self {
        let (w, h) = config.blank_size;
        Self {
            image: RgbImage::from_pixel(w, h, config.default_colour),
            history: UndoHistory::new(),
            path: None,
            is_dirty: false,
            name: "Untitled".to_string(),
            colours: config.default_colours.clone(),
        }
    }

    /// Build a project from an already decoded picture: quantize it and
    /// derive the palette.
    pub fn from_image(image: RgbImage, path: Option<PathBuf>, config: &PadConfig) -> Self {
        let image = quantize::quantize(&image, config.display_colours);
        let colours = quantize::derive_palette(
            &image,
            config.threshold_percent,
            &config.default_colours,
            config.palette_size,
            config.default_colour,
        );
        let mut project = Self {
            image,
            history: UndoHistory::new(),
            path,
            is_dirty: false,
            name: String::new(),
            colours,
        };
        project.update_name_from_path();
        project
    }

    pub fn load(path: &Path, config: &PadConfig) -> Result<Self> {
        let image = io::load_image(path)?;
        log_info!(
            "Loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self::from_image(image, Some(path.to_path_buf()), config))
    }

    /// Write the picture as PNG. The project becomes clean and the next
    /// mutation takes a fresh undo snapshot.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        io::save_png(&self.image, path)?;
        log_info!("Saved {}", path.display());
        self.path = Some(path.to_path_buf());
        self.update_name_from_path();
        self.mark_clean();
        self.history.reopen();
        Ok(())
    }

    pub fn current(&self) -> &RgbImage {
        &self.image
    }

    pub fn snapshot_if_needed(&mut self) -> bool {
        self.history.snapshot_if_needed(&self.image)
    }

    /// Restore the snapshot. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&RgbImage> {
        match self.history.take() {
            Some(previous) => {
                self.image = previous;
                self.mark_dirty();
                Some(&self.image)
            }
            None => {
                log_warn!("Nothing to undo");
                None
            }
        }
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    pub fn update_name_from_path(&mut self) {
        self.name = self
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string());
    }

    /// Name with dirty indicator
    pub fn display_title(&self) -> String {
        if self.is_dirty {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RED, WHITE};

    fn small_config() -> PadConfig {
        PadConfig {
            blank_size: (4, 4),
            ..PadConfig::default()
        }
    }

    #[test]
    fn blank_project_is_clean_and_white() {
        let project = Project::new_blank(&small_config());
        assert!(!project.is_dirty);
        assert!(project.current().pixels().all(|p| *p == WHITE));
        assert_eq!(project.display_title(), "Untitled");
        assert!(!project.history.can_undo());
    }

    #[test]
    fn undo_restores_and_then_is_empty() {
        let mut project = Project::new_blank(&small_config());
        let before = project.current().clone();
        project.snapshot_if_needed();
        project.image.put_pixel(1, 1, RED);
        assert!(project.undo().is_some());
        assert_eq!(project.current(), &before);
        assert!(project.undo().is_none());
        assert_eq!(project.current(), &before);
    }

    #[test]
    fn save_cleans_and_names_project() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");
        let mut project = Project::new_blank(&small_config());
        project.mark_dirty();
        assert_eq!(project.display_title(), "Untitled*");
        project.save(&path).unwrap();
        assert!(!project.is_dirty);
        assert_eq!(project.display_title(), "sheet.png");
        assert_eq!(project.path.as_deref(), Some(path.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn failed_save_stays_dirty() {
        let mut project = Project::new_blank(&small_config());
        project.mark_dirty();
        assert!(project.save(Path::new("/dev/full")).is_err());
        assert!(project.is_dirty);
        assert_eq!(project.path, None);
    }

    #[test]
    fn load_derives_palette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");
        let img = RgbImage::from_fn(10, 10, |x, _| if x < 5 { RED } else { WHITE });
        io::save_png(&img, &path).unwrap();

        let config = small_config();
        let project = Project::load(&path, &config).unwrap();
        assert_eq!(project.current(), &img);
        assert_eq!(project.colours.len(), config.palette_size);
        assert!(project.colours.contains(&RED));
        assert!(!project.is_dirty);
    }
}
