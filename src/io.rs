use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbImage};
use rfd::FileDialog;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{PadError, Result};

/// Decode a picture and flatten it to RGB.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|source| PadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Encode `image` as PNG at `path`.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| PadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let encoder = PngEncoder::new(&mut writer);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ColorType::Rgb8,
        )
        .map_err(|source| PadError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    // Buffered bytes only hit the disk here; a full disk shows up now.
    writer.flush().map_err(|source| PadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Give the chosen name a `.png` extension; the file is always written as PNG.
pub fn with_png_extension(path: PathBuf) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("png") => path,
        _ => path.with_extension("png"),
    }
}

/// Native open/save dialogs that remember the last directory used.
pub struct FileHandler {
    pub last_dir: Option<PathBuf>,
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHandler {
    pub fn new() -> Self {
        Self {
            last_dir: std::env::current_dir().ok(),
        }
    }

    /// Remember the directory of a file that was just loaded or saved.
    pub fn remember(&mut self, path: &Path) {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            self.last_dir = Some(parent.to_path_buf());
        }
    }

    fn dialog(&self, title: &str) -> FileDialog {
        let mut dialog = FileDialog::new()
            .set_title(title)
            .add_filter("picture files", &["png"])
            .add_filter("all files", &["*"]);
        if let Some(dir) = &self.last_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog
    }

    /// `None` when the user cancels.
    pub fn pick_open(&self) -> Option<PathBuf> {
        self.dialog("Load picture").pick_file()
    }

    /// `None` when the user cancels.
    pub fn pick_save(&self, suggested_name: &str) -> Option<PathBuf> {
        self.dialog("Save picture")
            .set_file_name(suggested_name)
            .save_file()
            .map(with_png_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn png_round_trip_keeps_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pic.png");
        let mut img = RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]));
        img.put_pixel(2, 1, Rgb([200, 0, 0]));

        save_png(&img, &path).unwrap();
        let back = load_image(&path).unwrap();
        assert_eq!(back, img);
    }

    #[cfg(unix)]
    #[test]
    fn write_to_full_disk_is_an_error() {
        let img = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
        let err = save_png(&img, Path::new("/dev/full")).unwrap_err();
        assert!(matches!(err, PadError::Io { .. } | PadError::Encode { .. }));
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, PadError::Decode { .. }));
    }

    #[test]
    fn extension_forced_to_png() {
        assert_eq!(with_png_extension("a/pic".into()), PathBuf::from("a/pic.png"));
        assert_eq!(with_png_extension("a/pic.PNG".into()), PathBuf::from("a/pic.PNG"));
        assert_eq!(with_png_extension("a/pic.jpg".into()), PathBuf::from("a/pic.png"));
    }

    #[test]
    fn remember_tracks_parent_directory() {
        let mut handler = FileHandler { last_dir: None };
        handler.remember(Path::new("pic.png"));
        assert_eq!(handler.last_dir, None);
        handler.remember(Path::new("/tmp/pics/pic.png"));
        assert_eq!(handler.last_dir, Some(PathBuf::from("/tmp/pics")));
    }
}
