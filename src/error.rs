//! Error types for the colouring pad.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PadError {
    #[error("Could not open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read picture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Could not write picture {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Not enough memory to magnify that far ({width}x{height})")]
    OutOfMemory { width: u32, height: u32 },

    #[error("{width}x{height} is larger than the display allows ({max_side} pixels per side)")]
    TooLarge {
        width: u32,
        height: u32,
        max_side: usize,
    },

    #[error("Picture is too small to adjust ({width}x{height})")]
    TooSmall { width: u32, height: u32 },

    #[error("Invalid setting: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PadError>;
