use image::Rgb;

use crate::error::{PadError, Result};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 128, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
pub const CYAN: Rgb<u8> = Rgb([0, 255, 255]);
pub const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
pub const MAGENTA: Rgb<u8> = Rgb([255, 0, 255]);

/// Palette used until a picture is loaded, and to pad sparse pictures.
pub const DEFAULT_COLOURS: [Rgb<u8>; 8] = [WHITE, BLACK, RED, GREEN, BLUE, CYAN, YELLOW, MAGENTA];

/// Tunables for a colouring session.
#[derive(Clone, Debug, PartialEq)]
pub struct PadConfig {
    /// Number of swatches in the palette strip.
    pub palette_size: usize,
    /// Colour limit applied on load and for every render.
    pub display_colours: usize,
    /// Fraction of the smaller picture side used for the fix patch.
    pub granularity: f32,
    /// Minimum share of pixels (in percent) a colour needs to earn a swatch.
    pub threshold_percent: f32,
    /// Shrink factor used by Adjust.
    pub adjust_factor: u32,
    /// Colour of swatches beyond the derived palette.
    pub default_colour: Rgb<u8>,
    pub default_colours: Vec<Rgb<u8>>,
    /// Size of the blank canvas shown before anything is loaded.
    pub blank_size: (u32, u32),
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            palette_size: 32,
            display_colours: 32,
            granularity: 0.002,
            threshold_percent: 1.0,
            adjust_factor: 2,
            default_colour: WHITE,
            default_colours: DEFAULT_COLOURS.to_vec(),
            blank_size: (800, 600),
        }
    }
}

impl PadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.palette_size == 0 {
            return Err(PadError::Config("palette needs at least one swatch".into()));
        }
        // NeuQuant needs a few network neurons to work with.
        if !(4..=256).contains(&self.display_colours) {
            return Err(PadError::Config(format!(
                "display colours must be between 4 and 256, got {}",
                self.display_colours
            )));
        }
        if !(0.0..=1.0).contains(&self.granularity) {
            return Err(PadError::Config(format!(
                "granularity must be between 0 and 1, got {}",
                self.granularity
            )));
        }
        if !(0.0..=100.0).contains(&self.threshold_percent) {
            return Err(PadError::Config(format!(
                "threshold must be a percentage, got {}",
                self.threshold_percent
            )));
        }
        if self.adjust_factor < 2 {
            return Err(PadError::Config(format!(
                "adjust factor must be at least 2, got {}",
                self.adjust_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PadConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.palette_size, 32);
        assert_eq!(config.default_colours.len(), 8);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            PadConfig { palette_size: 0, ..Default::default() },
            PadConfig { display_colours: 1, ..Default::default() },
            PadConfig { granularity: 1.5, ..Default::default() },
            PadConfig { threshold_percent: -1.0, ..Default::default() },
            PadConfig { adjust_factor: 1, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(PadError::Config(_))), "{:?}", config);
        }
    }
}
