// ============================================================================
// Command-line options
// ============================================================================
//
// Usage examples:
//   ColouringPad                                   (blank canvas)
//   ColouringPad dragon.png                        (open a picture at start)
//   ColouringPad dragon.png --granularity 0.004    (bigger fix blobs)
//   ColouringPad --colours 16 --threshold 2.5

use std::path::PathBuf;

use clap::Parser;

use crate::config::PadConfig;
use crate::error::Result;

/// Colouring pad: fill, fix and pick colours on a quantized picture.
#[derive(Parser, Debug)]
#[command(name = "ColouringPad", about = "Colour in PNG pictures")]
pub struct CliArgs {
    /// Picture to open at start.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Number of swatches in the palette strip.
    #[arg(long, default_value_t = 32)]
    pub colours: usize,

    /// Colour limit used when loading and displaying.
    #[arg(long, default_value_t = 32)]
    pub display_colours: usize,

    /// Fix patch size as a fraction of the smaller picture side.
    #[arg(long, default_value_t = 0.002)]
    pub granularity: f32,

    /// Percentage of pixels a colour needs to earn a swatch.
    #[arg(long, default_value_t = 1.0)]
    pub threshold: f32,

    /// Shrink factor used by Adjust.
    #[arg(long, default_value_t = 2)]
    pub adjust_factor: u32,
}

impl CliArgs {
    /// Build and validate the session configuration.
    pub fn to_config(&self) -> Result<PadConfig> {
        let config = PadConfig {
            palette_size: self.colours,
            display_colours: self.display_colours,
            granularity: self.granularity,
            threshold_percent: self.threshold,
            adjust_factor: self.adjust_factor,
            ..PadConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_gives_default_config() {
        let args = CliArgs::try_parse_from(["ColouringPad"]).unwrap();
        assert!(args.file.is_none());
        assert_eq!(args.to_config().unwrap(), PadConfig::default());
    }

    #[test]
    fn options_flow_into_config() {
        let args = CliArgs::try_parse_from([
            "ColouringPad",
            "dragon.png",
            "--colours",
            "16",
            "--granularity",
            "0.004",
            "--threshold",
            "2.5",
        ])
        .unwrap();
        assert_eq!(args.file, Some(PathBuf::from("dragon.png")));
        let config = args.to_config().unwrap();
        assert_eq!(config.palette_size, 16);
        assert_eq!(config.granularity, 0.004);
        assert_eq!(config.threshold_percent, 2.5);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let args = CliArgs::try_parse_from(["ColouringPad", "--adjust-factor", "1"]).unwrap();
        assert!(args.to_config().is_err());
    }
}
