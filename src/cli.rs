use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::conversion::ConversionDirection;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Direction {
    /// Convert every PNG in the directory to WebP
    #[value(name = "png-to-webp")]
    PngToWebp,
    /// Convert every WebP in the directory to PNG
    #[value(name = "webp-to-png")]
    WebpToPng,
}

impl From<Direction> for ConversionDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::PngToWebp => ConversionDirection::PngToWebp,
            Direction::WebpToPng => ConversionDirection::WebpToPng,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "webpng",
    about = "Convert PNG and WebP images in a local directory, in place",
    long_about = "
webpng - PNG / WebP directory converter

Scans one directory (no recursion), inventories the PNG and WebP images it
holds, and converts them in the chosen direction. Converted files are written
back to the same directory under the source name with the target extension;
existing files of that name are overwritten. Everything runs locally, one
file at a time.

Example Usage:
  # List the images in a directory without converting anything
  webpng ~/Pictures

  # Convert every PNG to WebP, next to the originals
  webpng ~/Pictures --convert png-to-webp

  # Convert back, skipping the interactive access prompt
  webpng ~/Pictures --convert webp-to-png --yes

  # Machine-readable output for scripts and GUIs
  webpng ~/Pictures --convert png-to-webp --json

  # Load defaults from a saved configuration
  webpng --config-file ~/.config/webpng.json"
)]
pub struct Args {
    /// Directory whose images are inventoried and converted in place
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Conversion to run; omit to only list the directory's images
    #[arg(short = 'c', long = "convert", value_name = "DIRECTION")]
    pub direction: Option<Direction>,

    /// Emit JSON lines instead of styled output
    #[arg(long = "json")]
    pub json: bool,

    /// Treat directory access as granted instead of prompting
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Enable verbose output with configuration detail
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Load defaults from a JSON config file (explicit flags win)
    #[arg(long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}


// Default implementation for tests
#[cfg(test)]
impl Default for Args {
    fn default() -> Self {
        Self {
            directory: None,
            direction: None,
            json: false,
            yes: false,
            verbose: false,
            config_file: None,
        }
    }
}
