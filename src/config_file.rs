use crate::cli::{Args, Direction};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Saved defaults merged under explicitly-passed command-line arguments.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub directory: Option<String>,
    pub direction: Option<String>,
    pub json: Option<bool>,
    pub yes: Option<bool>,
    pub verbose: Option<bool>,
}

impl Args {
    /// Load configuration from a JSON file and merge with command-line
    /// arguments. Command-line arguments take precedence over config values.
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            let config: ConfigFile = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

            self.merge_from_config(config);

            if self.verbose {
                eprintln!("Loaded configuration from: {:?}", config_path);
            }
        }
        Ok(())
    }

    fn merge_from_config(&mut self, config: ConfigFile) {
        if self.directory.is_none() {
            if let Some(directory) = config.directory {
                self.directory = Some(PathBuf::from(directory));
            }
        }

        if self.direction.is_none() {
            self.direction = match config.direction.as_deref() {
                Some("png-to-webp") => Some(Direction::PngToWebp),
                Some("webp-to-png") => Some(Direction::WebpToPng),
                _ => None,
            };
        }

        self.json |= config.json.unwrap_or(false);
        self.yes |= config.yes.unwrap_or(false);
        self.verbose |= config.verbose.unwrap_or(false);
    }
}
