use crate::extractor::types::image::DEFAULT_IMAGE_MAX_FILE_SIZE;
use crate::extractor::types::ImageExtractor;
use crate::models::{ExtractOptions, DEFAULT_MAX_FILE_SIZE, DEFAULT_TIMEOUT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration loaded from settings.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub image: ImageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Maximum raw content size in bytes (0 = unlimited)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Per-file deadline in seconds (0 = no deadline)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub preserve_formatting: bool,
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            timeout_secs: default_timeout_secs(),
            preserve_formatting: false,
            ocr_language: default_ocr_language(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_image_max_file_size")]
    pub max_file_size: u64,
}

fn default_image_max_file_size() -> u64 {
    DEFAULT_IMAGE_MAX_FILE_SIZE
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_image_max_file_size(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration from default location or return defaults
    pub fn load() -> Result<Self> {
        let default_paths = [
            "config/settings.toml",
            "./config/settings.toml",
            "~/.config/filetext/settings.toml",
        ];

        for raw in default_paths {
            let path = PathBuf::from(shellexpand::tilde(raw).as_ref());
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// Per-call options derived from the `[extract]` section
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            file_type: String::new(),
            ocr_language: self.extract.ocr_language.clone(),
            max_file_size: self.extract.max_file_size,
            timeout: match self.extract.timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            preserve_formatting: self.extract.preserve_formatting,
        }
    }

    /// Image extractor with the `[image]` size cap
    pub fn image_extractor(&self) -> ImageExtractor {
        ImageExtractor::with_max_file_size(self.image.max_file_size)
    }
}
