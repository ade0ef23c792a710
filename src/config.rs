//! Configuration file handling for console-mosaic.
//!
//! Loads configuration from `~/.config/console-mosaic/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::console::ImageProtocol;
use crate::scheduler::OutputMode;

/// Configuration file structure.
/// Every field is optional; CLI flags take precedence over anything set here.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub text: TextConfig,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct PlaybackConfig {
    /// Output mode on start
    #[serde(default)]
    pub mode: Option<OutputMode>,
    /// Start playing without waiting for Space
    #[serde(default)]
    pub autoplay: bool,
    /// Restart the video when it ends
    #[serde(default, rename = "loop")]
    pub looping: bool,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ImageConfig {
    /// Sampling width in cells
    #[serde(default)]
    pub sample_width: Option<u32>,
    /// On-screen width of the image in terminal columns
    #[serde(default)]
    pub columns: Option<u16>,
    /// Inline image protocol: iterm or kitty
    #[serde(default)]
    pub protocol: Option<ImageProtocol>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct TextConfig {
    /// Frames between console clears
    #[serde(default)]
    pub clear_threshold: Option<u32>,
}

/// Commented default file written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# console-mosaic configuration

[playback]
# Output mode on start: image or text
mode = "image"
# Start playing immediately
autoplay = false
# Restart the video when it ends
loop = false

[image]
# Sampling width in cells (1-400)
sample_width = 100
# On-screen width in terminal columns
columns = 64
# Inline image protocol: iterm or kitty
protocol = "iterm"

[text]
# Frames logged before the console is cleared (1-100)
clear_threshold = 20
"#;

impl Config {
    /// Load configuration from a file path (or the default path).
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a path that must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write [`DEFAULT_CONFIG`] to `path`, creating parent directories.
    ///
    /// Refuses to overwrite an existing file.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        let io_err = |e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, DEFAULT_CONFIG).map_err(io_err)
    }
}

/// Errors that can occur when loading or writing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("console-mosaic").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/console-mosaic/config.toml")
        })
}
