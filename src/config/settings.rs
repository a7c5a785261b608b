use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::core::Size;
use crate::domain::grid::{Grid, GridError};
use crate::domain::margin::MarginCorrector;

/// Directory under the home directory holding settings and layouts
pub const CONFIG_DIR_NAME: &str = ".gridwm";
/// Settings file name inside [`CONFIG_DIR_NAME`]
pub const SETTINGS_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// User settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cells per side of the grid
    pub blocks: u32,
    /// Gap kept around snapped windows, in screen pixels
    pub margin: i32,
    /// Grid surface size in grid pixels
    pub surface: Size,
    /// Size windows are shrunk to before a restore moves them
    pub transitional_size: Size,
    /// Where named layouts are written
    pub layout_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blocks: Grid::DEFAULT_BLOCKS,
            margin: 20,
            surface: Size::new(200, 200),
            transitional_size: Size::new(100, 100),
            layout_dir: default_config_dir(),
        }
    }
}

impl Settings {
    /// Loads settings
    ///
    /// An explicit path must exist. Without one, the default settings file
    /// is used when present and the built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => Self::load_file(path)?,
            None => {
                let default_path = default_config_dir().join(SETTINGS_FILE_NAME);
                if default_path.is_file() {
                    Self::load_file(&default_path)?
                } else {
                    debug!(path = %default_path.display(), "no settings file, using defaults");
                    Self::default()
                }
            }
        };

        settings.validate()?;
        Ok(settings)
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings");

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks the settings can drive a grid session
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blocks == 0 {
            return Err(ConfigError::Invalid {
                field: "blocks",
                reason: "must be at least 1".into(),
            });
        }

        let min_side = self.blocks as i64;
        if (self.surface.w as i64) < min_side || (self.surface.h as i64) < min_side {
            return Err(ConfigError::Invalid {
                field: "surface",
                reason: format!(
                    "{}x{} is smaller than {} blocks per side",
                    self.surface.w, self.surface.h, self.blocks
                ),
            });
        }

        if self.surface.w != self.surface.h {
            return Err(ConfigError::Invalid {
                field: "surface",
                reason: format!("{}x{} is not square", self.surface.w, self.surface.h),
            });
        }

        if self.margin < 0 {
            return Err(ConfigError::Invalid {
                field: "margin",
                reason: format!("{} is negative", self.margin),
            });
        }

        if self.transitional_size.w <= 0 || self.transitional_size.h <= 0 {
            return Err(ConfigError::Invalid {
                field: "transitional_size",
                reason: "both sides must be positive".into(),
            });
        }

        Ok(())
    }

    /// Builds the grid described by these settings
    pub fn grid(&self) -> Result<Grid, ConfigError> {
        Ok(Grid::new(self.blocks, self.surface)?)
    }

    pub fn margin_corrector(&self) -> MarginCorrector {
        MarginCorrector::new(self.margin, self.blocks)
    }
}

/// Returns `~/.gridwm`, or a relative `.gridwm` without a home directory
pub fn default_config_dir() -> PathBuf {
    let home = env::var_os("HOME").or_else(|| env::var_os("USERPROFILE"));
    match home {
        Some(home) => PathBuf::from(home).join(CONFIG_DIR_NAME),
        None => PathBuf::from(CONFIG_DIR_NAME),
    }
}
