//! Pipeline configuration loaded from TOML.
//!
//! Every section is optional; an empty file yields the defaults
//! (SMA 50/200, the built-in date layouts, `nifty_cleaned.csv`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::{DEFAULT_DATE_FORMATS, DEFAULT_EXPORT_FILE};
use crate::domain::SmaWindows;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default)]
    pub windows: WindowsConfig,
    #[serde(default)]
    pub dates: DatesConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowsConfig {
    #[serde(default = "default_fast")]
    pub fast: usize,
    #[serde(default = "default_slow")]
    pub slow: usize,
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            fast: default_fast(),
            slow: default_slow(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatesConfig {
    #[serde(default = "default_date_formats")]
    pub formats: Vec<String>,
}

impl Default for DatesConfig {
    fn default() -> Self {
        Self {
            formats: default_date_formats(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

fn default_fast() -> usize {
    50
}

fn default_slow() -> usize {
    200
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect()
}

fn default_file_name() -> String {
    DEFAULT_EXPORT_FILE.to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl PipelineConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let WindowsConfig { fast, slow } = self.windows;
        if fast < 1 {
            return Err(ConfigError::Invalid("windows.fast must be >= 1".into()));
        }
        if slow <= fast {
            return Err(ConfigError::Invalid(format!(
                "windows.slow ({slow}) must be greater than windows.fast ({fast})"
            )));
        }
        if self.dates.formats.is_empty() {
            return Err(ConfigError::Invalid(
                "dates.formats must list at least one format".into(),
            ));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid("export.file_name must not be empty".into()));
        }
        Ok(())
    }

    pub fn sma_windows(&self) -> SmaWindows {
        SmaWindows::new(self.windows.fast, self.windows.slow)
    }
}
