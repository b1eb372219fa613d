use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sfm_plot::PlotStyle;
use sfm_ply::ExportOptions;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Unsupported config format: {} (expected .toml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings shared by all `sfm-tools` subcommands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub export: ExportOptions,
    pub plot: PlotStyle,
}

impl ToolsConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> ConfigResult<()> {
        if self.plot.marker_radius == 0 {
            return Err(ConfigError::Invalid("plot.marker_radius must be at least 1".to_string()));
        }
        if self.plot.draw_only == Some(0) {
            return Err(ConfigError::Invalid("plot.draw_only must be at least 1 when set".to_string()));
        }
        Ok(())
    }

    /// Load from a `.toml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::load_toml(path),
            Some("json") => Self::load_json(path),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn load_toml<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}
