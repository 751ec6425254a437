//! Configuration loading
//!
//! Settings live in a TOML file in the system's standard configuration
//! directory. Every field has a default, so a missing file or a partial one
//! is fine.

use crate::catalog::{CatalogParams, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable that overrides `tmdb.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine configuration directory location
    #[error("Failed to determine configuration directory location")]
    ConfigDirectoryNotFound,

    /// Failed to read the configuration file
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for our schema
    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tmdb: TmdbConfig,
    pub rename: RenameConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// API credential sent with every request
    pub api_key: String,

    /// Language code for result names and episode titles
    pub language: String,

    /// API root, without trailing slash
    pub base_url: String,

    /// Append ` [tmdbid=ID]` to resolved display names
    pub expose_tmdb_id: bool,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: "zh-CN".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            expose_tmdb_id: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Rename template; only inspected for the episode-title placeholder here
    pub template: String,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            template: "[${subgroupname}] ${title} S${seasonFormat}E${episodeFormat}".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path()?)
    }

    /// Loads the configuration from `path`.
    ///
    /// A missing file yields the defaults. The API key environment variable
    /// wins over the file when it is set and non-empty.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                source: e,
            })?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Config::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.tmdb.api_key = key.trim().to_string();
            }
        }

        if config.tmdb.api_key.is_empty() {
            warn!("No TMDB API key configured, catalog requests will be rejected");
        }

        Ok(config)
    }

    /// Parameters attached to every catalog request.
    pub fn catalog_params(&self) -> CatalogParams {
        CatalogParams {
            api_key: self.tmdb.api_key.clone(),
            language: self.tmdb.language.clone(),
        }
    }
}

/// Returns `<config dir>/config.toml` for this application.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = directories::ProjectDirs::from("", "", "anime-title-resolver")
        .ok_or(ConfigError::ConfigDirectoryNotFound)?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}
