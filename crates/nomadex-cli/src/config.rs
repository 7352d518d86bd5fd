//! Configuration loading from TOML files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use nomadex_api::{DEFAULT_OASIS, base_url_from_env, oasis_url};

/// Global configuration for nomadex.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub query: QueryConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Explicit API base URL; wins over `oasis`.
    pub base_url: Option<String>,
    /// Name of a known Oasis deployment.
    pub oasis: Option<String>,
}

impl ApiConfig {
    /// Resolve the base URL.
    ///
    /// Precedence: `NOMAD_CLIENT_URL` env override, explicit `base_url`,
    /// `oasis` name lookup, default Oasis.
    pub fn resolved_base_url(&self) -> Result<String> {
        if let Some(url) = base_url_from_env() {
            return Ok(url);
        }
        if let Some(url) = &self.base_url {
            return Ok(url.clone());
        }
        if let Some(name) = &self.oasis {
            let url = oasis_url(name)
                .with_context(|| format!("unknown Oasis name in config: {name}"))?;
            return Ok(url.to_string());
        }
        Ok(oasis_url(DEFAULT_OASIS)
            .expect("default Oasis is always known")
            .to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// ELN section type the sample query filters by.
    pub section_type: String,
    /// Records per page.
    pub page_size: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            section_type: "HySprint_Sample".to_string(),
            page_size: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./exports"),
        }
    }
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Search order:
    /// 1. ./nomadex.toml (current directory)
    /// 2. ~/.config/nomadex/config.toml
    ///
    /// If no config file is found, returns the default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("nomadex.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "nomadex") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
}
