// src/config/app.rs
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::defaults::*;
use crate::aliases::StoreKey;
use crate::crypto::KdfParams;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub kdf: KdfParams,
    #[serde(default = "default_paths")]
    pub paths: Paths,
    #[serde(default = "default_features")]
    pub features: Features,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub store_db: PathBuf,
    pub export_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Indent plaintext exports
    pub pretty_json: bool,
}

impl Default for Paths {
    fn default() -> Self {
        default_paths()
    }
}

impl Default for Features {
    fn default() -> Self {
        default_features()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kdf: KdfParams::default(),
            paths: default_paths(),
            features: default_features(),
        }
    }
}

impl Config {
    /// `TAM_STORE_DB` wins over the configured path
    pub fn store_db_path(&self) -> PathBuf {
        std::env::var_os("TAM_STORE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|| self.paths.store_db.clone())
    }

    /// SQLCipher key for the local store, only ever taken from the environment
    pub fn store_key(&self) -> Option<StoreKey> {
        std::env::var("TAM_STORE_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .map(StoreKey::new)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid [kdf] section: {0}")]
    Kdf(String),
}

/// Load and check a config file.
pub fn load_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let conf: Config = toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    conf.kdf.check_bounds().map_err(ConfigError::Kdf)?;
    Ok(conf)
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Global config: `TAM_CONFIG` or `tam-config.toml`, else built-in defaults
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        let config_path = std::env::var_os("TAM_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if !config_path.exists() {
            warn!(
                path = %config_path.display(),
                "config file not found, using built-in defaults"
            );
            return Config::default();
        }

        match load_from(&config_path) {
            Ok(conf) => conf,
            Err(e) => {
                warn!(error = %e, "config file rejected, using built-in defaults");
                Config::default()
            }
        }
    })
}
