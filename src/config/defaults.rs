// src/config/defaults.rs
use std::path::PathBuf;

use crate::config::app::{Features, Paths};

pub const DEFAULT_CONFIG_FILE: &str = "tam-config.toml";
pub const APP_DIR: &str = "trackamole";
pub const STORE_FILE: &str = "records.db";

fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn default_paths() -> Paths {
    Paths {
        store_db: app_data_dir().join(STORE_FILE),
        export_dir: dirs::download_dir().unwrap_or_else(|| app_data_dir().join("backups")),
    }
}

pub fn default_features() -> Features {
    Features { pretty_json: false }
}
