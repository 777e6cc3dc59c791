// src/config/mod.rs
//! Configuration system for trackamole-backup
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{load, load_from, Config, ConfigError, Features, Paths};

mod app;
mod defaults;
