// src/config.rs

//! Configuration loading.
//!
//! Resolves the config file, falls back to defaults when it is missing or
//! unreadable, applies environment overrides and validates the result.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::Config;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "newsroom.toml";

/// Path to load: the explicit one, else [`DEFAULT_CONFIG_FILE`].
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load configuration from a TOML file.
///
/// A missing default file silently yields defaults; any other load failure
/// is logged and also falls back to defaults. Environment overrides are
/// applied before validation.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = config_path(explicit);
    let mut config = if explicit.is_none() && !path.exists() {
        log::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
        Config::default()
    } else {
        Config::load_or_default(&path)
    };

    config.apply_env();
    config.validate()?;
    Ok(config)
}
