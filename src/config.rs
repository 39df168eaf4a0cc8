// Configuration module for typeahead
// This module handles loading and parsing configuration from ~/.config/typeahead/config.toml

mod types;

pub use types::{Config, SearchConfig};

use std::fs;
use std::path::PathBuf;

use crate::search::ResultLimit;

/// Result of loading configuration
pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

/// Loads configuration from ~/.config/typeahead/config.toml
/// Returns default configuration if file doesn't exist or on parse errors
pub fn load_config() -> ConfigResult {
    let config_path = get_config_path();

    #[cfg(debug_assertions)]
    log::debug!("Loading config from {:?}", config_path);

    // If file doesn't exist, return defaults silently
    if !config_path.exists() {
        #[cfg(debug_assertions)]
        log::debug!("Config file does not exist, using defaults");
        return ConfigResult {
            config: Config::default(),
            warning: None,
        };
    }

    // Try to read the file
    let contents = match fs::read_to_string(&config_path) {
        Ok(contents) => contents,
        Err(e) => {
            #[cfg(debug_assertions)]
            log::error!("Failed to read config file {:?}: {}", config_path, e);
            return ConfigResult {
                config: Config::default(),
                warning: Some(format!("Failed to read config: {}", e)),
            };
        }
    };

    // Try to parse TOML
    match toml::from_str::<Config>(&contents) {
        Ok(config) => validate(config),
        Err(e) => {
            #[cfg(debug_assertions)]
            log::error!("Failed to parse config file {:?}: {}", config_path, e);
            ConfigResult {
                config: Config::default(),
                warning: Some(format!("Invalid config: {}", e)),
            }
        }
    }
}

/// Reject limit values outside the selector's closed set, falling back to the
/// default with a warning
fn validate(mut config: Config) -> ConfigResult {
    if ResultLimit::from_value(config.search.limit).is_none() {
        let fallback = SearchConfig::default().limit;
        let warning = format!(
            "Invalid result limit {} (expected one of 2, 4, 5, 10), using {}",
            config.search.limit, fallback
        );
        config.search.limit = fallback;
        return ConfigResult {
            config,
            warning: Some(warning),
        };
    }

    ConfigResult {
        config,
        warning: None,
    }
}

/// Returns the path to the configuration file
///
/// Always uses ~/.config/typeahead/config.toml on all platforms for consistency.
fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("typeahead")
        .join("config.toml")
}
