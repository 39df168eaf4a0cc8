// Configuration type definitions

use serde::Deserialize;

/// Search configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Autocomplete endpoint queried with `?query=…&limit=…`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Quiescence window before a settled keyword triggers a request
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Initial result-count cap; must be one of 2, 4, 5, 10
    #[serde(default = "default_limit")]
    pub limit: u8,
}

fn default_endpoint() -> String {
    "http://localhost:8080/search".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_limit() -> u8 {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            endpoint: default_endpoint(),
            debounce_ms: default_debounce_ms(),
            limit: default_limit(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
}
