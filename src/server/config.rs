use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_request")]
    pub log_request: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_request: default_log_request(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_request() -> bool {
    true
}

/// Limits applied to expense listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpensesConfig {
    /// Number of records returned when the client does not ask for a limit
    #[serde(default = "default_list_limit")]
    pub default_limit: u32,
    /// Hard cap on records returned by a single listing
    #[serde(default = "default_max_list_limit")]
    pub max_limit: u32,
}

fn default_list_limit() -> u32 {
    100
}

fn default_max_list_limit() -> u32 {
    500
}

impl Default for ExpensesConfig {
    fn default() -> Self {
        Self {
            default_limit: default_list_limit(),
            max_limit: default_max_list_limit(),
        }
    }
}

impl ExpensesConfig {
    /// Resolve a client-supplied limit into the allowed range
    pub fn clamp_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit.max(1))
    }
}
