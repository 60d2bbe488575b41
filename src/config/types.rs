use serde::{Deserialize, Serialize};

use crate::intercept::DEFAULT_MAX_REWRITES;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavkeepConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Interceptor chain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Rewrites allowed for a single navigation call (default: 16).
    #[serde(default = "default_max_rewrites")]
    pub max_rewrites: usize,
    /// Install a listener that logs every navigation event (default: false).
    #[serde(default)]
    pub log_events: bool,
    /// Log interceptor failures at warn level (default: true).
    #[serde(default = "default_log_failures")]
    pub log_failures: bool,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Log file path. `NAVKEEP_LOG` takes precedence.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_max_rewrites() -> usize {
    DEFAULT_MAX_REWRITES
}

fn default_log_failures() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_rewrites: default_max_rewrites(),
            log_events: false,
            log_failures: default_log_failures(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: None,
        }
    }
}
