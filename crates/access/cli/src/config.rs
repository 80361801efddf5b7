//! Configuration for accessctl

use facility_access_policy::GuardConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// JSON file holding the session (`token` and `user` keys)
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,

    /// Prefix prepended to flag names when reading the process environment
    #[serde(default)]
    pub flag_prefix: Option<String>,

    /// Guard configuration
    #[serde(default)]
    pub guard: GuardConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            session_file: default_session_file(),
            flag_prefix: None,
            guard: GuardConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_session_file() -> PathBuf {
    PathBuf::from(".accessctl").join("session.json")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl CliConfig {
    /// Load configuration from defaults, an optional file, and `ACCESS_` environment variables
    ///
    /// Nested keys use a double underscore: `ACCESS_GUARD__RESTRICTED_FLAG_KEY`.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&CliConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ACCESS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
