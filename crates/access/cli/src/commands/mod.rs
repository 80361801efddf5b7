//! CLI command implementations

pub mod check;
pub mod modules;
pub mod session;

use crate::config::CliConfig;
use facility_access_policy::{EnvFlags, FlagSource, JsonFileSessionStore, LayeredFlags, StaticFlags};
use std::sync::Arc;

/// Session store named by the configuration
pub fn session_store(config: &CliConfig) -> Arc<JsonFileSessionStore> {
    Arc::new(JsonFileSessionStore::new(&config.session_file))
}

/// Flags from `--flag KEY=VALUE` overrides, then the process environment
pub fn flag_source(config: &CliConfig, overrides: &[String]) -> Arc<dyn FlagSource> {
    let env = match &config.flag_prefix {
        Some(prefix) => EnvFlags::with_prefix(prefix),
        None => EnvFlags::new(),
    };
    let overrides = StaticFlags::from_pairs(overrides.iter().map(String::as_str));
    Arc::new(
        LayeredFlags::new()
            .with_layer(Arc::new(overrides))
            .with_layer(Arc::new(env)),
    )
}
