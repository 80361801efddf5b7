//! Environment flag sources

use facility_access_types::EnvironmentMode;
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only source of deployment configuration flags
pub trait FlagSource: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
}

/// Read the restricted-mode flag from a source
pub fn read_environment_mode(source: &dyn FlagSource, key: &str) -> EnvironmentMode {
    EnvironmentMode::from_flag(source.get(key).as_deref())
}

/// Fixed set of flags
#[derive(Debug, Clone, Default)]
pub struct StaticFlags {
    values: HashMap<String, String>,
}

impl StaticFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Parse `KEY=VALUE` pairs; entries without `=` are ignored
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Self {
        let values = pairs
            .into_iter()
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FlagSource for StaticFlags {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Flags read from the process environment
///
/// Bundled front-ends usually expose build-time variables under a prefix
/// (e.g. `VITE_IS_EVS_ONLY`); the prefix is prepended to every key.
#[derive(Debug, Clone, Default)]
pub struct EnvFlags {
    prefix: Option<String>,
}

impl EnvFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn variable_name(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{key}"),
            None => key.to_string(),
        }
    }
}

impl FlagSource for EnvFlags {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(self.variable_name(key)).ok()
    }
}

/// Ordered stack of sources; the first source that has a key wins
#[derive(Debug, Clone, Default)]
pub struct LayeredFlags {
    layers: Vec<Arc<dyn FlagSource>>,
}

impl LayeredFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, source: Arc<dyn FlagSource>) -> Self {
        self.layers.push(source);
        self
    }
}

impl FlagSource for LayeredFlags {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }
}
