//! Guard configuration

use crate::error::{AccessError, Result};
use crate::gate::EvaluationMode;
use facility_access_types::{KnownModule, RESTRICTED_MODE_FLAG};
use serde::{Deserialize, Serialize};

/// Configuration for the default access gate stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Environment flag that turns on evacuation-only mode
    #[serde(default = "default_restricted_flag_key")]
    pub restricted_flag_key: String,

    /// Path segment still reachable while restricted mode is on
    #[serde(default = "default_restricted_path_segment")]
    pub restricted_path_segment: String,

    /// How the gate stack combines decisions
    #[serde(default)]
    pub evaluation_mode: EvaluationMode,

    /// Log every decision at info/warn level
    #[serde(default = "default_true")]
    pub emit_audit_events: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            restricted_flag_key: default_restricted_flag_key(),
            restricted_path_segment: default_restricted_path_segment(),
            evaluation_mode: EvaluationMode::default(),
            emit_audit_events: true,
        }
    }
}

impl GuardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.restricted_flag_key.trim().is_empty() {
            return Err(AccessError::InvalidConfiguration {
                reason: "restricted_flag_key must not be empty".into(),
            });
        }
        // Every path contains the empty segment
        if self.restricted_path_segment.trim().is_empty() {
            return Err(AccessError::InvalidConfiguration {
                reason: "restricted_path_segment must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn default_restricted_flag_key() -> String {
    RESTRICTED_MODE_FLAG.to_string()
}

fn default_restricted_path_segment() -> String {
    KnownModule::EvacuationMonitoring.route_segment().to_string()
}

fn default_true() -> bool {
    true
}
