//! Error types for access evaluation
//!
//! Denials are not errors; they are [`AccessDecision::Deny`](crate::AccessDecision)
//! values. These variants cover caller mistakes and collaborator failures.

use facility_access_types::RequirementError;
use thiserror::Error;

/// Access guard errors
#[derive(Debug, Error)]
pub enum AccessError {
    /// Route declared an invalid module requirement
    #[error("Invalid module requirement: {0}")]
    Requirement(#[from] RequirementError),

    /// Session storage could not be read or written
    #[error("Session store error for '{key}': {source}")]
    Store {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Session storage contents could not be (de)serialized
    #[error("Session store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid guard configuration
    #[error("Invalid guard configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A gate failed to produce a decision
    #[error("Access evaluation failed in gate '{gate_id}': {reason}")]
    EvaluationFailed { gate_id: String, reason: String },
}

impl AccessError {
    pub(crate) fn store(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Store {
            key: key.into(),
            source,
        }
    }
}

/// Result type for access guard operations
pub type Result<T> = std::result::Result<T, AccessError>;
