//! Access evaluation context
//!
//! The request names what the route needs; the context carries the
//! session snapshot and environment mode taken for this one navigation.

use chrono::{DateTime, Utc};
use facility_access_types::{EnvironmentMode, ModuleRequirement, SessionSnapshot};
use serde::{Deserialize, Serialize};

/// A navigation attempt into a protected route section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Module codes the route accepts
    pub requirement: ModuleRequirement,

    /// Path being navigated to
    pub path: String,
}

impl AccessRequest {
    pub fn new(requirement: ModuleRequirement, path: impl Into<String>) -> Self {
        Self {
            requirement,
            path: path.into(),
        }
    }
}

/// Context for access evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessContext {
    /// Session as read at navigation time
    pub session: SessionSnapshot,

    /// Deployment mode flags
    pub environment: EnvironmentMode,

    /// Identity used in audit records
    pub actor_id: String,

    /// Request ID for correlation
    pub request_id: String,

    /// When the navigation was attempted
    pub timestamp: DateTime<Utc>,
}

impl AccessContext {
    pub fn new(session: SessionSnapshot, environment: EnvironmentMode) -> Self {
        Self {
            session,
            environment,
            actor_id: "anonymous".into(),
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = actor_id.into();
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn is_restricted(&self) -> bool {
        self.environment.is_restricted()
    }
}

impl Default for AccessContext {
    fn default() -> Self {
        Self::new(SessionSnapshot::empty(), EnvironmentMode::unrestricted())
    }
}
