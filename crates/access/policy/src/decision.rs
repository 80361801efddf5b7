//! Access decision types
//!
//! Decisions are computed fresh for every navigation and never persisted.
//! The decision card is the audit view of one evaluation.

use chrono::{DateTime, Utc};
use facility_access_types::ModuleCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a navigation was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// User holds none of the required module codes
    Unauthorized,

    /// Deployment is restricted to evacuation monitoring and the path is elsewhere
    RestrictedModeViolation,

    /// Stored profile could not be parsed; handled as unauthorized
    MalformedSession,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::RestrictedModeViolation => "restricted_mode_violation",
            Self::MalformedSession => "malformed_session",
        }
    }

    /// True for the kinds that mean "this user may not see this module"
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::MalformedSession)
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an access evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Navigation proceeds
    Allow,

    /// Navigation is aborted
    Deny {
        /// Kind of denial
        reason: DenyReason,
        /// Gate that denied the navigation
        policy_id: String,
    },
}

impl AccessDecision {
    pub fn allow() -> Self {
        Self::Allow
    }

    pub fn deny(reason: DenyReason, policy_id: impl Into<String>) -> Self {
        Self::Deny {
            reason,
            policy_id: policy_id.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny { reason, .. } => Some(*reason),
        }
    }

    pub fn policy_id(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Deny { policy_id, .. } => Some(policy_id),
        }
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("allow"),
            Self::Deny { reason, policy_id } => write!(f, "deny ({reason}, by {policy_id})"),
        }
    }
}

/// Audit card for one access evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecisionCard {
    /// Unique identifier for this decision
    pub id: String,

    /// Path the navigation targeted
    pub path: String,

    /// Module codes the route accepts
    pub required_modules: Vec<ModuleCode>,

    /// The final decision
    pub decision: AccessDecision,

    /// Who attempted the navigation
    pub actor_id: String,

    /// Whether restricted mode was active
    pub restricted_mode: bool,

    /// When the decision was made
    pub timestamp: DateTime<Utc>,

    /// Every gate that ran, in evaluation order
    pub gates_evaluated: Vec<GateEvaluationRecord>,

    /// Request ID for correlation
    pub request_id: String,
}

impl AccessDecisionCard {
    pub fn new(
        path: impl Into<String>,
        required_modules: Vec<ModuleCode>,
        decision: AccessDecision,
        actor_id: impl Into<String>,
        restricted_mode: bool,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            path: path.into(),
            required_modules,
            decision,
            actor_id: actor_id.into(),
            restricted_mode,
            timestamp: Utc::now(),
            gates_evaluated: Vec::new(),
            request_id: request_id.into(),
        }
    }

    pub fn add_evaluation(&mut self, record: GateEvaluationRecord) {
        self.gates_evaluated.push(record);
    }

    pub fn was_allowed(&self) -> bool {
        self.decision.is_allowed()
    }
}

/// Record of a single gate evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateEvaluationRecord {
    pub gate_id: String,
    pub gate_name: String,
    pub decision: AccessDecision,

    /// Evaluation duration in microseconds
    pub duration_us: u64,

    pub notes: Option<String>,
}

impl GateEvaluationRecord {
    pub fn new(
        gate_id: impl Into<String>,
        gate_name: impl Into<String>,
        decision: AccessDecision,
        duration_us: u64,
    ) -> Self {
        Self {
            gate_id: gate_id.into(),
            gate_name: gate_name.into(),
            decision,
            duration_us,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
