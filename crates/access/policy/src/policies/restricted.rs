//! Restricted-mode policy
//!
//! Deployment-wide override: when the environment is in evacuation-only
//! mode, every path outside the evacuation monitoring section is blocked,
//! whatever the user's own permissions are.

use crate::context::{AccessContext, AccessRequest};
use crate::decision::{AccessDecision, DenyReason};
use crate::error::Result;
use crate::gate::AccessGate;
use facility_access_types::KnownModule;

/// Blocks paths outside the permitted section while restricted mode is on
#[derive(Debug)]
pub struct RestrictedModePolicy {
    /// Path segment that stays reachable in restricted mode
    permitted_segment: String,
}

impl RestrictedModePolicy {
    pub fn new() -> Self {
        Self::with_permitted_segment(KnownModule::EvacuationMonitoring.route_segment())
    }

    pub fn with_permitted_segment(segment: impl Into<String>) -> Self {
        Self {
            permitted_segment: segment.into(),
        }
    }

    pub fn permitted_segment(&self) -> &str {
        &self.permitted_segment
    }

    fn path_permitted(&self, path: &str) -> bool {
        path.contains(self.permitted_segment.as_str())
    }
}

impl Default for RestrictedModePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessGate for RestrictedModePolicy {
    fn id(&self) -> &str {
        "restricted-mode"
    }

    fn name(&self) -> &str {
        "Restricted Mode Policy"
    }

    fn evaluate(&self, request: &AccessRequest, context: &AccessContext) -> Result<AccessDecision> {
        if context.is_restricted() && !self.path_permitted(&request.path) {
            return Ok(AccessDecision::deny(
                DenyReason::RestrictedModeViolation,
                self.id(),
            ));
        }
        Ok(AccessDecision::allow())
    }

    fn description(&self) -> &str {
        "Limits the deployment to a single module's paths when restricted mode is enabled"
    }

    fn priority(&self) -> u32 {
        100
    }

    fn explain(&self, request: &AccessRequest, context: &AccessContext) -> Option<String> {
        if !context.is_restricted() {
            return None;
        }
        Some(if self.path_permitted(&request.path) {
            format!("restricted mode: path is under '{}'", self.permitted_segment)
        } else {
            format!("restricted mode: only '{}' paths are reachable", self.permitted_segment)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_access_types::{EnvironmentMode, ModuleRequirement, SessionSnapshot};

    fn request(path: &str) -> AccessRequest {
        AccessRequest::new(ModuleRequirement::single("EVS").unwrap(), path)
    }

    fn context(mode: EnvironmentMode) -> AccessContext {
        AccessContext::new(SessionSnapshot::empty(), mode)
    }

    #[test]
    fn test_unrestricted_allows_any_path() {
        let decision = RestrictedModePolicy::new()
            .evaluate(&request("/visitor-management"), &context(EnvironmentMode::unrestricted()))
            .unwrap();
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_restricted_blocks_other_paths() {
        let decision = RestrictedModePolicy::new()
            .evaluate(&request("/visitor-management"), &context(EnvironmentMode::evs_only()))
            .unwrap();
        assert_eq!(decision.reason(), Some(DenyReason::RestrictedModeViolation));
    }

    #[test]
    fn test_restricted_allows_evacuation_paths() {
        let decision = RestrictedModePolicy::new()
            .evaluate(
                &request("/evacuation-monitoring/dashboard"),
                &context(EnvironmentMode::evs_only()),
            )
            .unwrap();
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_custom_segment() {
        let policy = RestrictedModePolicy::with_permitted_segment("muster");
        let decision = policy
            .evaluate(&request("/site/muster/points"), &context(EnvironmentMode::evs_only()))
            .unwrap();
        assert!(decision.is_allowed());
        assert!(policy
            .explain(&request("/x"), &context(EnvironmentMode::unrestricted()))
            .is_none());
    }
}
