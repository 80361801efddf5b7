//! Module membership policy
//!
//! The per-user check: the session's `Access` set must contain at least one
//! of the codes the route accepts. No session, no profile, or a profile
//! that failed to parse all count as holding no codes.

use crate::context::{AccessContext, AccessRequest};
use crate::decision::{AccessDecision, DenyReason};
use crate::error::Result;
use crate::gate::AccessGate;
use facility_access_types::ProfileState;

/// Requires the user to hold one of the route's module codes
#[derive(Debug, Default)]
pub struct ModuleMembershipPolicy;

impl ModuleMembershipPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl AccessGate for ModuleMembershipPolicy {
    fn id(&self) -> &str {
        "module-membership"
    }

    fn name(&self) -> &str {
        "Module Membership Policy"
    }

    fn evaluate(&self, request: &AccessRequest, context: &AccessContext) -> Result<AccessDecision> {
        let access = match &context.session.profile {
            ProfileState::Parsed(profile) => &profile.access,
            ProfileState::Absent => {
                return Ok(AccessDecision::deny(DenyReason::Unauthorized, self.id()));
            }
            ProfileState::Malformed(_) => {
                return Ok(AccessDecision::deny(DenyReason::MalformedSession, self.id()));
            }
        };

        if request.requirement.is_satisfied_by(access) {
            Ok(AccessDecision::allow())
        } else {
            Ok(AccessDecision::deny(DenyReason::Unauthorized, self.id()))
        }
    }

    fn description(&self) -> &str {
        "Allows navigation when the user holds any of the route's module codes"
    }

    fn priority(&self) -> u32 {
        // Per-user reasons are reported ahead of restricted mode
        200
    }

    fn explain(&self, request: &AccessRequest, context: &AccessContext) -> Option<String> {
        match &context.session.profile {
            ProfileState::Absent => Some("no user profile in session".into()),
            ProfileState::Malformed(detail) => Some(format!("unparsable user profile: {detail}")),
            ProfileState::Parsed(profile) => Some(match request.requirement.first_match(&profile.access) {
                Some(code) => format!("matched {code}"),
                None => format!("user holds none of {}", request.requirement),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_access_types::{
        AccessSet, EnvironmentMode, ModuleRequirement, SessionSnapshot, UserProfile,
    };

    fn context_with(access: &str) -> AccessContext {
        let profile = UserProfile::new(AccessSet::Delimited(access.into()));
        AccessContext::new(SessionSnapshot::new("token", profile), EnvironmentMode::unrestricted())
    }

    fn request(codes: &[&str]) -> AccessRequest {
        AccessRequest::new(ModuleRequirement::new(codes.iter().copied()).unwrap(), "/any")
    }

    #[test]
    fn test_matching_code_allows() {
        let decision = ModuleMembershipPolicy::new()
            .evaluate(&request(&["VMS"]), &context_with("VMS,UMG"))
            .unwrap();
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_any_of_several_codes_allows() {
        let decision = ModuleMembershipPolicy::new()
            .evaluate(&request(&["DMG", "UMG"]), &context_with("UMG"))
            .unwrap();
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_disjoint_access_denies() {
        let decision = ModuleMembershipPolicy::new()
            .evaluate(&request(&["DMG"]), &context_with("VMS"))
            .unwrap();
        assert_eq!(decision.reason(), Some(DenyReason::Unauthorized));
    }

    #[test]
    fn test_absent_session_denies() {
        let decision = ModuleMembershipPolicy::new()
            .evaluate(&request(&["UMG"]), &AccessContext::default())
            .unwrap();
        assert_eq!(decision.reason(), Some(DenyReason::Unauthorized));
    }

    #[test]
    fn test_malformed_session_denies() {
        let session = SessionSnapshot::from_raw(Some("token".into()), Some("{broken"));
        let ctx = AccessContext::new(session, EnvironmentMode::unrestricted());
        let policy = ModuleMembershipPolicy::new();

        let decision = policy.evaluate(&request(&["VMS"]), &ctx).unwrap();
        assert_eq!(decision.reason(), Some(DenyReason::MalformedSession));
        assert!(policy
            .explain(&request(&["VMS"]), &ctx)
            .unwrap()
            .starts_with("unparsable user profile"));
    }

    #[test]
    fn test_explain_names_matched_code() {
        let note = ModuleMembershipPolicy::new().explain(&request(&["DMG", "VMS"]), &context_with("VMS"));
        assert_eq!(note.as_deref(), Some("matched VMS"));
    }
}
