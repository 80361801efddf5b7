//! Built-in access policies
//!
//! - **Module membership**: the user must hold one of the route's codes
//! - **Restricted mode**: an evacuation-only deployment blocks every other section

pub mod membership;
pub mod restricted;

pub use membership::ModuleMembershipPolicy;
pub use restricted::RestrictedModePolicy;

use crate::config::GuardConfig;
use crate::gate::{AccessGate, ComposedAccessGate};
use std::sync::Arc;

/// Gates making up the default module-access check
pub fn default_gates(config: &GuardConfig) -> Vec<Arc<dyn AccessGate>> {
    let membership: Arc<dyn AccessGate> = Arc::new(ModuleMembershipPolicy::new());
    let restricted: Arc<dyn AccessGate> = Arc::new(RestrictedModePolicy::with_permitted_segment(
        config.restricted_path_segment.clone(),
    ));
    vec![membership, restricted]
}

/// Create the default gate stack for a guard configuration as a single gate
pub fn create_default_policy(config: &GuardConfig) -> Arc<dyn AccessGate> {
    let composed = default_gates(config).into_iter().fold(
        ComposedAccessGate::new("module-access", "Module Access Policy Stack"),
        |composed, gate| composed.add_gate(gate),
    );
    Arc::new(composed.with_evaluation_mode(config.evaluation_mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AccessContext, AccessRequest};
    use crate::decision::DenyReason;
    use crate::gate::EvaluationMode;
    use facility_access_types::{
        AccessSet, EnvironmentMode, ModuleRequirement, SessionSnapshot, UserProfile,
    };

    #[test]
    fn test_unauthorized_reported_before_restricted_mode() {
        for mode in [
            EvaluationMode::AllMustAllow,
            EvaluationMode::FirstDenyWins,
            EvaluationMode::MostRestrictive,
        ] {
            let config = GuardConfig {
                evaluation_mode: mode,
                ..Default::default()
            };
            let policy = create_default_policy(&config);
            let session = SessionSnapshot::new("t", UserProfile::new(AccessSet::from_codes(["VMS"])));
            let ctx = AccessContext::new(session, EnvironmentMode::evs_only());
            let req = AccessRequest::new(ModuleRequirement::single("DMG").unwrap(), "/device-management");

            let decision = policy.evaluate(&req, &ctx).unwrap();
            assert_eq!(decision.reason(), Some(DenyReason::Unauthorized), "mode {mode:?}");
        }
    }
}
