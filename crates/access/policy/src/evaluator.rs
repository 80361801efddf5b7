//! Access evaluator service
//!
//! The evaluator runs the configured gate stack for a navigation and logs
//! every decision. Deny kinds are logged distinctly even though callers
//! only see a single navigation abort.

use crate::config::GuardConfig;
use crate::context::{AccessContext, AccessRequest};
use crate::decision::{AccessDecision, AccessDecisionCard, DenyReason};
use crate::error::Result;
use crate::gate::{AccessGate, ComposedAccessGate, EvaluationMode};
use crate::policies::default_gates;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Policy id used when no gate is configured or a gate fails
const FAIL_CLOSED_POLICY: &str = "fail-closed";

/// Access evaluator service
#[derive(Debug)]
pub struct AccessEvaluator {
    gates: Arc<RwLock<Vec<Arc<dyn AccessGate>>>>,
    evaluation_mode: EvaluationMode,
    emit_audit_events: bool,
}

impl AccessEvaluator {
    /// Evaluator running the default gate stack
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            gates: Arc::new(RwLock::new(default_gates(config))),
            evaluation_mode: config.evaluation_mode,
            emit_audit_events: config.emit_audit_events,
        }
    }

    pub fn with_gates(gates: Vec<Arc<dyn AccessGate>>) -> Self {
        Self {
            gates: Arc::new(RwLock::new(gates)),
            evaluation_mode: EvaluationMode::default(),
            emit_audit_events: true,
        }
    }

    pub fn with_evaluation_mode(mut self, mode: EvaluationMode) -> Self {
        self.evaluation_mode = mode;
        self
    }

    pub fn with_emit_audit_events(mut self, emit: bool) -> Self {
        self.emit_audit_events = emit;
        self
    }

    pub fn add_gate(&self, gate: Arc<dyn AccessGate>) {
        self.gates.write().push(gate);
    }

    /// Remove a gate by ID
    pub fn remove_gate(&self, gate_id: &str) -> bool {
        let mut gates = self.gates.write();
        let len_before = gates.len();
        gates.retain(|g| g.id() != gate_id);
        gates.len() < len_before
    }

    pub fn list_gates(&self) -> Vec<String> {
        self.gates.read().iter().map(|g| g.id().to_string()).collect()
    }

    pub fn evaluate(&self, request: &AccessRequest, context: &AccessContext) -> Result<AccessDecision> {
        let card = self.evaluate_with_card(request, context)?;
        Ok(card.decision)
    }

    /// Evaluate a navigation and return the full decision card
    pub fn evaluate_with_card(
        &self,
        request: &AccessRequest,
        context: &AccessContext,
    ) -> Result<AccessDecisionCard> {
        debug!(
            path = %request.path,
            required = %request.requirement,
            actor = %context.actor_id,
            restricted = context.is_restricted(),
            "Evaluating module access"
        );

        // Snapshot the stack so gates can change between navigations without
        // holding the lock while evaluating
        let gates: Vec<Arc<dyn AccessGate>> = self.gates.read().clone();

        let card = if gates.is_empty() {
            fail_closed_card(request, context)
        } else {
            let mut composed = ComposedAccessGate::new("evaluator", "Module Access Evaluator")
                .with_evaluation_mode(self.evaluation_mode);
            for gate in gates {
                composed = composed.add_gate(gate);
            }
            composed.evaluate_with_card(request, context)?
        };

        if self.emit_audit_events {
            self.log_decision(&card);
        }

        Ok(card)
    }

    /// Infallible evaluation: any gate error becomes a denial card
    pub fn decide_with_card(
        &self,
        request: &AccessRequest,
        context: &AccessContext,
    ) -> AccessDecisionCard {
        match self.evaluate_with_card(request, context) {
            Ok(card) => card,
            Err(e) => {
                error!(
                    request_id = %context.request_id,
                    path = %request.path,
                    error = %e,
                    "Access evaluation failed, denying navigation"
                );
                let card = fail_closed_card(request, context);
                if self.emit_audit_events {
                    self.log_decision(&card);
                }
                card
            }
        }
    }

    pub fn decide(&self, request: &AccessRequest, context: &AccessContext) -> AccessDecision {
        self.decide_with_card(request, context).decision
    }

    pub fn is_allowed(&self, request: &AccessRequest, context: &AccessContext) -> bool {
        self.decide(request, context).is_allowed()
    }

    fn log_decision(&self, card: &AccessDecisionCard) {
        match &card.decision {
            AccessDecision::Allow => {
                info!(
                    request_id = %card.request_id,
                    path = %card.path,
                    actor = %card.actor_id,
                    "Module access allowed"
                );
            }
            AccessDecision::Deny { reason, policy_id } => match reason {
                DenyReason::Unauthorized => warn!(
                    request_id = %card.request_id,
                    path = %card.path,
                    actor = %card.actor_id,
                    policy = %policy_id,
                    kind = %reason,
                    "Module access denied: user lacks required module"
                ),
                DenyReason::RestrictedModeViolation => warn!(
                    request_id = %card.request_id,
                    path = %card.path,
                    actor = %card.actor_id,
                    policy = %policy_id,
                    kind = %reason,
                    "Module access denied: deployment is in restricted mode"
                ),
                DenyReason::MalformedSession => warn!(
                    request_id = %card.request_id,
                    path = %card.path,
                    actor = %card.actor_id,
                    policy = %policy_id,
                    kind = %reason,
                    "Module access denied: stored session profile is malformed"
                ),
            },
        }
    }
}

fn fail_closed_card(request: &AccessRequest, context: &AccessContext) -> AccessDecisionCard {
    AccessDecisionCard::new(
        &request.path,
        request.requirement.codes().to_vec(),
        AccessDecision::deny(DenyReason::Unauthorized, FAIL_CLOSED_POLICY),
        &context.actor_id,
        context.is_restricted(),
        &context.request_id,
    )
}

impl Default for AccessEvaluator {
    fn default() -> Self {
        Self::new(&GuardConfig::default())
    }
}

/// Builder for AccessEvaluator
pub struct AccessEvaluatorBuilder {
    config: GuardConfig,
    gates: Vec<Arc<dyn AccessGate>>,
    use_default_policy: bool,
}

impl AccessEvaluatorBuilder {
    pub fn new() -> Self {
        Self {
            config: GuardConfig::default(),
            gates: Vec::new(),
            use_default_policy: true,
        }
    }

    pub fn with_config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn add_gate(mut self, gate: Arc<dyn AccessGate>) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn with_evaluation_mode(mut self, mode: EvaluationMode) -> Self {
        self.config.evaluation_mode = mode;
        self
    }

    pub fn with_emit_audit_events(mut self, emit: bool) -> Self {
        self.config.emit_audit_events = emit;
        self
    }

    /// Set whether the default module-access stack is included
    pub fn with_default_policy(mut self, use_default: bool) -> Self {
        self.use_default_policy = use_default;
        self
    }

    pub fn build(self) -> Result<AccessEvaluator> {
        self.config.validate()?;

        let mut gates = Vec::new();
        if self.use_default_policy {
            gates.extend(default_gates(&self.config));
        }
        gates.extend(self.gates);

        Ok(AccessEvaluator {
            gates: Arc::new(RwLock::new(gates)),
            evaluation_mode: self.config.evaluation_mode,
            emit_audit_events: self.config.emit_audit_events,
        })
    }
}

impl Default for AccessEvaluatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessError;
    use crate::gate::{AllowAllGate, DenyAllGate};
    use facility_access_types::{
        AccessSet, EnvironmentMode, ModuleRequirement, SessionSnapshot, UserProfile,
    };

    fn request(code: &str, path: &str) -> AccessRequest {
        AccessRequest::new(ModuleRequirement::single(code).unwrap(), path)
    }

    fn context(access: &str, mode: EnvironmentMode) -> AccessContext {
        let profile = UserProfile::new(AccessSet::Delimited(access.into()));
        AccessContext::new(SessionSnapshot::new("token", profile), mode)
    }

    #[test]
    fn test_default_evaluator_allows_member() {
        let evaluator = AccessEvaluator::default();
        let decision = evaluator
            .evaluate(
                &request("VMS", "/visitor-management"),
                &context("VMS,UMG", EnvironmentMode::unrestricted()),
            )
            .unwrap();
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_custom_gate() {
        let evaluator =
            AccessEvaluator::with_gates(vec![Arc::new(DenyAllGate::new(DenyReason::Unauthorized))]);
        let decision = evaluator
            .evaluate(&request("VMS", "/"), &context("VMS", EnvironmentMode::unrestricted()))
            .unwrap();
        assert!(decision.is_denied());
    }

    #[test]
    fn test_add_remove_gate() {
        let evaluator = AccessEvaluator::with_gates(vec![Arc::new(AllowAllGate)]);
        assert_eq!(evaluator.list_gates().len(), 1);

        evaluator.add_gate(Arc::new(DenyAllGate::new(DenyReason::Unauthorized)));
        assert_eq!(evaluator.list_gates().len(), 2);

        assert!(evaluator.remove_gate("deny-all"));
        assert!(!evaluator.remove_gate("deny-all"));
        assert_eq!(evaluator.list_gates(), vec!["allow-all".to_string()]);
    }

    #[test]
    fn test_empty_stack_fails_closed() {
        let evaluator = AccessEvaluator::with_gates(vec![]);
        let decision = evaluator
            .evaluate(&request("VMS", "/"), &context("VMS", EnvironmentMode::unrestricted()))
            .unwrap();
        assert_eq!(decision.policy_id(), Some(FAIL_CLOSED_POLICY));
    }

    /// Gate whose evaluation always fails
    #[derive(Debug)]
    struct FailingGate;

    impl AccessGate for FailingGate {
        fn id(&self) -> &str {
            "failing"
        }

        fn name(&self) -> &str {
            "Failing"
        }

        fn evaluate(&self, _r: &AccessRequest, _c: &AccessContext) -> Result<AccessDecision> {
            Err(AccessError::InvalidConfiguration {
                reason: "rule table unavailable".into(),
            })
        }
    }

    #[test]
    fn test_gate_error_fails_closed() {
        let evaluator = AccessEvaluator::default().with_emit_audit_events(false);
        evaluator.add_gate(Arc::new(FailingGate));
        let req = request("VMS", "/visitor-management");
        let ctx = context("VMS", EnvironmentMode::unrestricted());

        assert!(matches!(
            evaluator.evaluate(&req, &ctx),
            Err(AccessError::EvaluationFailed { ref gate_id, .. }) if gate_id == "failing"
        ));

        let decision = evaluator.decide(&req, &ctx);
        assert_eq!(decision.reason(), Some(DenyReason::Unauthorized));
        assert_eq!(decision.policy_id(), Some(FAIL_CLOSED_POLICY));
        assert!(!evaluator.is_allowed(&req, &ctx));

        let card = evaluator.decide_with_card(&req, &ctx);
        assert!(!card.was_allowed());
        assert_eq!(card.path, "/visitor-management");
    }

    #[test]
    fn test_card_records_gates() {
        let evaluator = AccessEvaluator::default().with_emit_audit_events(false);
        let card = evaluator
            .evaluate_with_card(
                &request("EVS", "/evacuation-monitoring/dashboard"),
                &context("EVS", EnvironmentMode::evs_only()),
            )
            .unwrap();
        assert!(card.was_allowed());
        assert!(card.restricted_mode);
        let gate_ids: Vec<&str> = card.gates_evaluated.iter().map(|r| r.gate_id.as_str()).collect();
        assert_eq!(gate_ids, vec!["module-membership", "restricted-mode"]);
        assert_eq!(card.gates_evaluated[0].notes.as_deref(), Some("matched EVS"));
    }

    #[test]
    fn test_builder_without_default() {
        let evaluator = AccessEvaluatorBuilder::new()
            .with_default_policy(false)
            .add_gate(Arc::new(AllowAllGate))
            .build()
            .unwrap();

        // Only the allow-all gate runs, so even an empty session passes
        assert!(evaluator.is_allowed(&request("UMG", "/user-management"), &AccessContext::default()));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = AccessEvaluatorBuilder::new()
            .with_config(GuardConfig {
                restricted_path_segment: String::new(),
                ..Default::default()
            })
            .build();
        assert!(result.is_err());
    }
}
