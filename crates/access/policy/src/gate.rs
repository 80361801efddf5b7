//! Access gate trait and implementations
//!
//! Each gate checks one condition. Gates are composed into the stack the
//! evaluator runs; higher-priority gates run first.

use crate::context::{AccessContext, AccessRequest};
use crate::decision::{AccessDecision, AccessDecisionCard, DenyReason, GateEvaluationRecord};
use crate::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Gate deciding whether a navigation may proceed
///
/// Evaluation is synchronous and must not perform I/O; everything a gate
/// needs is in the request and context.
pub trait AccessGate: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this gate
    fn id(&self) -> &str;

    /// Human-readable name for this gate
    fn name(&self) -> &str;

    fn evaluate(&self, request: &AccessRequest, context: &AccessContext) -> Result<AccessDecision>;

    fn description(&self) -> &str {
        "Access gate"
    }

    /// Check if this gate applies to the given request
    fn applies_to(&self, _request: &AccessRequest) -> bool {
        true
    }

    /// Priority of this gate (higher = evaluated first)
    fn priority(&self) -> u32 {
        100
    }

    /// Optional note recorded on the audit card alongside the decision
    fn explain(&self, _request: &AccessRequest, _context: &AccessContext) -> Option<String> {
        None
    }
}

/// Mode for composed gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// All gates must allow; stop at the first that does not
    AllMustAllow,

    /// First gate to deny wins
    #[default]
    FirstDenyWins,

    /// Run every gate; the earliest denial is kept
    MostRestrictive,
}

/// Gate that chains other gates
#[derive(Debug)]
pub struct ComposedAccessGate {
    id: String,
    name: String,
    gates: Vec<Arc<dyn AccessGate>>,
    evaluation_mode: EvaluationMode,
}

impl ComposedAccessGate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gates: Vec::new(),
            evaluation_mode: EvaluationMode::default(),
        }
    }

    pub fn add_gate(mut self, gate: Arc<dyn AccessGate>) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn with_evaluation_mode(mut self, mode: EvaluationMode) -> Self {
        self.evaluation_mode = mode;
        self
    }

    pub fn gate_ids(&self) -> Vec<&str> {
        self.gates.iter().map(|g| g.id()).collect()
    }

    /// Evaluate all gates and record each one on a decision card
    pub fn evaluate_with_card(
        &self,
        request: &AccessRequest,
        context: &AccessContext,
    ) -> Result<AccessDecisionCard> {
        let mut card = AccessDecisionCard::new(
            &request.path,
            request.requirement.codes().to_vec(),
            AccessDecision::allow(),
            &context.actor_id,
            context.is_restricted(),
            &context.request_id,
        );

        // Stable sort keeps insertion order among equal priorities
        let mut sorted_gates = self.gates.clone();
        sorted_gates.sort_by(|a, b| b.priority().cmp(&a.priority()));

        let mut final_decision = AccessDecision::allow();

        for gate in &sorted_gates {
            if !gate.applies_to(request) {
                continue;
            }

            let start = Instant::now();
            let decision = gate.evaluate(request, context).map_err(|e| match e {
                AccessError::EvaluationFailed { .. } => e,
                other => AccessError::EvaluationFailed {
                    gate_id: gate.id().to_string(),
                    reason: other.to_string(),
                },
            })?;
            let duration_us = start.elapsed().as_micros() as u64;

            let mut record =
                GateEvaluationRecord::new(gate.id(), gate.name(), decision.clone(), duration_us);
            if let Some(notes) = gate.explain(request, context) {
                record = record.with_notes(notes);
            }
            card.add_evaluation(record);

            if decision.is_allowed() {
                continue;
            }

            match self.evaluation_mode {
                EvaluationMode::AllMustAllow | EvaluationMode::FirstDenyWins => {
                    final_decision = decision;
                    break;
                }
                EvaluationMode::MostRestrictive => {
                    if final_decision.is_allowed() {
                        final_decision = decision;
                    }
                }
            }
        }

        card.decision = final_decision;
        Ok(card)
    }
}

impl AccessGate for ComposedAccessGate {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, request: &AccessRequest, context: &AccessContext) -> Result<AccessDecision> {
        let card = self.evaluate_with_card(request, context)?;
        Ok(card.decision)
    }

    fn description(&self) -> &str {
        "Composed gate that chains multiple access gates"
    }
}

/// Allow-all gate for testing
#[derive(Debug)]
pub struct AllowAllGate;

impl AccessGate for AllowAllGate {
    fn id(&self) -> &str {
        "allow-all"
    }

    fn name(&self) -> &str {
        "Allow All"
    }

    fn evaluate(&self, _request: &AccessRequest, _context: &AccessContext) -> Result<AccessDecision> {
        Ok(AccessDecision::allow())
    }

    fn description(&self) -> &str {
        "Allows every navigation (for testing only)"
    }

    fn priority(&self) -> u32 {
        0
    }
}

/// Deny-all gate, e.g. for maintenance windows
#[derive(Debug)]
pub struct DenyAllGate {
    reason: DenyReason,
}

impl DenyAllGate {
    pub fn new(reason: DenyReason) -> Self {
        Self { reason }
    }
}

impl AccessGate for DenyAllGate {
    fn id(&self) -> &str {
        "deny-all"
    }

    fn name(&self) -> &str {
        "Deny All"
    }

    fn evaluate(&self, _request: &AccessRequest, _context: &AccessContext) -> Result<AccessDecision> {
        Ok(AccessDecision::deny(self.reason, self.id()))
    }

    fn description(&self) -> &str {
        "Denies every navigation"
    }

    fn priority(&self) -> u32 {
        1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_access_types::ModuleRequirement;

    fn request() -> AccessRequest {
        AccessRequest::new(ModuleRequirement::single("VMS").unwrap(), "/visitor-management")
    }

    /// Denies with a fixed reason at a chosen priority
    #[derive(Debug)]
    struct FixedDeny {
        id: &'static str,
        reason: DenyReason,
        priority: u32,
    }

    impl AccessGate for FixedDeny {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            self.id
        }

        fn evaluate(&self, _r: &AccessRequest, _c: &AccessContext) -> Result<AccessDecision> {
            Ok(AccessDecision::deny(self.reason, self.id))
        }

        fn priority(&self) -> u32 {
            self.priority
        }
    }

    /// Gate whose evaluation always fails
    #[derive(Debug)]
    struct Broken;

    impl AccessGate for Broken {
        fn id(&self) -> &str {
            "broken"
        }

        fn name(&self) -> &str {
            "Broken"
        }

        fn evaluate(&self, _r: &AccessRequest, _c: &AccessContext) -> Result<AccessDecision> {
            Err(AccessError::InvalidConfiguration {
                reason: "no rules loaded".into(),
            })
        }
    }

    #[test]
    fn test_composed_attributes_gate_errors() {
        let inner = ComposedAccessGate::new("inner", "Inner").add_gate(Arc::new(Broken));
        let outer = ComposedAccessGate::new("outer", "Outer")
            .add_gate(Arc::new(AllowAllGate))
            .add_gate(Arc::new(inner));

        match outer.evaluate(&request(), &AccessContext::default()) {
            Err(AccessError::EvaluationFailed { gate_id, reason }) => {
                assert_eq!(gate_id, "broken");
                assert!(reason.contains("no rules loaded"));
            }
            other => panic!("expected evaluation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_allow_all_gate() {
        let decision = AllowAllGate.evaluate(&request(), &AccessContext::default()).unwrap();
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_deny_all_gate() {
        let gate = DenyAllGate::new(DenyReason::Unauthorized);
        let decision = gate.evaluate(&request(), &AccessContext::default()).unwrap();
        assert_eq!(decision.reason(), Some(DenyReason::Unauthorized));
        assert_eq!(decision.policy_id(), Some("deny-all"));
    }

    #[test]
    fn test_composed_all_allow() {
        let composed = ComposedAccessGate::new("composed", "Composed")
            .add_gate(Arc::new(AllowAllGate))
            .add_gate(Arc::new(AllowAllGate))
            .with_evaluation_mode(EvaluationMode::AllMustAllow);

        let card = composed.evaluate_with_card(&request(), &AccessContext::default()).unwrap();
        assert!(card.was_allowed());
        assert_eq!(card.gates_evaluated.len(), 2);
    }

    #[test]
    fn test_composed_first_deny_stops() {
        let composed = ComposedAccessGate::new("composed", "Composed")
            .add_gate(Arc::new(FixedDeny {
                id: "low",
                reason: DenyReason::RestrictedModeViolation,
                priority: 10,
            }))
            .add_gate(Arc::new(FixedDeny {
                id: "high",
                reason: DenyReason::Unauthorized,
                priority: 200,
            }));

        let card = composed.evaluate_with_card(&request(), &AccessContext::default()).unwrap();
        assert_eq!(card.decision.policy_id(), Some("high"));
        assert_eq!(card.gates_evaluated.len(), 1);
    }

    #[test]
    fn test_composed_most_restrictive_runs_everything() {
        let composed = ComposedAccessGate::new("composed", "Composed")
            .add_gate(Arc::new(AllowAllGate))
            .add_gate(Arc::new(FixedDeny {
                id: "first",
                reason: DenyReason::Unauthorized,
                priority: 50,
            }))
            .add_gate(Arc::new(FixedDeny {
                id: "second",
                reason: DenyReason::RestrictedModeViolation,
                priority: 40,
            }))
            .with_evaluation_mode(EvaluationMode::MostRestrictive);

        let card = composed.evaluate_with_card(&request(), &AccessContext::default()).unwrap();
        assert_eq!(card.decision.policy_id(), Some("first"));
        assert_eq!(card.gates_evaluated.len(), 3);
    }

    #[test]
    fn test_empty_composition_allows() {
        let composed = ComposedAccessGate::new("empty", "Empty");
        let decision = composed.evaluate(&request(), &AccessContext::default()).unwrap();
        assert!(decision.is_allowed());
    }
}
