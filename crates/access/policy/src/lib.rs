//! # Facility Access Policy
//!
//! Module-access authorization for the facility management console.
//!
//! ## Overview
//!
//! Every protected route section of the console declares the module codes
//! it accepts. Before the section renders, the guard decides whether the
//! current session may enter it:
//!
//! - The user's `Access` set must contain **any** of the route's codes
//! - When the deployment is in evacuation-only mode (`IS_EVS_ONLY=true`),
//!   only paths under `evacuation-monitoring` are reachable, whatever the
//!   user's own permissions
//!
//! Anything ambiguous (no session, an unparsable profile, an unreadable
//! store) denies.
//!
//! ## Key Components
//!
//! - [`evaluate_access`]: Pure decision function over injected inputs
//! - [`AccessGate`]: Trait for individual checks
//! - [`AccessEvaluator`]: Runs the gate stack and logs decisions
//! - [`AccessDecisionCard`]: Audit record of one evaluation
//! - [`RouteGuard`] / [`ModuleAccessLoader`]: Router integration
//! - [`SessionStore`] / [`FlagSource`]: Injected collaborators
//!
//! ## Example
//!
//! ```rust
//! use facility_access_policy::{evaluate_access, DenyReason};
//! use facility_access_types::{
//!     AccessSet, EnvironmentMode, ModuleRequirement, SessionSnapshot, UserProfile,
//! };
//!
//! let required = ModuleRequirement::single("VMS").unwrap();
//! let session = SessionSnapshot::new(
//!     "token",
//!     UserProfile::new(AccessSet::Delimited("VMS,UMG".into())),
//! );
//!
//! let decision = evaluate_access(
//!     &required,
//!     "/visitor-management",
//!     &session,
//!     EnvironmentMode::unrestricted(),
//! );
//! assert!(decision.is_allowed());
//!
//! let decision = evaluate_access(
//!     &required,
//!     "/visitor-management",
//!     &session,
//!     EnvironmentMode::evs_only(),
//! );
//! assert_eq!(decision.reason(), Some(DenyReason::RestrictedModeViolation));
//! ```
//!
//! ## Router Integration
//!
//! ```rust
//! use std::sync::Arc;
//! use facility_access_policy::{
//!     GuardConfig, MemorySessionStore, NavigationAbort, RouteGuard, RouteGuardOptions,
//!     StaticFlags,
//! };
//!
//! let guard = RouteGuard::new(
//!     &GuardConfig::default(),
//!     Arc::new(MemorySessionStore::new()),
//!     Arc::new(StaticFlags::new()),
//! )
//! .unwrap();
//!
//! let loader = guard
//!     .with_module_access(["UMG"], RouteGuardOptions::redirect_to("/login"))
//!     .unwrap();
//!
//! assert_eq!(
//!     loader.activate("/user-management"),
//!     Err(NavigationAbort::Redirect { to: "/login".into() })
//! );
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod context;
pub mod decision;
pub mod error;
pub mod evaluator;
pub mod flags;
pub mod gate;
pub mod policies;
pub mod route;
pub mod store;

// Re-exports
pub use config::GuardConfig;
pub use context::{AccessContext, AccessRequest};
pub use decision::{AccessDecision, AccessDecisionCard, DenyReason, GateEvaluationRecord};
pub use error::{AccessError, Result};
pub use evaluator::{AccessEvaluator, AccessEvaluatorBuilder};
pub use flags::{read_environment_mode, EnvFlags, FlagSource, LayeredFlags, StaticFlags};
pub use gate::{AccessGate, AllowAllGate, ComposedAccessGate, DenyAllGate, EvaluationMode};
pub use policies::{
    create_default_policy, default_gates, ModuleMembershipPolicy, RestrictedModePolicy,
};
pub use route::{
    ModuleAccessLoader, NavigationAbort, RouteGuard, RouteGuardOptions, DEFAULT_FORBIDDEN_MESSAGE,
};
pub use store::{
    clear_session, establish_session, read_session, JsonFileSessionStore, MemorySessionStore,
    SessionStore,
};

use facility_access_types::{EnvironmentMode, ModuleRequirement, SessionSnapshot};

/// Decide whether a navigation into a protected section is permitted
///
/// Pure over its inputs: the same arguments always yield the same decision.
/// Runs the default gate stack without audit logging.
pub fn evaluate_access(
    required_modules: &ModuleRequirement,
    current_path: &str,
    session: &SessionSnapshot,
    env_mode: EnvironmentMode,
) -> AccessDecision {
    let evaluator = AccessEvaluator::default().with_emit_audit_events(false);
    let request = AccessRequest::new(required_modules.clone(), current_path);
    let context = AccessContext::new(session.clone(), env_mode);
    evaluator.decide(&request, &context)
}
