//! Route loader integration
//!
//! A router calls the loader before rendering a protected subtree. The
//! loader snapshots the session store and flags, evaluates access, and on
//! denial returns a [`NavigationAbort`] that does not reveal which kind of
//! denial happened.

use crate::config::GuardConfig;
use crate::context::{AccessContext, AccessRequest};
use crate::decision::{AccessDecision, AccessDecisionCard};
use crate::error::Result;
use crate::evaluator::AccessEvaluator;
use crate::flags::{read_environment_mode, FlagSource};
use crate::store::{read_session, SessionStore};
use facility_access_types::{ModuleCode, ModuleRequirement, SessionSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::error;

/// Message used when a route supplies no fallback error
pub const DEFAULT_FORBIDDEN_MESSAGE: &str = "Forbidden";

/// What a route does when access is denied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGuardOptions {
    /// Redirect here on denial; takes precedence over `fallback_error`
    pub on_fail_redirect_to: Option<String>,

    /// Error message raised on denial when no redirect is configured
    pub fallback_error: Option<String>,
}

impl RouteGuardOptions {
    pub fn redirect_to(target: impl Into<String>) -> Self {
        Self {
            on_fail_redirect_to: Some(target.into()),
            fallback_error: None,
        }
    }

    pub fn fail_with(message: impl Into<String>) -> Self {
        Self {
            on_fail_redirect_to: None,
            fallback_error: Some(message.into()),
        }
    }

    fn abort(&self) -> NavigationAbort {
        match (&self.on_fail_redirect_to, &self.fallback_error) {
            (Some(to), _) => NavigationAbort::Redirect { to: to.clone() },
            (None, Some(message)) => NavigationAbort::Forbidden {
                message: message.clone(),
            },
            (None, None) => NavigationAbort::Forbidden {
                message: DEFAULT_FORBIDDEN_MESSAGE.to_string(),
            },
        }
    }
}

/// Signal telling the router to abandon a navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "abort", rename_all = "snake_case")]
pub enum NavigationAbort {
    /// Send the user elsewhere
    Redirect { to: String },

    /// Raise an error in place of the route
    Forbidden { message: String },
}

impl fmt::Display for NavigationAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redirect { to } => write!(f, "redirect to {to}"),
            Self::Forbidden { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for NavigationAbort {}

/// Factory for module-access route loaders sharing one store, flag source and evaluator
#[derive(Debug, Clone)]
pub struct RouteGuard {
    evaluator: Arc<AccessEvaluator>,
    store: Arc<dyn SessionStore>,
    flags: Arc<dyn FlagSource>,
    flag_key: String,
    actor_id: Option<String>,
}

impl RouteGuard {
    pub fn new(
        config: &GuardConfig,
        store: Arc<dyn SessionStore>,
        flags: Arc<dyn FlagSource>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            evaluator: Arc::new(AccessEvaluator::new(config)),
            store,
            flags,
            flag_key: config.restricted_flag_key.clone(),
            actor_id: None,
        })
    }

    /// Use a custom evaluator in place of the default stack
    pub fn with_evaluator(mut self, evaluator: Arc<AccessEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Identity recorded on decision cards and audit events
    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    /// Build the loader for a route accepting any of `required_modules`
    ///
    /// An empty module list is rejected here, at the call site.
    pub fn with_module_access<I, C>(
        &self,
        required_modules: I,
        options: RouteGuardOptions,
    ) -> Result<ModuleAccessLoader>
    where
        I: IntoIterator<Item = C>,
        C: Into<ModuleCode>,
    {
        Ok(ModuleAccessLoader {
            requirement: ModuleRequirement::new(required_modules)?,
            options,
            guard: self.clone(),
        })
    }

    /// Take a fresh snapshot of session and flags and evaluate
    pub fn decide(&self, requirement: &ModuleRequirement, location: &str) -> AccessDecision {
        self.decide_with_card(requirement, location).decision
    }

    /// Like [`decide`](Self::decide) but returns the full decision card
    pub fn decide_with_card(
        &self,
        requirement: &ModuleRequirement,
        location: &str,
    ) -> AccessDecisionCard {
        let session = match read_session(self.store.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, path = %location, "Session store unreadable, treating as signed out");
                SessionSnapshot::empty()
            }
        };
        let environment = read_environment_mode(self.flags.as_ref(), &self.flag_key);

        let request = AccessRequest::new(requirement.clone(), location);
        let mut context = AccessContext::new(session, environment);
        if let Some(actor_id) = &self.actor_id {
            context = context.with_actor(actor_id.clone());
        }
        self.evaluator.decide_with_card(&request, &context)
    }
}

/// Loader for one protected route section
#[derive(Debug, Clone)]
pub struct ModuleAccessLoader {
    requirement: ModuleRequirement,
    options: RouteGuardOptions,
    guard: RouteGuard,
}

impl ModuleAccessLoader {
    pub fn requirement(&self) -> &ModuleRequirement {
        &self.requirement
    }

    pub fn options(&self) -> &RouteGuardOptions {
        &self.options
    }

    /// Run the guard for a navigation to `location`
    pub fn activate(&self, location: &str) -> std::result::Result<(), NavigationAbort> {
        match self.guard.decide(&self.requirement, location) {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny { .. } => Err(self.options.abort()),
        }
    }

    /// Like [`activate`](Self::activate) but returns the decision card,
    /// including the deny kind, for diagnostics
    pub fn inspect(&self, location: &str) -> AccessDecisionCard {
        self.guard.decide_with_card(&self.requirement, location)
    }

    /// Zero-argument procedure bound to a location, for routers that call loaders without arguments
    pub fn bind<'a>(
        &'a self,
        location: &'a str,
    ) -> impl Fn() -> std::result::Result<(), NavigationAbort> + 'a {
        move || self.activate(location)
    }
}
