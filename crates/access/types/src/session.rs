//! Session snapshot read from the console's key-value session storage

use crate::profile::{AccessSet, UserProfile};
use serde::{Deserialize, Serialize};

/// Storage key holding the opaque credential
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the serialized user profile
pub const USER_KEY: &str = "user";

/// What was found under the `user` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ProfileState {
    /// Nothing stored (or a stored JSON `null`)
    Absent,

    /// Profile parsed successfully
    Parsed(UserProfile),

    /// Something was stored but it is not a usable profile
    Malformed(String),
}

/// Point-in-time view of the persisted session
///
/// Taken fresh for every navigation; never cached between decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub profile: ProfileState,
}

impl SessionSnapshot {
    /// No session at all
    pub fn empty() -> Self {
        Self {
            token: None,
            profile: ProfileState::Absent,
        }
    }

    /// Session for an already-parsed profile
    pub fn new(token: impl Into<String>, profile: UserProfile) -> Self {
        Self {
            token: Some(token.into()),
            profile: ProfileState::Parsed(profile),
        }
    }

    /// Build a snapshot from the raw stored values
    ///
    /// Never fails: an unparsable profile becomes [`ProfileState::Malformed`].
    pub fn from_raw(token: Option<String>, user: Option<&str>) -> Self {
        let profile = match user {
            None => ProfileState::Absent,
            Some(raw) if raw.trim().is_empty() => ProfileState::Absent,
            Some(raw) => match serde_json::from_str::<Option<UserProfile>>(raw) {
                Ok(Some(profile)) => ProfileState::Parsed(profile),
                Ok(None) => ProfileState::Absent,
                Err(e) => ProfileState::Malformed(e.to_string()),
            },
        };
        Self { token, profile }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match &self.profile {
            ProfileState::Parsed(profile) => Some(profile),
            _ => None,
        }
    }

    /// Granted module codes; `None` when there is no usable profile
    pub fn access(&self) -> Option<&AccessSet> {
        self.user().map(|u| &u.access)
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_absent(&self) -> bool {
        self.token.is_none() && matches!(self.profile, ProfileState::Absent)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.profile, ProfileState::Malformed(_))
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
