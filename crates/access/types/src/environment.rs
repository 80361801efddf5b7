//! Deployment-wide environment mode

use serde::{Deserialize, Serialize};

/// Flag that restricts a deployment to evacuation monitoring only
pub const RESTRICTED_MODE_FLAG: &str = "IS_EVS_ONLY";

/// Deployment mode flags read once per decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentMode {
    /// The deployment is licensed for evacuation monitoring alone
    pub is_evs_only: bool,
}

impl EnvironmentMode {
    pub fn unrestricted() -> Self {
        Self { is_evs_only: false }
    }

    pub fn evs_only() -> Self {
        Self { is_evs_only: true }
    }

    /// Interpret a raw flag value; only the exact string `"true"` enables it
    pub fn from_flag(raw: Option<&str>) -> Self {
        Self {
            is_evs_only: raw == Some("true"),
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.is_evs_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_interpretation() {
        assert!(EnvironmentMode::from_flag(Some("true")).is_restricted());
        assert!(!EnvironmentMode::from_flag(Some("TRUE")).is_restricted());
        assert!(!EnvironmentMode::from_flag(Some("1")).is_restricted());
        assert!(!EnvironmentMode::from_flag(Some("false")).is_restricted());
        assert!(!EnvironmentMode::from_flag(None).is_restricted());
    }
}
