//! Module requirements declared by protected routes

use crate::module::ModuleCode;
use crate::profile::AccessSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Invalid module requirement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementError {
    /// A route must accept at least one module
    #[error("module requirement must name at least one module code")]
    Empty,

    /// A listed code was empty or whitespace
    #[error("module code at position {position} is blank")]
    BlankCode { position: usize },

    /// A listed code has leading or trailing whitespace
    #[error("module code at position {position} has surrounding whitespace")]
    PaddedCode { position: usize },
}

/// Ordered list of module codes a route accepts
///
/// Satisfied when the user holds any one of the codes. Always non-empty;
/// codes are matched verbatim and may not carry surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ModuleCode>", into = "Vec<ModuleCode>")]
pub struct ModuleRequirement {
    codes: Vec<ModuleCode>,
}

impl ModuleRequirement {
    pub fn new<I, C>(codes: I) -> Result<Self, RequirementError>
    where
        I: IntoIterator<Item = C>,
        C: Into<ModuleCode>,
    {
        let codes: Vec<ModuleCode> = codes.into_iter().map(Into::into).collect();
        if codes.is_empty() {
            return Err(RequirementError::Empty);
        }
        if let Some(position) = codes.iter().position(|c| c.as_str().trim().is_empty()) {
            return Err(RequirementError::BlankCode { position });
        }
        if let Some(position) = codes.iter().position(|c| c.as_str().trim() != c.as_str()) {
            return Err(RequirementError::PaddedCode { position });
        }
        Ok(Self { codes })
    }

    /// Requirement naming a single module
    pub fn single(code: impl Into<ModuleCode>) -> Result<Self, RequirementError> {
        Self::new([code.into()])
    }

    pub fn codes(&self) -> &[ModuleCode] {
        &self.codes
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleCode> {
        self.codes.iter()
    }

    /// First required code present in `access`, if any
    pub fn first_match<'a>(&'a self, access: &AccessSet) -> Option<&'a ModuleCode> {
        self.codes.iter().find(|code| access.contains(code))
    }

    pub fn is_satisfied_by(&self, access: &AccessSet) -> bool {
        self.first_match(access).is_some()
    }
}

impl TryFrom<Vec<ModuleCode>> for ModuleRequirement {
    type Error = RequirementError;

    fn try_from(codes: Vec<ModuleCode>) -> Result<Self, Self::Error> {
        Self::new(codes)
    }
}

impl From<ModuleRequirement> for Vec<ModuleCode> {
    fn from(requirement: ModuleRequirement) -> Self {
        requirement.codes
    }
}

impl fmt::Display for ModuleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.codes.iter().map(ModuleCode::as_str).collect();
        write!(f, "any of [{}]", joined.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_requirement_rejected() {
        let codes: Vec<&str> = Vec::new();
        assert_eq!(ModuleRequirement::new(codes), Err(RequirementError::Empty));
    }

    #[test]
    fn test_blank_code_rejected() {
        assert_eq!(
            ModuleRequirement::new(["VMS", "  "]),
            Err(RequirementError::BlankCode { position: 1 })
        );
    }

    #[test]
    fn test_padded_code_rejected() {
        assert_eq!(
            ModuleRequirement::new(["UMG", " VMS"]),
            Err(RequirementError::PaddedCode { position: 1 })
        );
        assert_eq!(
            ModuleRequirement::single("EVS\n"),
            Err(RequirementError::PaddedCode { position: 0 })
        );
    }

    #[test]
    fn test_any_code_satisfies() {
        let requirement = ModuleRequirement::new(["DMG", "UMG"]).unwrap();
        let access = AccessSet::Delimited("VMS,UMG".into());
        assert!(requirement.is_satisfied_by(&access));
        assert_eq!(requirement.first_match(&access).map(ModuleCode::as_str), Some("UMG"));
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<ModuleRequirement>("[]").is_err());
        let parsed: ModuleRequirement = serde_json::from_str(r#"["EVS"]"#).unwrap();
        assert_eq!(parsed.to_string(), "any of [EVS]");
    }
}
