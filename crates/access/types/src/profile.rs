//! User profile as persisted by the console after login

use crate::module::ModuleCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Module codes granted to a user
///
/// Profiles written by the console store `Access` either as a
/// comma-delimited string (`"VMS,UMG"`) or as an array of codes. Both
/// shapes are kept as-is. The delimited form is matched by substring
/// containment and the array form element by element; neither is
/// normalized and both are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccessSet {
    /// Array form: `["VMS", "UMG"]`
    List(Vec<String>),

    /// Delimited form: `"VMS,UMG"`
    Delimited(String),
}

impl AccessSet {
    /// Build a list-form access set
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(codes.into_iter().map(Into::into).collect())
    }

    /// Iterate the individual codes for display, skipping empty entries
    pub fn codes(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::List(codes) => Box::new(codes.iter().map(String::as_str).filter(|c| !c.is_empty())),
            Self::Delimited(raw) => Box::new(raw.split(',').map(str::trim).filter(|c| !c.is_empty())),
        }
    }

    /// Case-sensitive membership test
    ///
    /// `Delimited("VMS_ADMIN")` contains `VMS`; `List(["VMS_ADMIN"])` does
    /// not. An empty code is never contained.
    pub fn contains(&self, code: &ModuleCode) -> bool {
        let code = code.as_str();
        if code.is_empty() {
            return false;
        }
        match self {
            Self::List(codes) => codes.iter().any(|c| c == code),
            Self::Delimited(raw) => raw.contains(code),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.codes().next().is_none()
    }
}

impl Default for AccessSet {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

/// Signed-in user's profile
///
/// Only `Access` is interpreted; every other field the backend returned is
/// carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "Access")]
    pub access: AccessSet,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(access: AccessSet) -> Self {
        Self {
            access,
            extra: Map::new(),
        }
    }

    /// Attach an additional profile field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn has_module(&self, code: &ModuleCode) -> bool {
        self.access.contains(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_access() {
        let access = AccessSet::Delimited("VMS,UMG".into());
        assert!(access.contains(&"VMS".into()));
        assert!(access.contains(&"UMG".into()));
        assert!(!access.contains(&"DMG".into()));
    }

    #[test]
    fn test_delimited_access_is_substring_containment() {
        for raw in ["VMS_ADMIN", "VMS UMG", "VMS;UMG", "XVMS", " VMS "] {
            assert!(AccessSet::Delimited(raw.into()).contains(&"VMS".into()), "{raw}");
        }
        assert!(!AccessSet::Delimited("VM,S".into()).contains(&"VMS".into()));
        assert!(!AccessSet::Delimited("VMS".into()).contains(&"".into()));
    }

    #[test]
    fn test_list_access_matches_whole_elements() {
        let access = AccessSet::from_codes(["VMS_ADMIN", " UMG"]);
        assert!(!access.contains(&"VMS".into()));
        assert!(!access.contains(&"UMG".into()));
        assert!(access.contains(&"VMS_ADMIN".into()));
    }

    #[test]
    fn test_access_is_case_sensitive() {
        let access = AccessSet::from_codes(["EVS"]);
        assert!(!access.contains(&"evs".into()));
        assert!(!AccessSet::Delimited("evs,vms".into()).contains(&"EVS".into()));
    }

    #[test]
    fn test_profile_parses_both_shapes() {
        let delimited: UserProfile =
            serde_json::from_str(r#"{"Access":"VMS,DMG","Name":"Front Desk"}"#).unwrap();
        assert!(delimited.has_module(&"DMG".into()));
        assert_eq!(delimited.extra.get("Name"), Some(&Value::from("Front Desk")));

        let list: UserProfile = serde_json::from_str(r#"{"Access":["EVS"]}"#).unwrap();
        assert!(list.has_module(&"EVS".into()));
    }

    #[test]
    fn test_profile_without_access_is_rejected() {
        let parsed = serde_json::from_str::<UserProfile>(r#"{"Name":"nobody"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_empty_access() {
        assert!(AccessSet::Delimited(" , ".into()).is_empty());
        assert!(AccessSet::default().is_empty());
    }
}
