//! Module codes and the catalog of console modules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission code for one functional area of the console
///
/// Codes are compared exactly; `vms` and `VMS` are different codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleCode(String);

impl ModuleCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Look up the catalog entry for this code, if it is a known module
    pub fn known(&self) -> Option<KnownModule> {
        KnownModule::from_code(&self.0)
    }
}

impl fmt::Display for ModuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for ModuleCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<KnownModule> for ModuleCode {
    fn from(module: KnownModule) -> Self {
        Self::new(module.code())
    }
}

/// Modules shipped with the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModule {
    /// Visitor registration and check-in
    VisitorManagement,

    /// Access-control devices and readers
    DeviceManagement,

    /// Evacuation monitoring and muster reporting
    EvacuationMonitoring,

    /// Users, roles and permissions
    UserManagement,
}

impl KnownModule {
    /// All known modules in catalog order
    pub const ALL: [KnownModule; 4] = [
        KnownModule::VisitorManagement,
        KnownModule::DeviceManagement,
        KnownModule::EvacuationMonitoring,
        KnownModule::UserManagement,
    ];

    /// Permission code stored in user profiles
    pub fn code(&self) -> &'static str {
        match self {
            Self::VisitorManagement => "VMS",
            Self::DeviceManagement => "DMG",
            Self::EvacuationMonitoring => "EVS",
            Self::UserManagement => "UMG",
        }
    }

    /// Human-readable module name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::VisitorManagement => "Visitor Management",
            Self::DeviceManagement => "Device Management",
            Self::EvacuationMonitoring => "Evacuation Monitoring",
            Self::UserManagement => "User Management",
        }
    }

    /// Route segment the module's pages live under
    pub fn route_segment(&self) -> &'static str {
        match self {
            Self::VisitorManagement => "visitor-management",
            Self::DeviceManagement => "device-management",
            Self::EvacuationMonitoring => "evacuation-monitoring",
            Self::UserManagement => "user-management",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code() == code)
    }
}

impl fmt::Display for KnownModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_module_lookup() {
        assert_eq!(KnownModule::from_code("EVS"), Some(KnownModule::EvacuationMonitoring));
        assert_eq!(KnownModule::from_code("evs"), None);
        assert_eq!(ModuleCode::new("XYZ").known(), None);
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<_> = KnownModule::ALL.iter().map(|m| m.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), KnownModule::ALL.len());
    }

    #[test]
    fn test_module_code_serializes_as_string() {
        let code = ModuleCode::from(KnownModule::UserManagement);
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"UMG\"");
    }
}
