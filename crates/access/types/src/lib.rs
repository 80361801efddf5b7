//! Facility Access Types - Core types for module-access authorization
//!
//! The facility management console splits its functionality into modules
//! (visitor management, device management, evacuation monitoring, user
//! management). Each signed-in user carries a set of module codes in their
//! profile, and every protected route section names the codes it accepts.
//!
//! ## Key Concepts
//!
//! - **ModuleCode**: Short permission code such as `VMS` or `EVS`
//! - **ModuleRequirement**: Non-empty list of codes a route accepts (any one suffices)
//! - **AccessSet**: The codes granted to a user, as stored in their profile
//! - **SessionSnapshot**: Point-in-time read of the persisted session
//! - **EnvironmentMode**: Deployment-wide restricted-mode switch

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod environment;
pub mod module;
pub mod profile;
pub mod requirement;
pub mod session;

// Re-export main types
pub use environment::{EnvironmentMode, RESTRICTED_MODE_FLAG};
pub use module::{KnownModule, ModuleCode};
pub use profile::{AccessSet, UserProfile};
pub use requirement::{ModuleRequirement, RequirementError};
pub use session::{ProfileState, SessionSnapshot, TOKEN_KEY, USER_KEY};
