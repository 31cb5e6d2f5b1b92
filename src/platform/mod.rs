//! Platform definitions, registry, and autodetection.
//!
//! A platform bundles everything vendor-specific: prompt patterns per
//! privilege level, escalation commands, failure substrings, and the
//! paging-off commands run at session start. Drivers stay generic and
//! consult the definition for all of it.

pub mod autodetect;
mod definition;
mod privilege;
mod registry;
pub mod vendors;

pub use autodetect::{Fingerprint, fingerprints};
pub use definition::PlatformDefinition;
pub use privilege::PrivilegeLevel;
pub use registry::{PlatformRegistry, lookup};

pub(crate) use autodetect::DETECT_PROMPT;
