//! Global platform registry for looking up platform definitions.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use super::definition::PlatformDefinition;
use super::vendors;
use crate::error::{PlatformError, Result};

/// Global platform registry, populated with the built-in vendors.
static REGISTRY: Lazy<RwLock<PlatformRegistry>> = Lazy::new(|| {
    let mut registry = PlatformRegistry::new();
    registry.register_builtin_platforms();
    RwLock::new(registry)
});

/// Registry for platform definitions.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: HashMap<String, PlatformDefinition>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            platforms: HashMap::new(),
        }
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<PlatformRegistry> {
        &REGISTRY
    }

    fn register_builtin_platforms(&mut self) {
        for platform in [
            vendors::arista_eos::platform(),
            vendors::cisco_ios::platform(),
            vendors::juniper_junos::platform(),
            vendors::linux::platform(),
        ] {
            self.platforms.insert(platform.name.clone(), platform);
        }
    }

    /// Register a platform definition.
    pub fn register(&mut self, platform: PlatformDefinition) -> Result<()> {
        if self.platforms.contains_key(&platform.name) {
            return Err(PlatformError::AlreadyRegistered {
                name: platform.name.clone(),
            }
            .into());
        }
        self.platforms.insert(platform.name.clone(), platform);
        Ok(())
    }

    /// Get a platform by name.
    pub fn get(&self, name: &str) -> Option<&PlatformDefinition> {
        self.platforms.get(name)
    }

    /// Check if a platform is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.platforms.contains_key(name)
    }
}

/// Look up a platform in the global registry by name, returning an owned
/// copy so no lock is held while the session uses it.
pub fn lookup(name: &str) -> Result<PlatformDefinition> {
    let registry = PlatformRegistry::global()
        .read()
        .map_err(|_| PlatformError::RegistryPoisoned)?;

    registry
        .get(name)
        .cloned()
        .ok_or_else(|| {
            PlatformError::UnknownPlatform {
                name: name.to_string(),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_builtin_platforms_registered() {
        let registry = PlatformRegistry::global().read().unwrap();
        assert!(registry.contains("arista_eos"));
        assert!(registry.contains("cisco_ios"));
        assert!(registry.contains("juniper_junos"));
        assert!(registry.contains("linux"));
    }

    #[test]
    fn test_lookup_returns_owned_definition() {
        let platform = lookup("cisco_ios").unwrap();
        assert_eq!(platform.name, "cisco_ios");
    }

    #[test]
    fn test_lookup_unknown_platform() {
        let err = lookup("vax_vms").unwrap_err();
        assert!(matches!(
            err,
            Error::Platform(PlatformError::UnknownPlatform { .. })
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = PlatformRegistry::new();
        registry.register(vendors::linux::platform()).unwrap();
        let err = registry.register(vendors::linux::platform()).unwrap_err();
        assert!(matches!(
            err,
            Error::Platform(PlatformError::AlreadyRegistered { .. })
        ));
    }
}
