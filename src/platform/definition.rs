//! Platform definition for vendor-specific behavior.

use indexmap::IndexMap;
use regex::bytes::Regex;

use super::privilege::PrivilegeLevel;

/// Everything the driver needs to know about one network OS.
///
/// Definitions are plain data: prompt patterns per privilege level, the
/// level command execution should happen at, failure substrings, and the
/// session-preparation commands (disable paging and so on) run right
/// after connect.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g. "cisco_ios", "juniper_junos", "linux").
    pub name: String,

    /// Privilege levels, in chain order from base upward.
    pub privilege_levels: IndexMap<String, PrivilegeLevel>,

    /// The level commands should run at; `enable` escalates to it.
    pub privileged_level: String,

    /// Substrings in command output that indicate the device rejected
    /// or mangled the command.
    pub failed_when_contains: Vec<String>,

    /// Commands sent once after connect to make output scraping safe.
    pub on_open_commands: Vec<String>,
}

impl PlatformDefinition {
    /// Create an empty definition for the named platform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privilege_levels: IndexMap::new(),
            privileged_level: String::new(),
            failed_when_contains: vec![],
            on_open_commands: vec![],
        }
    }

    /// Add a privilege level.
    pub fn with_privilege(mut self, level: PrivilegeLevel) -> Self {
        self.privilege_levels.insert(level.name.clone(), level);
        self
    }

    /// Name the level `enable` should escalate to.
    pub fn with_privileged_level(mut self, name: impl Into<String>) -> Self {
        self.privileged_level = name.into();
        self
    }

    /// Add a failure substring.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Add a session-preparation command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Get a privilege level by name.
    pub fn get_privilege(&self, name: &str) -> Option<&PrivilegeLevel> {
        self.privilege_levels.get(name)
    }

    /// Find which privilege level a prompt belongs to.
    ///
    /// Levels are checked in insertion order, so vendor modules list the
    /// most specific level first when patterns overlap.
    pub fn match_privilege(&self, prompt: &str) -> Option<&PrivilegeLevel> {
        self.privilege_levels
            .values()
            .find(|level| level.matches(prompt))
    }

    /// Build a single pattern matching any of this platform's prompts.
    ///
    /// Used while the session privilege is still unknown (right after
    /// connect, and mid-escalation).
    pub fn combined_prompt_pattern(&self) -> Regex {
        let mut alternatives = String::new();
        for level in self.privilege_levels.values() {
            if !alternatives.is_empty() {
                alternatives.push('|');
            }
            alternatives.push_str(&format!("(?:{})", level.pattern.as_str()));
        }

        Regex::new(&alternatives).unwrap_or_else(|_| Regex::new(r"[$#>]\s*$").unwrap())
    }
}
