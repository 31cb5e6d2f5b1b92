//! Privilege level definition.

use regex::bytes::Regex;

/// A privilege level a device session can sit at.
///
/// Levels form a chain: each level may name the level below it
/// (`previous_priv`) and the command that climbs up to it. The session
/// only ever escalates; command execution happens wherever
/// [`enable`](crate::driver::Driver::enable) leaves it.
#[derive(Debug, Clone)]
pub struct PrivilegeLevel {
    /// Level name (e.g. "exec", "privilege_exec", "configuration").
    pub name: String,

    /// Prompt pattern identifying this level.
    pub pattern: Regex,

    /// Name of the level this one is entered from (None for the base level).
    pub previous_priv: Option<String>,

    /// Command that escalates to this level from its parent.
    pub escalate_command: Option<String>,

    /// Authentication prompt shown during escalation, when the device
    /// asks for a secret before granting the level.
    pub escalate_prompt: Option<Regex>,

    /// Substrings that must NOT appear in the prompt for this level to
    /// match. Disambiguates levels sharing a terminator ("#" means both
    /// privileged and configuration mode on most vendors).
    pub not_contains: Vec<String>,
}

impl PrivilegeLevel {
    /// Create a privilege level from its name and prompt pattern.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            previous_priv: None,
            escalate_command: None,
            escalate_prompt: None,
            not_contains: vec![],
        })
    }

    /// Set the level this one is entered from.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.previous_priv = Some(parent.into());
        self
    }

    /// Set the escalation command.
    pub fn with_escalate(mut self, command: impl Into<String>) -> Self {
        self.escalate_command = Some(command.into());
        self
    }

    /// Mark escalation as authenticated and set the secret prompt pattern.
    pub fn with_auth(mut self, prompt_pattern: &str) -> Result<Self, regex::Error> {
        self.escalate_prompt = Some(Regex::new(prompt_pattern)?);
        Ok(self)
    }

    /// Add a substring that disqualifies a prompt from matching this level.
    pub fn with_not_contains(mut self, pattern: impl Into<String>) -> Self {
        self.not_contains.push(pattern.into());
        self
    }

    /// Check whether a prompt belongs to this level.
    pub fn matches(&self, prompt: &str) -> bool {
        for nc in &self.not_contains {
            if prompt.contains(nc) {
                return false;
            }
        }

        self.pattern.is_match(prompt.as_bytes())
    }
}
