//! Arista EOS platform definition.
//!
//! EOS prompts mirror Cisco's (`>`, `#`, `(config*)#`) but allow spaces
//! and parentheses in the hostname segment. Patterns follow scrapli's
//! EOS driver.

use crate::platform::{PlatformDefinition, PrivilegeLevel};

/// Create the Arista EOS platform definition.
pub fn platform() -> PlatformDefinition {
    let exec = PrivilegeLevel::new("exec", r"(?mi)^[\w.\-@()/: ]{1,63}>\s?$").unwrap();

    let privilege_exec = PrivilegeLevel::new("privilege_exec", r"(?mi)^[\w.\-@()/: ]{1,63}#\s?$")
        .unwrap()
        .with_parent("exec")
        .with_escalate("enable")
        .with_auth(r"(?mi)^password:\s?$")
        .unwrap()
        .with_not_contains("(config");

    // not_contains "(config-s-" keeps named config sessions out
    let configuration = PrivilegeLevel::new(
        "configuration",
        r"(?mi)^[\w.\-@()/: ]{1,63}\(config[\w.\-@/:+]{0,63}\)#\s?$",
    )
    .unwrap()
    .with_parent("privilege_exec")
    .with_escalate("configure terminal")
    .with_not_contains("(config-s-");

    PlatformDefinition::new("arista_eos")
        .with_privilege(exec)
        .with_privilege(privilege_exec)
        .with_privilege(configuration)
        .with_privileged_level("privilege_exec")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Error")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Unavailable command")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 32767")
}
