//! Cisco IOS / IOS-XE platform definition.
//!
//! Covers classic IOS and IOS-XE devices with the usual three levels:
//! `exec` (`>`), `privilege_exec` (`#`), and `configuration`
//! (`(config*)#`). Prompt patterns follow scrapli's IOS-XE driver.

use crate::platform::{PlatformDefinition, PrivilegeLevel};

/// Create the Cisco IOS platform definition.
pub fn platform() -> PlatformDefinition {
    let exec = PrivilegeLevel::new("exec", r"(?mi)^[\w.\-@/:]{1,63}>\s?$").unwrap();

    // "#" also terminates config prompts, hence the not_contains guard
    let privilege_exec = PrivilegeLevel::new("privilege_exec", r"(?mi)^[\w.\-@/:]{1,63}#\s?$")
        .unwrap()
        .with_parent("exec")
        .with_escalate("enable")
        .with_auth(r"(?mi)^(?:enable\s){0,1}password:\s?$")
        .unwrap()
        .with_not_contains("(config");

    let configuration = PrivilegeLevel::new(
        "configuration",
        r"(?mi)^[\w.\-@/:]{1,63}\(config[\w.\-@/:+]{0,32}\)#\s?$",
    )
    .unwrap()
    .with_parent("privilege_exec")
    .with_escalate("configure terminal");

    PlatformDefinition::new("cisco_ios")
        .with_privilege(exec)
        .with_privilege(privilege_exec)
        .with_privilege(configuration)
        .with_privileged_level("privilege_exec")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input detected")
        .with_failure_pattern("% Unknown command")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 512")
}
