//! Juniper JUNOS platform definition.
//!
//! JUNOS sessions land in operational mode (`>`), which is already where
//! show commands run; `enable` is therefore a no-op on this platform.
//! Prompts may carry a routing-engine indicator line (`{master:0}`)
//! above them, which the patterns absorb. Patterns follow scrapli's
//! JunOS driver.

use crate::platform::{PlatformDefinition, PrivilegeLevel};

/// Create the Juniper JUNOS platform definition.
pub fn platform() -> PlatformDefinition {
    let operational = PrivilegeLevel::new(
        "operational",
        r"(?mi)^(\{\w+(:(\w+)?\d)?\}\n)?[\w\-@()/:\.]{1,63}>\s?$",
    )
    .unwrap();

    let configuration = PrivilegeLevel::new(
        "configuration",
        r"(?mi)^(\{\w+(:(\w+)?\d)?\}\[edit\]\n)?[\w\-@()/:\.]{1,63}#\s?$",
    )
    .unwrap()
    .with_parent("operational")
    .with_escalate("configure");

    PlatformDefinition::new("juniper_junos")
        .with_privilege(operational)
        .with_privilege(configuration)
        .with_privileged_level("operational")
        .with_failure_pattern("is ambiguous")
        .with_failure_pattern("No valid completions")
        .with_failure_pattern("unknown command")
        .with_failure_pattern("syntax error")
        .with_on_open_command("set cli screen-length 0")
        .with_on_open_command("set cli screen-width 511")
}
