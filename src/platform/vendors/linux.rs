//! Linux platform definition.
//!
//! The simplest platform: `$` for a user shell, `#` for root. Useful for
//! jump hosts and the Linux-based NOS shells that sneak into inventories.

use crate::platform::{PlatformDefinition, PrivilegeLevel};

/// Create the Linux platform definition.
pub fn platform() -> PlatformDefinition {
    let user = PrivilegeLevel::new("user", r"[$]\s*$").unwrap();

    let root = PrivilegeLevel::new("root", r"[#]\s*$")
        .unwrap()
        .with_parent("user")
        .with_escalate("sudo -i")
        .with_auth(r"[Pp]assword[:\s]*$")
        .unwrap();

    PlatformDefinition::new("linux")
        .with_privilege(user)
        .with_privilege(root)
        .with_privileged_level("root")
        .with_failure_pattern("command not found")
        .with_failure_pattern("No such file or directory")
        .with_failure_pattern("Permission denied")
        .with_failure_pattern("Operation not permitted")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_platform() {
        let platform = platform();
        assert_eq!(platform.name, "linux");
        assert_eq!(platform.privilege_levels.len(), 2);
        assert_eq!(platform.privileged_level, "root");
    }

    #[test]
    fn test_user_prompt_match() {
        let platform = platform();
        let user = platform.privilege_levels.get("user").unwrap();

        assert!(user.matches("ops@bastion:~$ "));
        assert!(user.matches("$ "));

        assert!(!user.matches("root@bastion:~# "));
    }

    #[test]
    fn test_root_prompt_match() {
        let platform = platform();
        let root = platform.privilege_levels.get("root").unwrap();

        assert!(root.matches("root@bastion:~# "));
        assert!(root.matches("# "));

        assert!(!root.matches("ops@bastion:~$ "));
    }

    #[test]
    fn test_sudo_escalation() {
        let platform = platform();
        let root = platform.privilege_levels.get("root").unwrap();

        assert_eq!(root.escalate_command.as_deref(), Some("sudo -i"));
        let auth = root.escalate_prompt.as_ref().unwrap();
        assert!(auth.is_match(b"[sudo] password for ops: "));
        assert!(auth.is_match(b"Password:"));
    }
}
