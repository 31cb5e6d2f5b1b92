//! Platform autodetection fingerprints.
//!
//! When an inventory row does not name its platform, the driver connects
//! once, then runs each fingerprint's probe command and matches the
//! response against a version-string pattern. The first hit wins. Probe
//! commands are harmless show commands, safe to run at any privilege
//! level on the wrong platform.

use regex::Regex;

/// Prompt pattern used before the platform is known.
///
/// Deliberately loose: it only needs to notice that the device stopped
/// talking and is waiting for input.
pub(crate) const DETECT_PROMPT: &str = r"(?m)[\$#>%]\s?$";

/// One platform fingerprint: a probe command and the pattern its output
/// matches on that platform.
#[derive(Debug, Clone, Copy)]
pub struct Fingerprint {
    /// Registry name of the platform this fingerprint identifies.
    pub platform: &'static str,

    /// Command whose output discriminates the platform.
    pub command: &'static str,

    /// Pattern expected in the probe output.
    pub pattern: &'static str,
}

impl Fingerprint {
    /// Check whether probe output identifies this platform.
    pub fn matches(&self, output: &str) -> bool {
        Regex::new(self.pattern)
            .map(|re| re.is_match(output))
            .unwrap_or(false)
    }
}

/// Fingerprints in probe order.
///
/// Arista precedes Cisco because EOS `show version` output does not
/// contain "Cisco" but IOS devices reject nothing here; ordering keeps
/// the common case to a single probe command per device.
pub fn fingerprints() -> &'static [Fingerprint] {
    &[
        Fingerprint {
            platform: "arista_eos",
            command: "show version",
            pattern: r"Arista Networks",
        },
        Fingerprint {
            platform: "cisco_ios",
            command: "show version",
            pattern: r"Cisco IOS Software|Cisco Internetwork Operating System",
        },
        Fingerprint {
            platform: "juniper_junos",
            command: "show version",
            pattern: r"JUNOS",
        },
        Fingerprint {
            platform: "linux",
            command: "uname -a",
            pattern: r"Linux",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fingerprint_patterns_compile() {
        for fp in fingerprints() {
            assert!(
                Regex::new(fp.pattern).is_ok(),
                "pattern for {} does not compile",
                fp.platform
            );
        }
    }

    #[test]
    fn test_detect_prompt_compiles_and_matches() {
        let re = regex::bytes::Regex::new(DETECT_PROMPT).unwrap();
        assert!(re.is_match(b"router01>"));
        assert!(re.is_match(b"router01# "));
        assert!(re.is_match(b"ops@bastion:~$ "));
        assert!(re.is_match(b"user@host% "));
    }

    #[test]
    fn test_cisco_fingerprint() {
        let fp = &fingerprints()[1];
        assert_eq!(fp.platform, "cisco_ios");
        assert!(fp.matches(
            "Cisco IOS Software, C2960 Software (C2960-LANBASEK9-M), Version 15.0(2)SE11"
        ));
        assert!(fp.matches("Cisco Internetwork Operating System Software"));
        assert!(!fp.matches("Arista Networks EOS"));
    }

    #[test]
    fn test_arista_fingerprint() {
        let fp = &fingerprints()[0];
        assert_eq!(fp.platform, "arista_eos");
        assert!(fp.matches("Arista Networks DCS-7050TX-64\nHardware version: 01.02"));
        assert!(!fp.matches("Cisco IOS Software"));
    }

    #[test]
    fn test_junos_fingerprint() {
        let fp = &fingerprints()[2];
        assert!(fp.matches("Junos: 21.4R3.15\nJUNOS OS Kernel 64-bit"));
    }

    #[test]
    fn test_linux_fingerprint() {
        let fp = &fingerprints()[3];
        assert_eq!(fp.command, "uname -a");
        assert!(fp.matches("Linux bastion 5.15.0-91-generic #101-Ubuntu SMP x86_64 GNU/Linux"));
    }
}
