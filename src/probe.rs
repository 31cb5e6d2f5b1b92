//! Reachability diagnostics for failed sessions.
//!
//! After a session fails, one ICMP probe distinguishes "device is down"
//! from "device is up but SSH misbehaved". The probe shells out to the
//! system `ping` rather than opening a raw socket, so the sweep itself
//! never needs elevated privileges.

use std::io;

use tokio::process::Command;

/// Outcome of one ICMP probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingOutcome {
    /// Echo reply received.
    Success,
    /// No reply within the wait window.
    Timeout,
    /// TTL expired in transit; routing loop or distant filter.
    TtlExpired,
    /// Destination or network unreachable, or the name failed to resolve.
    Unreachable,
    /// The probe itself was not allowed to run.
    PermissionDenied,
    /// Anything else.
    Other,
}

impl PingOutcome {
    /// Tag used in session logs.
    pub fn label(&self) -> &'static str {
        match self {
            PingOutcome::Success => "PingSuccess",
            PingOutcome::Timeout => "PingTimeout",
            PingOutcome::TtlExpired => "PingTTLExpired",
            PingOutcome::Unreachable => "PingUnreachable",
            PingOutcome::PermissionDenied => "PermissionError",
            PingOutcome::Other => "PingOtherError",
        }
    }
}

/// Probe a host with a single ping and a one second wait.
pub async fn ping_check(host: &str) -> PingOutcome {
    let result = Command::new("ping")
        .args(["-c", "1", "-W", "1"])
        .arg(host)
        .output()
        .await;

    match result {
        Ok(output) => classify_output(
            output.status.code(),
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        ),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            PingOutcome::PermissionDenied
        }
        Err(_) => PingOutcome::Other,
    }
}

/// Classify a finished ping by exit code and output text.
fn classify_output(code: Option<i32>, stdout: &str, stderr: &str) -> PingOutcome {
    if code == Some(0) {
        return PingOutcome::Success;
    }

    let combined = format!("{stdout}\n{stderr}").to_lowercase();

    if combined.contains("time to live exceeded") {
        return PingOutcome::TtlExpired;
    }
    if combined.contains("operation not permitted") {
        return PingOutcome::PermissionDenied;
    }
    if combined.contains("unreachable")
        || combined.contains("name or service not known")
        || combined.contains("failure in name resolution")
        || combined.contains("unknown host")
    {
        return PingOutcome::Unreachable;
    }

    // Plain exit 1 with no distinguishing text is a silent drop.
    if code == Some(1) {
        return PingOutcome::Timeout;
    }

    PingOutcome::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_zero_is_success() {
        let outcome = classify_output(
            Some(0),
            "64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=0.4 ms",
            "",
        );
        assert_eq!(outcome, PingOutcome::Success);
    }

    #[test]
    fn test_silent_drop_is_timeout() {
        let outcome = classify_output(
            Some(1),
            "PING 10.0.0.9 (10.0.0.9) 56(84) bytes of data.\n\n--- 10.0.0.9 ping statistics ---\n1 packets transmitted, 0 received, 100% packet loss, time 0ms",
            "",
        );
        assert_eq!(outcome, PingOutcome::Timeout);
    }

    #[test]
    fn test_ttl_expired() {
        let outcome = classify_output(
            Some(1),
            "From 192.0.2.1 icmp_seq=1 Time to live exceeded",
            "",
        );
        assert_eq!(outcome, PingOutcome::TtlExpired);
    }

    #[test]
    fn test_host_unreachable() {
        let outcome = classify_output(
            Some(1),
            "From 10.0.0.254 icmp_seq=1 Destination Host Unreachable",
            "",
        );
        assert_eq!(outcome, PingOutcome::Unreachable);
    }

    #[test]
    fn test_name_resolution_failure() {
        let outcome = classify_output(
            Some(2),
            "",
            "ping: no-such-device.example: Name or service not known",
        );
        assert_eq!(outcome, PingOutcome::Unreachable);
    }

    #[test]
    fn test_permission_denied_text() {
        let outcome = classify_output(Some(2), "", "ping: socket: Operation not permitted");
        assert_eq!(outcome, PingOutcome::PermissionDenied);
    }

    #[test]
    fn test_labels() {
        assert_eq!(PingOutcome::Success.label(), "PingSuccess");
        assert_eq!(PingOutcome::TtlExpired.label(), "PingTTLExpired");
        assert_eq!(PingOutcome::PermissionDenied.label(), "PermissionError");
    }
}
