//! Response type for command execution results.

use std::time::Duration;

/// Result of running one command on a device.
///
/// `output` is the full captured exchange: command echo, device output,
/// and the trailing prompt. Reports and transcripts want the exchange
/// exactly as the device showed it, so nothing is stripped.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was sent.
    pub command: String,

    /// Captured output, echo and trailing prompt included.
    pub output: String,

    /// The prompt matched at the end of the output.
    pub prompt: String,

    /// Time from send to prompt match.
    pub elapsed: Duration,

    /// Failure message when the output matched a platform failure pattern.
    pub failure_message: Option<String>,
}

impl Response {
    /// Create a successful response.
    pub fn new(
        command: impl Into<String>,
        output: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            output: output.into(),
            prompt: prompt.into(),
            elapsed,
            failure_message: None,
        }
    }

    /// Create a failed response.
    pub fn failed(
        command: impl Into<String>,
        output: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
        failure_message: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            output: output.into(),
            prompt: prompt.into(),
            elapsed,
            failure_message: Some(failure_message.into()),
        }
    }

    /// Whether the device accepted the command.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.output)
    }
}
