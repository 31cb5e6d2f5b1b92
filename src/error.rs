//! Error types for netsweep.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for netsweep operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform/vendor errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Input file errors (inventory, command list)
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Run artifact errors (transcript, session log, run directory)
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Connecting to the host timed out
    #[error("Connection to {host}:{port} timed out after {timeout:?}")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: std::time::Duration,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (prompt detection on the PTY stream).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Prompt pattern was not seen within the read timeout
    #[error("Prompt not found within {0:?}")]
    PatternTimeout(std::time::Duration),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Driver layer errors (session lifecycle, privilege escalation, detection).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call open() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// Platform auto-detection exhausted every fingerprint
    #[error("Could not detect platform for {host}")]
    DetectionFailed { host: String },

    /// Failed to reach the privileged level
    #[error("Failed to enter privilege level '{target}'")]
    EscalationFailed { target: String },
}

/// Platform registry errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Platform name not present in the registry
    #[error("Unknown platform '{name}'")]
    UnknownPlatform { name: String },

    /// A platform with this name is already registered
    #[error("Platform '{name}' is already registered")]
    AlreadyRegistered { name: String },

    /// Registry lock was poisoned
    #[error("Platform registry lock poisoned")]
    RegistryPoisoned,
}

/// Errors reading the inventory or command list files.
///
/// Missing input files are a hard failure for the whole run: a batch tool
/// that silently proceeds with zero devices hides operator mistakes.
#[derive(Error, Debug)]
pub enum InputError {
    /// Inventory CSV could not be opened or parsed
    #[error("Inventory error in {}: {}", .path.display(), .source)]
    Inventory {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Command list could not be read
    #[error("Command list error in {}: {}", .path.display(), .source)]
    CommandList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors creating or renaming per-run files.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Could not create a run directory or per-device file
    #[error("Failed to create {}: {}", .path.display(), .source)]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Could not rename a transcript after a failure
    #[error("Failed to rename {}: {}", .path.display(), .source)]
    Rename {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias using netsweep's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Per-device failure category, used to tag renamed transcripts.
///
/// Every error a session can raise maps onto exactly one of these; the tag
/// string is embedded in the transcript filename so a run directory can be
/// triaged at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// SSH authentication was rejected
    Authentication,
    /// TCP connect or SSH negotiation did not complete
    ConnectTimeout,
    /// A command's output never reached a recognizable prompt
    ReadTimeout,
    /// Anything else (escalation failure, detection failure, I/O, ...)
    Other,
}

impl FailureKind {
    /// Classify an error into the failure category used for file tagging.
    pub fn classify(err: &Error) -> Self {
        match err {
            Error::Transport(TransportError::AuthenticationFailed { .. }) => {
                FailureKind::Authentication
            }
            Error::Transport(TransportError::ConnectTimeout { .. })
            | Error::Transport(TransportError::Disconnected)
            | Error::Transport(TransportError::Ssh(_))
            | Error::Transport(TransportError::Io(_)) => FailureKind::ConnectTimeout,
            Error::Channel(ChannelError::PatternTimeout(_)) => FailureKind::ReadTimeout,
            _ => FailureKind::Other,
        }
    }

    /// The tag appended to a failed session's transcript filename.
    pub fn tag(&self) -> &'static str {
        match self {
            FailureKind::Authentication => "SSHAuthenticationError",
            FailureKind::ConnectTimeout => "SSHTimeoutError",
            FailureKind::ReadTimeout => "ReadTimeoutOrCommandMismatch",
            FailureKind::Other => "Error",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_classify_authentication() {
        let err = Error::Transport(TransportError::AuthenticationFailed {
            user: "admin".to_string(),
        });
        assert_eq!(FailureKind::classify(&err), FailureKind::Authentication);
        assert_eq!(FailureKind::classify(&err).tag(), "SSHAuthenticationError");
    }

    #[test]
    fn test_classify_connect_timeout() {
        let err = Error::Transport(TransportError::ConnectTimeout {
            host: "10.0.0.1".to_string(),
            port: 22,
            timeout: Duration::from_secs(30),
        });
        assert_eq!(FailureKind::classify(&err), FailureKind::ConnectTimeout);
        assert_eq!(FailureKind::classify(&err).tag(), "SSHTimeoutError");
    }

    #[test]
    fn test_classify_read_timeout() {
        let err = Error::Channel(ChannelError::PatternTimeout(Duration::from_secs(60)));
        assert_eq!(FailureKind::classify(&err), FailureKind::ReadTimeout);
        assert_eq!(
            FailureKind::classify(&err).tag(),
            "ReadTimeoutOrCommandMismatch"
        );
    }

    #[test]
    fn test_classify_other() {
        let err = Error::Driver(DriverError::EscalationFailed {
            target: "privilege_exec".to_string(),
        });
        assert_eq!(FailureKind::classify(&err), FailureKind::Other);
        assert_eq!(FailureKind::classify(&err).tag(), "Error");

        let err = Error::Driver(DriverError::DetectionFailed {
            host: "10.0.0.1".to_string(),
        });
        assert_eq!(FailureKind::classify(&err).tag(), "Error");
    }

    #[test]
    fn test_disconnect_counts_as_connection_error() {
        let err = Error::Transport(TransportError::Disconnected);
        assert_eq!(FailureKind::classify(&err), FailureKind::ConnectTimeout);
    }
}
