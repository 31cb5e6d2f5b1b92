//! SSH connection configuration.

use std::time::Duration;

use secrecy::SecretString;

/// SSH connection configuration for one device session.
///
/// Inventory-driven batch runs authenticate with passwords; host keys are
/// accepted without verification, matching how operators point this kind of
/// tool at lab fleets where known_hosts churn constantly.
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port (default: 22).
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Login password.
    pub password: SecretString,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,
}

impl SshConfig {
    /// Build a config with the defaults used throughout netsweep.
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            password,
            connect_timeout: Duration::from_secs(30),
            terminal_width: 511,
            terminal_height: 24,
        }
    }

    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
