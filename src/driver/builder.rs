//! Builder for creating device drivers.

use std::time::Duration;

use secrecy::SecretString;

use super::network::NetworkDriver;
use crate::artifacts::Transcript;
use crate::transport::SshConfig;

/// Builder for [`NetworkDriver`].
///
/// # Example
///
/// ```rust,no_run
/// use netsweep::driver::DriverBuilder;
///
/// let driver = DriverBuilder::new("192.168.1.1")
///     .username("admin")
///     .password("secret".to_string().into())
///     .platform("cisco_ios")
///     .build();
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    username: String,
    password: Option<SecretString>,
    secret: Option<SecretString>,
    platform_name: Option<String>,
    read_timeout: Duration,
    connect_timeout: Duration,
    transcript: Option<Transcript>,
}

impl DriverBuilder {
    /// Create a builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: String::new(),
            password: None,
            secret: None,
            platform_name: None,
            read_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(30),
            transcript: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the login password.
    pub fn password(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }

    /// Set the escalation secret (enable password, sudo password).
    /// Falls back to the login password when unset.
    pub fn secret(mut self, secret: SecretString) -> Self {
        self.secret = Some(secret);
        self
    }

    /// Name the platform instead of autodetecting it.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform_name = Some(platform.into());
        self
    }

    /// Set the per-read prompt timeout (default: 60s).
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the connection establishment timeout (default: 30s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Attach a transcript that receives every byte the session captures.
    pub fn transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = Some(transcript);
        self
    }

    /// Build the driver. Nothing connects until `open()`.
    ///
    /// Platform resolution also waits for `open()`: with no platform
    /// named here, the driver autodetects against the live device.
    pub fn build(self) -> NetworkDriver {
        let password = self.password.unwrap_or_else(|| SecretString::from(String::new()));
        let secret = self.secret.unwrap_or_else(|| password.clone());

        let mut config = SshConfig::new(self.host, self.username, password);
        config.port = self.port;
        config.connect_timeout = self.connect_timeout;

        NetworkDriver::new(
            config,
            secret,
            self.platform_name,
            self.read_timeout,
            self.transcript,
        )
    }
}
