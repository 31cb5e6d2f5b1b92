//! SSH transport implementation using russh.
//!
//! One transport owns one authenticated session and one interactive PTY
//! shell channel. Reads come back as raw chunks; prompt detection happens
//! a layer up so the transport stays a dumb pipe.

use std::sync::Arc;

use log::debug;
use russh::client::{self, Handle, Msg};
use russh::keys::PublicKey;
use russh::{Channel, ChannelMsg, Disconnect};

use super::config::SshConfig;
use crate::error::{Result, TransportError};

/// SSH transport wrapping a russh client session and its shell channel.
pub struct SshTransport {
    /// The russh session handle.
    session: Handle<SshHandler>,

    /// Interactive shell channel opened at connect time.
    channel: Channel<Msg>,
}

impl SshTransport {
    /// Connect, authenticate with the configured password, and open the
    /// interactive shell channel.
    pub async fn connect(config: SshConfig) -> Result<Self> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: None,
            ..Default::default()
        });

        let handler = SshHandler {
            host: config.host.clone(),
        };

        // Connect to the server
        let mut session = tokio::time::timeout(
            config.connect_timeout,
            client::connect(ssh_config, (config.host.as_str(), config.port), handler),
        )
        .await
        .map_err(|_| TransportError::ConnectTimeout {
            host: config.host.clone(),
            port: config.port,
            timeout: config.connect_timeout,
        })?
        .map_err(TransportError::Ssh)?;

        // Authenticate
        Self::authenticate(&mut session, &config).await?;

        // Open the PTY shell channel the whole session runs over
        let channel = Self::open_shell(&session, &config).await?;

        debug!("connected to {}", config.socket_addr());

        Ok(Self { session, channel })
    }

    /// Authenticate with the server using the configured password.
    async fn authenticate(session: &mut Handle<SshHandler>, config: &SshConfig) -> Result<()> {
        use secrecy::ExposeSecret;

        let success = session
            .authenticate_password(&config.username, config.password.expose_secret())
            .await
            .map_err(TransportError::Ssh)?
            .success();

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }

        Ok(())
    }

    /// Open a PTY channel and request a shell on it.
    async fn open_shell(
        session: &Handle<SshHandler>,
        config: &SshConfig,
    ) -> Result<Channel<Msg>> {
        let channel = session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_pty(
                true,
                "xterm",
                config.terminal_width,
                config.terminal_height,
                0,
                0,
                &[],
            )
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_shell(true)
            .await
            .map_err(TransportError::Ssh)?;

        Ok(channel)
    }

    /// Send a line to the remote shell, appending the newline the PTY expects.
    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        let payload = format!("{line}\n");
        self.channel
            .data(payload.as_bytes())
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }

    /// Wait for the next chunk of shell output.
    ///
    /// Returns `TransportError::Disconnected` once the channel reports EOF
    /// or closes; window-adjust and other control messages are skipped.
    pub async fn read_chunk(&mut self) -> Result<Vec<u8>> {
        loop {
            match self.channel.wait().await {
                Some(ChannelMsg::Data { ref data }) => return Ok(data.to_vec()),
                Some(ChannelMsg::ExtendedData { ref data, .. }) => return Ok(data.to_vec()),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) => {
                    return Err(TransportError::Disconnected.into());
                }
                Some(_) => continue,
                None => return Err(TransportError::Disconnected.into()),
            }
        }
    }

    /// Close the connection.
    pub async fn close(self) -> Result<()> {
        self.session
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// SSH client handler for russh.
///
/// Host keys are accepted unconditionally: inventory-driven sweeps hit
/// devices whose keys are rotated, cloned, and re-imaged too often for a
/// known_hosts policy to be useful, and the tool never persists anything
/// about the peer.
struct SshHandler {
    host: String,
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        debug!("accepting host key for {} without verification", self.host);
        Ok(true)
    }
}
