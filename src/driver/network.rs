//! Network device driver over SSH.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, info};
use regex::bytes::Regex;
use secrecy::SecretString;

use super::Driver;
use super::response::Response;
use crate::artifacts::Transcript;
use crate::channel::CaptureBuffer;
use crate::error::{ChannelError, DriverError, Result};
use crate::platform::{self, DETECT_PROMPT, PlatformDefinition, PrivilegeLevel};
use crate::transport::{SshConfig, SshTransport};

/// Driver for one interactive device session.
///
/// Construction via [`DriverBuilder`](super::DriverBuilder) is cheap and
/// offline; `open()` connects, resolves the platform (from the hint or by
/// fingerprinting the live device), and runs the platform's
/// session-preparation commands. All captured output flows into the
/// attached transcript as it arrives.
pub struct NetworkDriver {
    /// SSH connection parameters.
    config: SshConfig,

    /// Escalation secret (enable password, sudo password).
    secret: SecretString,

    /// Platform named up front; None means autodetect at open.
    platform_hint: Option<String>,

    /// How long one prompt wait may take.
    read_timeout: Duration,

    /// Live transport (None when disconnected).
    transport: Option<SshTransport>,

    /// Resolved platform, set during open.
    platform: Option<PlatformDefinition>,

    /// Combined prompt pattern for the resolved platform.
    prompt_pattern: Option<Regex>,

    /// Name of the privilege level the session currently sits at.
    privilege: Option<String>,

    /// Accumulates output between prompt matches.
    buffer: CaptureBuffer,

    /// Session transcript sink.
    transcript: Option<Transcript>,
}

impl NetworkDriver {
    pub(crate) fn new(
        config: SshConfig,
        secret: SecretString,
        platform_hint: Option<String>,
        read_timeout: Duration,
        transcript: Option<Transcript>,
    ) -> Self {
        Self {
            config,
            secret,
            platform_hint,
            read_timeout,
            transport: None,
            platform: None,
            prompt_pattern: None,
            privilege: None,
            buffer: CaptureBuffer::default(),
            transcript,
        }
    }

    /// Name of the privilege level the session currently sits at.
    pub fn current_privilege(&self) -> Option<&str> {
        self.privilege.as_deref()
    }

    /// Send one line to the device.
    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.transport
            .as_mut()
            .ok_or(DriverError::NotConnected)?
            .send_line(line)
            .await
    }

    /// Read until `pattern` matches the tail of accumulated output, then
    /// drain and return everything captured.
    ///
    /// Each cleaned chunk is appended to the transcript as it arrives, so
    /// a session that later times out still leaves its partial output on
    /// disk.
    async fn read_until(&mut self, pattern: &Regex) -> Result<Vec<u8>> {
        let timeout = self.read_timeout;
        let Self {
            transport,
            buffer,
            transcript,
            ..
        } = self;
        let transport = transport.as_mut().ok_or(DriverError::NotConnected)?;

        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            // Leftover bytes from the previous read may already carry the
            // prompt.
            if buffer.search_tail(pattern).is_some() {
                return Ok(buffer.take());
            }

            let chunk = tokio::time::timeout_at(deadline, transport.read_chunk())
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))??;

            let before = buffer.len();
            buffer.extend(&chunk);
            if let Some(transcript) = transcript.as_mut() {
                transcript.append(&buffer.as_slice()[before..]);
            }
        }
    }

    /// Install a resolved platform and its combined prompt pattern.
    fn apply_platform(&mut self, platform: PlatformDefinition) {
        self.prompt_pattern = Some(platform.combined_prompt_pattern());
        self.platform = Some(platform);
    }

    /// Identify the platform by probing the live device.
    async fn detect_platform(&mut self) -> Result<()> {
        let detect = Regex::new(DETECT_PROMPT).map_err(ChannelError::InvalidPattern)?;

        // Drain the login banner through the first prompt.
        let _ = self.read_until(&detect).await?;

        // Fingerprints share probe commands, so run each command once.
        let mut probe_cache: HashMap<&'static str, String> = HashMap::new();

        for fp in platform::fingerprints() {
            let output = match probe_cache.get(fp.command) {
                Some(cached) => cached.clone(),
                None => {
                    self.write_line(fp.command).await?;
                    let data = self.read_until(&detect).await?;
                    let text = String::from_utf8_lossy(&data).to_string();
                    probe_cache.insert(fp.command, text.clone());
                    text
                }
            };

            if fp.matches(&output) {
                debug!("{}: detected platform {}", self.config.host, fp.platform);
                let platform = platform::lookup(fp.platform)?;
                self.apply_platform(platform);
                return Ok(());
            }
        }

        Err(DriverError::DetectionFailed {
            host: self.config.host.clone(),
        }
        .into())
    }

    /// Consume the login banner through the first prompt and sync
    /// privilege state from it. Only valid right after connect, before
    /// anything has been written.
    async fn sync_from_banner(&mut self) -> Result<()> {
        let pattern = self
            .prompt_pattern
            .clone()
            .ok_or(DriverError::NotConnected)?;

        let data = self.read_until(&pattern).await?;
        let prompt = extract_prompt(&pattern, &data);
        self.update_privilege(&prompt);
        Ok(())
    }

    /// Nudge a quiet channel with an empty line and sync privilege state
    /// from the prompt that comes back.
    async fn refresh_prompt(&mut self) -> Result<()> {
        let pattern = self
            .prompt_pattern
            .clone()
            .ok_or(DriverError::NotConnected)?;

        self.write_line("").await?;
        let data = self.read_until(&pattern).await?;
        let prompt = extract_prompt(&pattern, &data);
        self.update_privilege(&prompt);
        Ok(())
    }

    fn update_privilege(&mut self, prompt: &str) {
        if let Some(platform) = &self.platform {
            if let Some(level) = platform.match_privilege(prompt) {
                self.privilege = Some(level.name.clone());
            }
        }
    }

    /// Run one escalation step: send the level's escalate command, answer
    /// the secret prompt if one appears, and land on a known prompt.
    async fn escalate_step(&mut self, level: &PrivilegeLevel) -> Result<()> {
        let command = level
            .escalate_command
            .clone()
            .ok_or_else(|| DriverError::EscalationFailed {
                target: level.name.clone(),
            })?;

        let prompt_pattern = self
            .prompt_pattern
            .clone()
            .ok_or(DriverError::NotConnected)?;

        self.write_line(&command).await?;

        if let Some(auth_pattern) = level.escalate_prompt.clone() {
            // The device either asks for the secret or drops straight to
            // the next prompt.
            let either = Regex::new(&format!(
                "(?:{})|(?:{})",
                auth_pattern.as_str(),
                prompt_pattern.as_str()
            ))
            .map_err(ChannelError::InvalidPattern)?;

            let data = self.read_until(&either).await?;

            let auth_end = auth_pattern.find_iter(&data).last().map(|m| m.end());
            let prompt_end = prompt_pattern.find_iter(&data).last().map(|m| m.end());

            if auth_end.is_some() && auth_end >= prompt_end {
                let secret = {
                    use secrecy::ExposeSecret;
                    self.secret.expose_secret().to_string()
                };
                self.write_line(&secret).await?;
                let data = self.read_until(&prompt_pattern).await?;
                let prompt = extract_prompt(&prompt_pattern, &data);
                self.update_privilege(&prompt);
            } else {
                let prompt = extract_prompt(&prompt_pattern, &data);
                self.update_privilege(&prompt);
            }
        } else {
            let data = self.read_until(&prompt_pattern).await?;
            let prompt = extract_prompt(&prompt_pattern, &data);
            self.update_privilege(&prompt);
        }

        Ok(())
    }
}

impl Driver for NetworkDriver {
    async fn open(&mut self) -> Result<()> {
        if self.transport.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        debug!("{}: connecting", self.config.host);
        let transport = SshTransport::connect(self.config.clone()).await?;
        self.transport = Some(transport);

        match self.platform_hint.take() {
            Some(name) => {
                let platform = platform::lookup(&name)?;
                self.apply_platform(platform);
                // Nothing has been written yet, so the banner runs
                // straight through the first prompt.
                self.sync_from_banner().await?;
            }
            None => {
                self.detect_platform().await?;
                // Trailing probe bytes drain here and the privilege
                // state syncs to the live prompt.
                self.refresh_prompt().await?;
            }
        }

        let on_open = self
            .platform
            .as_ref()
            .map(|p| p.on_open_commands.clone())
            .unwrap_or_default();
        for command in on_open {
            self.send_command(&command).await?;
        }

        info!(
            "{}: session open, platform {}",
            self.config.host,
            self.platform_name().unwrap_or("unknown")
        );
        Ok(())
    }

    async fn enable(&mut self) -> Result<()> {
        let platform = self.platform.clone().ok_or(DriverError::NotConnected)?;
        let target = platform.privileged_level.clone();

        if self.current_privilege() == Some(target.as_str()) {
            return Ok(());
        }

        let current = self
            .privilege
            .clone()
            .ok_or_else(|| DriverError::EscalationFailed {
                target: target.clone(),
            })?;

        let steps = escalation_steps(&platform, &current, &target).ok_or_else(|| {
            DriverError::EscalationFailed {
                target: target.clone(),
            }
        })?;

        for level in steps {
            self.escalate_step(&level).await?;
        }

        if self.current_privilege() != Some(target.as_str()) {
            return Err(DriverError::EscalationFailed { target }.into());
        }

        debug!("{}: escalated to {}", self.config.host, target);
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<Response> {
        let pattern = self
            .prompt_pattern
            .clone()
            .ok_or(DriverError::NotConnected)?;
        let failure_patterns = self
            .platform
            .as_ref()
            .map(|p| p.failed_when_contains.clone())
            .ok_or(DriverError::NotConnected)?;

        let start = Instant::now();
        self.write_line(command).await?;
        let data = self.read_until(&pattern).await?;
        let elapsed = start.elapsed();

        // Keep consecutive exchanges separated in the transcript.
        if let Some(transcript) = &mut self.transcript {
            transcript.append(b"\n");
        }

        let output = String::from_utf8_lossy(&data).to_string();
        let prompt = extract_prompt(&pattern, &data);
        self.update_privilege(&prompt);

        for fail in &failure_patterns {
            if output.contains(fail.as_str()) {
                debug!("{}: command rejected: {}", self.config.host, command);
                return Ok(Response::failed(
                    command,
                    output.clone(),
                    prompt,
                    elapsed,
                    fail.clone(),
                ));
            }
        }

        Ok(Response::new(command, output, prompt, elapsed))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(transport) = self.transport.take() {
            debug!("{}: closing session", self.config.host);
            transport.close().await?;
        }
        Ok(())
    }

    fn platform_name(&self) -> Option<&str> {
        self.platform.as_ref().map(|p| p.name.as_str())
    }
}

/// Pull the prompt off the end of a captured exchange.
fn extract_prompt(pattern: &Regex, data: &[u8]) -> String {
    pattern
        .find_iter(data)
        .last()
        .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
        .unwrap_or_default()
}

/// Plan the escalation from `current` up to `target`, base-first.
///
/// Returns None when `current` is not below `target` in the chain; the
/// driver never de-escalates.
fn escalation_steps(
    platform: &PlatformDefinition,
    current: &str,
    target: &str,
) -> Option<Vec<PrivilegeLevel>> {
    let mut steps = Vec::new();
    let mut cursor = target.to_string();

    while cursor != current {
        let level = platform.get_privilege(&cursor)?;
        steps.push(level.clone());
        cursor = level.previous_priv.clone()?;
    }

    steps.reverse();
    Some(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::vendors;

    #[test]
    fn test_extract_prompt_takes_last_match() {
        let pattern = Regex::new(r"(?m)^router01[#>]\s?$").unwrap();
        let data = b"router01>\nshow version\nlots of output\nrouter01# ";

        assert_eq!(extract_prompt(&pattern, data), "router01#");
    }

    #[test]
    fn test_extract_prompt_no_match() {
        let pattern = Regex::new(r"nomatch").unwrap();
        assert_eq!(extract_prompt(&pattern, b"some output"), "");
    }

    #[test]
    fn test_banner_prompt_syncs_privilege() {
        use crate::driver::DriverBuilder;

        let mut driver = DriverBuilder::new("10.0.0.1")
            .username("ops")
            .password("pw".to_string().into())
            .build();
        driver.apply_platform(vendors::cisco_ios::platform());

        // A named platform skips detection, so the login banner is the
        // first thing read and its trailing prompt seeds the privilege
        // state.
        let pattern = driver.prompt_pattern.clone().unwrap();
        let banner = b"Last login: Mon Jan 29 09:14:02 from 10.128.0.5\nrouter01> ";
        let prompt = extract_prompt(&pattern, banner);
        driver.update_privilege(&prompt);

        assert_eq!(driver.current_privilege(), Some("exec"));
    }

    #[test]
    fn test_escalation_steps_single_hop() {
        let platform = vendors::cisco_ios::platform();
        let steps = escalation_steps(&platform, "exec", "privilege_exec").unwrap();

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "privilege_exec");
        assert_eq!(steps[0].escalate_command.as_deref(), Some("enable"));
    }

    #[test]
    fn test_escalation_steps_noop_hop() {
        let platform = vendors::cisco_ios::platform();
        let steps = escalation_steps(&platform, "privilege_exec", "privilege_exec").unwrap();
        assert!(steps.is_empty());
    }

    #[test]
    fn test_escalation_steps_never_descend() {
        let platform = vendors::cisco_ios::platform();

        // configuration is above privilege_exec; walking up from the
        // target can never reach it.
        assert!(escalation_steps(&platform, "configuration", "privilege_exec").is_none());
    }

    #[test]
    fn test_escalation_steps_multi_hop() {
        let platform = vendors::cisco_ios::platform();
        let steps = escalation_steps(&platform, "exec", "configuration").unwrap();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].name, "privilege_exec");
        assert_eq!(steps[1].name, "configuration");
    }
}
