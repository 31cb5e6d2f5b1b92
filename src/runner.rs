//! Batch sweep orchestration.
//!
//! Devices run strictly one at a time, in inventory order. A failed
//! session never stops the sweep: its error is classified, diagnosed
//! with an ICMP probe, written to the session log, and stamped onto the
//! transcript's filename, then the next device starts.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;

use crate::artifacts::{SessionArtifacts, SessionLog, Transcript, jst_timestamp};
use crate::commands::read_commands;
use crate::driver::{Driver, DriverBuilder, Response};
use crate::error::{ArtifactError, Error, FailureKind, Result};
use crate::inventory::{DeviceRecord, read_inventory};
use crate::probe::{self, PingOutcome};

/// Per-session tunables shared by every device in a sweep.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Platform for every device; None autodetects per device.
    pub platform: Option<String>,

    /// How long one prompt wait may take.
    pub read_timeout: Duration,

    /// How long connection establishment may take.
    pub connect_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            platform: None,
            read_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Everything one sweep needs: input paths, artifact root, tunables.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub inventory: PathBuf,
    pub commands: PathBuf,
    pub log_root: PathBuf,
    pub options: RunOptions,
}

/// One run's artifact directory, named by its start time.
#[derive(Debug)]
pub struct RunContext {
    pub timestamp: String,
    pub log_dir: PathBuf,
}

impl RunContext {
    /// Create `log-<stamp>` under the given root.
    ///
    /// Reruns within the same second share the directory; creation is
    /// idempotent.
    pub fn create(root: &Path) -> Result<Self> {
        let timestamp = jst_timestamp();
        let log_dir = root.join(format!("log-{timestamp}"));

        fs::create_dir_all(&log_dir).map_err(|source| ArtifactError::Create {
            path: log_dir.clone(),
            source,
        })?;

        Ok(Self { timestamp, log_dir })
    }
}

/// Why a session failed, carrying the classified kind for tagging.
#[derive(Debug)]
pub struct SessionFailure {
    pub kind: FailureKind,
    pub error: Error,
}

/// Outcome of one device's session.
#[derive(Debug)]
pub struct DeviceReport {
    pub host: String,
    pub outcome: std::result::Result<Vec<Response>, SessionFailure>,
}

/// Run a full sweep from settings: read inputs, create the run
/// directory, and visit every device.
///
/// Input readers fail hard before any artifact is created; per-device
/// errors are captured in the reports instead.
pub async fn run(settings: RunSettings) -> Result<Vec<DeviceReport>> {
    let devices = read_inventory(&settings.inventory)?;
    let commands = read_commands(&settings.commands)?;
    let ctx = RunContext::create(&settings.log_root)?;

    info!(
        "sweep started: {} devices, {} commands, artifacts in {}",
        devices.len(),
        commands.len(),
        ctx.log_dir.display()
    );

    let options = settings.options;
    let reports = run_devices(&ctx, devices, &commands, move |record, transcript| {
        let mut builder = DriverBuilder::new(record.host)
            .username(record.username)
            .password(record.password)
            .read_timeout(options.read_timeout)
            .connect_timeout(options.connect_timeout)
            .transcript(transcript);

        if let Some(secret) = record.secret {
            builder = builder.secret(secret);
        }
        if let Some(platform) = &options.platform {
            builder = builder.platform(platform.clone());
        }

        builder.build()
    })
    .await?;

    let failed = reports.iter().filter(|r| r.outcome.is_err()).count();
    info!("sweep finished: {} devices, {} failed", reports.len(), failed);

    Ok(reports)
}

/// Visit every device in order, building each session's driver through
/// `connect`.
///
/// The factory seam keeps the sweep logic testable against scripted
/// sessions; the transcript handed in must be the one the driver writes,
/// so failure tagging renames a file that actually has the output.
pub async fn run_devices<D, F>(
    ctx: &RunContext,
    devices: Vec<DeviceRecord>,
    commands: &[String],
    mut connect: F,
) -> Result<Vec<DeviceReport>>
where
    D: Driver,
    F: FnMut(DeviceRecord, Transcript) -> D,
{
    let mut reports = Vec::with_capacity(devices.len());

    for record in devices {
        let host = record.host.clone();
        let artifacts = SessionArtifacts::for_host(&ctx.log_dir, &host);
        let mut log = SessionLog::create(&artifacts.log_path(), &host)?;
        let transcript = Transcript::create(&artifacts.transcript_path())?;

        let mut driver = connect(record, transcript);
        let outcome = run_session(&mut driver, commands, &host, &mut log).await;

        // A close error after a finished session is only noise.
        if let Err(err) = driver.close().await {
            log.warn("close", &err.to_string());
        }
        drop(driver);

        let outcome = match outcome {
            Ok(responses) => {
                log.info("session", &format!("SuccessfullyDone: {host}"));
                Ok(responses)
            }
            Err(error) => {
                let kind = FailureKind::classify(&error);
                log.error("session", &error.to_string());
                diagnose(&host, &mut log).await;
                log.error("session", &format!("{}: {host}", kind.tag()));
                artifacts.rename_failed(kind.tag())?;
                Err(SessionFailure { kind, error })
            }
        };

        reports.push(DeviceReport { host, outcome });
    }

    Ok(reports)
}

/// One device session: open, escalate once, then run every command.
///
/// A rejected command (platform failure pattern in its output) is a
/// warning and the session continues; only errors abort the remaining
/// commands.
async fn run_session<D: Driver>(
    driver: &mut D,
    commands: &[String],
    host: &str,
    log: &mut SessionLog,
) -> Result<Vec<Response>> {
    log.info("connect", &format!("Connecting: {host}"));
    driver.open().await?;
    log.info(
        "connect",
        &format!(
            "Connected: {host} ({})",
            driver.platform_name().unwrap_or("unknown")
        ),
    );

    driver.enable().await?;

    let mut responses = Vec::with_capacity(commands.len());
    for command in commands {
        log.info("command", &format!("SendCommand: {command}"));
        let response = driver.send_command(command).await?;

        println!("{} {} @{} {}", "=".repeat(30), command, host, "=".repeat(30));
        println!("{response}");
        println!("{}\n", "=".repeat(80));

        if let Some(failure) = &response.failure_message {
            log.warn("command", &format!("CommandFailed: {command} ({failure})"));
        }

        responses.push(response);
    }

    Ok(responses)
}

/// Probe a failed host and log what the network itself says.
async fn diagnose(host: &str, log: &mut SessionLog) {
    let outcome = probe::ping_check(host).await;
    record_probe(log, host, outcome);
}

/// Write a probe outcome to the session log.
///
/// A reply is informational; every failing outcome is an error, the
/// same severity as the session failure it annotates.
fn record_probe(log: &mut SessionLog, host: &str, outcome: PingOutcome) {
    match outcome {
        PingOutcome::Success => {
            log.info("probe", &format!("PingSuccess: {host}"));
        }
        PingOutcome::PermissionDenied => {
            log.error(
                "probe",
                &format!("PermissionError: icmp probe for {host} needs root permission"),
            );
        }
        outcome => {
            log.error("probe", &format!("{}: {host}", outcome.label()));
        }
    }
}
