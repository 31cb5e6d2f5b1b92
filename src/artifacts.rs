//! Run artifacts: session transcripts, per-device logs, failure tagging.
//!
//! Every device session leaves two files in the run's log directory:
//!
//! * `<host>-<stamp>-JST.log` is the transcript, the raw exchange as the
//!   device showed it.
//! * `<host>-<stamp>-JST-logging.log` is the session log, one line per
//!   lifecycle event.
//!
//! When a session fails, the transcript is renamed to carry the failure
//! tag (`<host>-<stamp>-JST-SSHAuthenticationError.log`), so a directory
//! listing alone tells which devices need attention.
//!
//! Timestamps are JST throughout. The devices and the operators reading
//! these reports run on Tokyo time.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use log::Level;

use crate::error::ArtifactError;

fn jst_now() -> DateTime<FixedOffset> {
    let jst = FixedOffset::east_opt(9 * 3600).unwrap();
    Utc::now().with_timezone(&jst)
}

/// JST timestamp fragment used in artifact names (`20240131-093045`).
pub fn jst_timestamp() -> String {
    jst_now().format("%Y%m%d-%H%M%S").to_string()
}

/// Paths for one session's artifacts.
///
/// The stamp is fixed at construction so the transcript and the session
/// log always pair up by name.
#[derive(Debug, Clone)]
pub struct SessionArtifacts {
    log_dir: PathBuf,
    host: String,
    stamp: String,
}

impl SessionArtifacts {
    /// Allocate artifact names for a host in the given log directory.
    pub fn for_host(log_dir: &Path, host: &str) -> Self {
        Self {
            log_dir: log_dir.to_path_buf(),
            host: host.to_string(),
            stamp: jst_timestamp(),
        }
    }

    /// Path of the session transcript.
    pub fn transcript_path(&self) -> PathBuf {
        self.log_dir
            .join(format!("{}-{}-JST.log", self.host, self.stamp))
    }

    /// Path of the session log.
    pub fn log_path(&self) -> PathBuf {
        self.log_dir
            .join(format!("{}-{}-JST-logging.log", self.host, self.stamp))
    }

    /// Rename the transcript to carry a failure tag.
    pub fn rename_failed(&self, tag: &str) -> std::result::Result<PathBuf, ArtifactError> {
        let from = self.transcript_path();
        let to = self
            .log_dir
            .join(format!("{}-{}-JST-{}.log", self.host, self.stamp, tag));

        fs::rename(&from, &to).map_err(|source| ArtifactError::Rename {
            path: from.clone(),
            source,
        })?;

        Ok(to)
    }
}

/// Sink for the raw session exchange.
pub struct Transcript {
    file: File,
}

impl Transcript {
    /// Create the transcript file, truncating any previous content.
    pub fn create(path: &Path) -> std::result::Result<Self, ArtifactError> {
        let file = File::create(path).map_err(|source| ArtifactError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { file })
    }

    /// Append captured bytes. Write errors are ignored; the transcript
    /// never aborts a live session.
    pub fn append(&mut self, data: &[u8]) {
        let _ = self.file.write_all(data);
    }
}

/// Per-session event log.
///
/// Lines follow `<ts> - <LEVEL> - <scope> - <message>` with a JST
/// timestamp. Every line is mirrored to the process-wide logger so a
/// watched run shows the same events live on stderr.
pub struct SessionLog {
    file: File,
    host: String,
}

impl SessionLog {
    /// Create the session log file for a host.
    pub fn create(path: &Path, host: &str) -> std::result::Result<Self, ArtifactError> {
        let file = File::create(path).map_err(|source| ArtifactError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            file,
            host: host.to_string(),
        })
    }

    pub fn info(&mut self, scope: &str, message: &str) {
        self.write(Level::Info, scope, message);
    }

    pub fn warn(&mut self, scope: &str, message: &str) {
        self.write(Level::Warn, scope, message);
    }

    pub fn error(&mut self, scope: &str, message: &str) {
        self.write(Level::Error, scope, message);
    }

    fn write(&mut self, level: Level, scope: &str, message: &str) {
        let ts = jst_now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(self.file, "{ts} - {level} - {scope} - {message}");
        log::log!(level, "{}: {}", self.host, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use regex::Regex;

    #[test]
    fn test_timestamp_format() {
        let stamp = jst_timestamp();
        let re = Regex::new(r"^\d{8}-\d{6}$").unwrap();
        assert!(re.is_match(&stamp), "unexpected stamp: {stamp}");
    }

    #[test]
    fn test_artifact_names() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = SessionArtifacts::for_host(dir.path(), "10.0.0.1");

        let transcript = artifacts.transcript_path();
        let log = artifacts.log_path();

        let re = Regex::new(r"^10\.0\.0\.1-\d{8}-\d{6}-JST\.log$").unwrap();
        assert!(re.is_match(transcript.file_name().unwrap().to_str().unwrap()));

        let re = Regex::new(r"^10\.0\.0\.1-\d{8}-\d{6}-JST-logging\.log$").unwrap();
        assert!(re.is_match(log.file_name().unwrap().to_str().unwrap()));
    }

    #[test]
    fn test_rename_failed_tags_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = SessionArtifacts::for_host(dir.path(), "10.0.0.1");

        let mut transcript = Transcript::create(&artifacts.transcript_path()).unwrap();
        transcript.append(b"partial output\n");
        drop(transcript);

        let tagged = artifacts.rename_failed("SSHTimeoutError").unwrap();

        assert!(!artifacts.transcript_path().exists());
        assert!(tagged.exists());
        let re = Regex::new(r"^10\.0\.0\.1-\d{8}-\d{6}-JST-SSHTimeoutError\.log$").unwrap();
        assert!(re.is_match(tagged.file_name().unwrap().to_str().unwrap()));

        let content = fs::read_to_string(&tagged).unwrap();
        assert_eq!(content, "partial output\n");
    }

    #[test]
    fn test_transcript_appends_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.log");

        let mut transcript = Transcript::create(&path).unwrap();
        transcript.append(b"first chunk ");
        transcript.append(b"second chunk");
        drop(transcript);

        assert_eq!(fs::read_to_string(&path).unwrap(), "first chunk second chunk");
    }

    #[test]
    fn test_session_log_line_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.log");

        let mut log = SessionLog::create(&path, "10.0.0.1").unwrap();
        log.info("connect", "Connected: 10.0.0.1");
        log.error("session", "SSHAuthenticationError: 10.0.0.1");
        drop(log);

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();

        let re = Regex::new(
            r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} - INFO - connect - Connected: 10\.0\.0\.1$",
        )
        .unwrap();
        assert!(re.is_match(lines.next().unwrap()));

        let re = Regex::new(
            r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} - ERROR - session - SSHAuthenticationError: 10\.0\.0\.1$",
        )
        .unwrap();
        assert!(re.is_match(lines.next().unwrap()));
    }
}
