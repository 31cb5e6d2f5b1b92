//! # Netsweep
//!
//! Batch SSH command sweeps across network device fleets.
//!
//! Netsweep reads a CSV inventory and a command list, then visits every
//! device in order: connect, identify the platform (named or
//! autodetected against the live device), escalate once, run every
//! command, and leave a transcript plus a session log per device in a
//! timestamped run directory. Failures are classified, diagnosed with an
//! ICMP probe, and stamped onto the transcript filename.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netsweep::driver::{Driver, DriverBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netsweep::Error> {
//!     let mut driver = DriverBuilder::new("192.168.1.1")
//!         .username("admin")
//!         .password("secret".to_string().into())
//!         .platform("cisco_ios")
//!         .build();
//!
//!     driver.open().await?;
//!     driver.enable().await?;
//!
//!     let response = driver.send_command("show version").await?;
//!     println!("{}", response.output);
//!
//!     driver.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! Whole sweeps go through [`runner::run`] with a [`runner::RunSettings`].

pub mod artifacts;
pub mod channel;
pub mod cli;
pub mod commands;
pub mod driver;
pub mod error;
pub mod inventory;
pub mod platform;
pub mod probe;
pub mod runner;
pub mod transport;

// Re-export main types for convenience
pub use driver::{Driver, DriverBuilder, NetworkDriver, Response};
pub use error::{Error, FailureKind, Result};
pub use inventory::DeviceRecord;
pub use platform::{PlatformDefinition, PrivilegeLevel};
pub use runner::{DeviceReport, RunOptions, RunSettings, SessionFailure};
pub use transport::SshConfig;
