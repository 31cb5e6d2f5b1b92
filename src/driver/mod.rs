//! Device session drivers.
//!
//! A driver owns one device session end to end: connect and detect,
//! escalate, run commands, close. [`NetworkDriver`] is the real
//! implementation over SSH; the [`Driver`] trait exists so batch
//! orchestration can be exercised against scripted sessions.

mod builder;
mod network;
mod response;

use std::future::Future;

use crate::error::Result;

pub use builder::DriverBuilder;
pub use network::NetworkDriver;
pub use response::Response;

/// One interactive device session.
pub trait Driver: Send {
    /// Connect, authenticate, resolve the platform, and prepare the
    /// terminal for scraping.
    fn open(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Escalate to the platform's privileged level. No-op when the
    /// session is already there.
    fn enable(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Send one command and capture output through the next prompt.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<Response>> + Send;

    /// Close the session. Safe to call more than once, and safe to call
    /// when `open` never succeeded.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Resolved platform name, once `open` has determined it.
    fn platform_name(&self) -> Option<&str>;
}
