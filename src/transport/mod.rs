//! SSH transport layer.
//!
//! Owns connection establishment, authentication, and the raw byte
//! stream. Everything above this layer deals in prompts and commands,
//! never in channels.

mod config;
mod ssh;

pub use config::SshConfig;
pub use ssh::SshTransport;
