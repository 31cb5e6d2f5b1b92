//! Command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::runner::{RunOptions, RunSettings};

/// Batch SSH command sweeps across network device fleets.
#[derive(Debug, Parser)]
#[command(name = "netsweep", version, about)]
pub struct Cli {
    /// Device inventory CSV (host,username,password[,secret]).
    #[arg(long, default_value = "hostlist.csv")]
    pub inventory: PathBuf,

    /// Command list file, one command per line after the header.
    #[arg(long, default_value = "commandlist.csv")]
    pub commands: PathBuf,

    /// Platform for every device (e.g. cisco_ios); autodetected when omitted.
    #[arg(long)]
    pub platform: Option<String>,

    /// Seconds to wait for each command's prompt.
    #[arg(long, default_value_t = 60)]
    pub read_timeout: u64,

    /// Seconds to wait for each SSH connection.
    #[arg(long, default_value_t = 30)]
    pub connect_timeout: u64,

    /// Directory that receives the per-run log directory.
    #[arg(long, default_value = ".")]
    pub log_root: PathBuf,
}

impl Cli {
    /// Turn parsed arguments into sweep settings.
    pub fn into_settings(self) -> RunSettings {
        RunSettings {
            inventory: self.inventory,
            commands: self.commands,
            log_root: self.log_root,
            options: RunOptions {
                platform: self.platform,
                read_timeout: Duration::from_secs(self.read_timeout),
                connect_timeout: Duration::from_secs(self.connect_timeout),
            },
        }
    }
}
