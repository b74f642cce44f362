//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::LogLevel;

/// Push Verisure alarm state into Domoticz virtual sensors.
#[derive(Debug, Parser)]
#[command(name = "vsure", version, about)]
pub struct Cli {
    /// Configuration file; a template is written here if it does not exist.
    #[arg(short, long, default_value = "vsure.toml", global = true)]
    pub config: PathBuf,

    /// Log level, overriding the configuration file.
    #[arg(short, long, value_enum, global = true)]
    pub log: Option<LogLevel>,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

/// When synchronization passes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Mode {
    /// Run a single pass and exit.
    Sync,
    /// Run a pass every `--interval` seconds.
    Poll {
        #[arg(short, long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },
    /// Run a pass whenever new mail lands in the configured folder.
    Watch,
}

impl Cli {
    /// The selected mode, `sync` when none is given.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or(Mode::Sync)
    }
}
