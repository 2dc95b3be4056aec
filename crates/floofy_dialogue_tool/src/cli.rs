// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "floofy-dialogue")]
#[command(about = "Inspect, validate and upgrade dialogue files")]
#[command(version)]
/// Command-line arguments
pub struct Cli {
    /// Log at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize every dialogue in a file
    Info {
        /// Dialogue file
        file: PathBuf,
    },
    /// Load a file and report whether it is well formed
    Check {
        /// Dialogue file
        file: PathBuf,
    },
    /// Rewrite a file in the current format version
    Upgrade {
        /// Dialogue file
        file: PathBuf,
        /// Destination (defaults to rewriting the input)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Indent the written JSON
        #[arg(long)]
        pretty: bool,
    },
    /// List the records of a choice file
    Choices {
        /// Choice file
        file: PathBuf,
    },
}
