// SPDX-License-Identifier: MIT OR Apache-2.0
//! `floofy-dialogue` - command-line companion to the dialogue editor
//!
//! Inspects, validates and upgrades dialogue and choice files without
//! starting an editor host.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(format!("floofy_dialogue={level}").parse()?);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Info { file } => commands::info(&file, &mut stdout),
        Command::Check { file } => commands::check(&file, &mut stdout),
        Command::Upgrade { file, output, pretty } => commands::upgrade(&file, output.as_deref(), pretty, &mut stdout),
        Command::Choices { file } => commands::choices(&file, &mut stdout),
    }
}
