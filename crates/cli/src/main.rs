// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wk - worldkeep CLI

mod commands;
mod error;
mod lock;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{action, logs, rules, state, system};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::WkError;
use crate::lock::DataDirLock;
use crate::output::OutputFormat;
use wk_engine::{default_data_dir, open_configured, EngineConfig};

#[derive(Parser)]
#[command(
    name = "wk",
    version,
    about = "worldkeep - layered storage for a persistent game world"
)]
struct Cli {
    /// Data directory holding the three stores
    #[arg(long, global = true, env = "WK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Persist default rules and the genesis world state
    Init,
    /// Store, mirror, backup and log health
    Status,
    /// World rules (blueprint)
    Rules(rules::RulesArgs),
    /// Player action queue
    Action(action::ActionArgs),
    /// Versioned world state
    State(state::StateArgs),
    /// Operation log
    Logs(logs::LogsArgs),
    /// Write a snapshot of all three stores
    Snapshot,
    /// Check rules, actions and state against each other
    Check {
        /// Exit non-zero when the world is inconsistent
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<WkError>() {
                Some(wk) => eprintln!("{wk}"),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let _lock = DataDirLock::acquire(&data_dir)?;

    let config = EngineConfig::load(&data_dir)?;
    let _log_guard = logging::init(&config.logs_dir())?;
    tracing::debug!(data_dir = %config.data_dir.display(), "starting");

    let coordinator = open_configured(config).await?;
    let format = cli.format;

    let result = match cli.command {
        Commands::Init => system::init(&coordinator, format).await,
        Commands::Status => system::status(&coordinator, format).await,
        Commands::Rules(args) => rules::handle(&coordinator, args.command, format).await,
        Commands::Action(args) => action::handle(&coordinator, args.command, format).await,
        Commands::State(args) => state::handle(&coordinator, args.command, format).await,
        Commands::Logs(args) => logs::handle(&coordinator, args.command, format).await,
        Commands::Snapshot => system::snapshot(&coordinator, format).await,
        Commands::Check { strict } => system::check(&coordinator, strict, format).await,
    };

    coordinator.flush_backups().await;
    result
}
