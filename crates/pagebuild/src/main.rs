#![warn(missing_docs)]

//! Entry point for the `pagebuild` binary.

mod cli;
mod commands;
mod error;

use std::{io, process};

use clap::Parser;
use tokio::runtime::Builder;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{cli::Cli, error::Result};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let Cli {
        log,
        store,
        command,
    } = Cli::parse();
    registry()
        .with(log.env_filter())
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .try_init()
        .ok();

    let runtime = Builder::new_current_thread().enable_all().build()?;
    let mut stdout = io::stdout().lock();
    runtime.block_on(commands::dispatch(command, &store, &mut stdout))
}
