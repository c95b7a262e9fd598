//! Study desk: a terminal host for the study-core scheduler.
//!
//! Owns configuration, logging, SQLite persistence and the input loop.

pub mod commands;
pub mod config;
pub mod db;
pub mod shell;
pub mod state;

use anyhow::Context;
use chrono::Utc;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::SqliteRepository;
use crate::shell::{Flow, Shell};
use crate::state::AppState;

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Ensure data directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory {}", parent.display()))?;
    }

    tracing::info!("Opening database at {}", config.db_path.display());
    let repository = SqliteRepository::open(&config.db_path)
        .with_context(|| format!("opening database {}", config.db_path.display()))?;
    let mut state = AppState::load(repository, Utc::now())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_loop(&mut state, stdin.lock(), stdout.lock())
}

/// Read commands from `input` until it ends or the learner quits.
pub fn run_loop<R, W>(state: &mut AppState, input: R, mut output: W) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut shell = Shell::new();
    writeln!(output, "study desk. type 'help' for commands.")?;
    write!(output, "> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        match shell::parse(&line) {
            Ok(None) => {}
            Ok(Some(command)) => match shell.execute(state, command, Utc::now()) {
                Ok(Flow::Continue(text)) => writeln!(output, "{text}")?,
                Ok(Flow::Quit) => break,
                Err(e) => writeln!(output, "error: {e}")?,
            },
            Err(e) => writeln!(output, "error: {e}")?,
        }
        write!(output, "> ")?;
        output.flush()?;
    }

    tracing::info!("session ended");
    Ok(())
}
