use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use particle::store::LocalStore;

use crate::Commands;

const LOG_ENV: &str = "PARTICLE_LOG";

#[derive(Parser)]
#[command(name = "particle")]
#[command(about = "Capture links, images and notes into your particle store", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Tui) => {
            init_tui_logging();
            particle::tui::run()?;
        }
        Some(command) => {
            init_cli_logging();
            crate::cli_exec::handle_command(command)?
        }
    }

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_cli_logging() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// The terminal belongs to the TUI, so logs go to `<home>/particle.log`.
fn init_tui_logging() {
    let Ok(store) = LocalStore::open_default() else {
        return;
    };
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(store.log_path())
    {
        Ok(f) => f,
        Err(_) => return,
    };
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
