use std::io::{BufRead, IsTerminal, Write};

use anyhow::{Context, Result};

use particle::context::ClientContext;
use particle::notify::{Reported, StderrNotifier};
use particle::store::LocalStore;

use crate::{Commands, ConfigCommands};

mod auth;
mod capture;
mod config;
mod context;
mod dispatch;
mod particles;

pub(super) fn handle_command(command: Commands) -> Result<()> {
    dispatch::handle_command(command)
}

/// A flow that already reported its failure as a toast.
fn reported(ok: bool) -> Result<()> {
    if ok { Ok(()) } else { Err(Reported.into()) }
}

fn print_json(value: &impl serde::Serialize, what: &str) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).with_context(|| format!("serialize {} json", what))?
    );
    Ok(())
}

/// Reads one line from an interactive stdin; None without a terminal.
fn prompt_line(prompt: &str) -> Result<Option<String>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }
    eprint!("{}", prompt);
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read from stdin")?;
    let line = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(Some(line))
}
