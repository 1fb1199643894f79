//! Host environment integration: confirmation, clipboard, the current
//! selection and the browser.

use std::io::{BufRead, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub primary: String,
}

impl ConfirmPrompt {
    pub fn destroy_particle(title: &str) -> Self {
        Self {
            title: "Destroy Particle".to_string(),
            message: format!("\"{}\" will be deleted permanently. Continue?", title),
            primary: "Destroy".to_string(),
        }
    }

    pub fn logout() -> Self {
        Self {
            title: "Logout".to_string(),
            message: "You are about to sign out. Continue?".to_string(),
            primary: "Logout".to_string(),
        }
    }
}

pub trait Confirm {
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> bool;
}

/// Asks on stderr and reads a y/N answer from stdin.
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> bool {
        if self.assume_yes {
            return true;
        }
        if !std::io::stdin().is_terminal() {
            tracing::warn!(title = %prompt.title, "no terminal to confirm on; declining");
            return false;
        }
        eprint!("{}: {} [{}? y/N] ", prompt.title, prompt.message, prompt.primary);
        let _ = std::io::stderr().flush();
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Confirmation already collected elsewhere (a TUI modal).
pub struct Preconfirmed;

impl Confirm for Preconfirmed {
    fn confirm(&mut self, _prompt: &ConfirmPrompt) -> bool {
        true
    }
}

pub trait Clipboard {
    fn copy_text(&mut self, text: &str) -> Result<()>;
    fn read_text(&mut self) -> Result<String>;
}

pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| anyhow!("open clipboard: {}", e))?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| anyhow!("copy to clipboard: {}", e))
    }

    fn read_text(&mut self) -> Result<String> {
        self.inner
            .get_text()
            .map_err(|e| anyhow!("read clipboard: {}", e))
    }
}

/// What the user currently has selected in the host.
pub trait HostSelection {
    fn selected_files(&mut self) -> Result<Vec<PathBuf>>;
    fn selected_text(&mut self) -> Result<String>;
}

/// Command-line selection: explicit files, then explicit text, then piped
/// stdin, then the clipboard.
pub struct CliSelection {
    pub files: Vec<PathBuf>,
    pub text: Option<String>,
}

impl HostSelection for CliSelection {
    fn selected_files(&mut self) -> Result<Vec<PathBuf>> {
        Ok(self.files.clone())
    }

    fn selected_text(&mut self) -> Result<String> {
        if let Some(t) = self.text.take() {
            return Ok(t);
        }
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            let mut buf = String::new();
            stdin
                .lock()
                .read_to_string(&mut buf)
                .context("read selection from stdin")?;
            if !buf.trim().is_empty() {
                return Ok(buf);
            }
        }
        SystemClipboard::new()?.read_text()
    }
}

pub fn open_in_browser(url: &str) -> Result<()> {
    open::that(url).with_context(|| format!("open {}", url))
}
