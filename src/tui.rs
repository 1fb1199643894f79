use anyhow::Result;

/// Starts the interactive list view. Requires a TTY.
pub fn run() -> Result<()> {
    crate::tui_shell::run()
}
