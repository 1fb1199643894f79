use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub(crate) struct CreateArgs {
    /// Particle type (link, image, text)
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) kind: String,
    /// URL or note text (link and text particles)
    #[arg(long, conflicts_with = "file")]
    pub(crate) content: Option<String>,
    /// Image file (image particles)
    #[arg(long)]
    pub(crate) file: Vec<PathBuf>,
    #[arg(long)]
    pub(crate) title: Option<String>,
    #[arg(long)]
    pub(crate) description: Option<String>,
    /// Make the particle public
    #[arg(long)]
    pub(crate) public: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct SpawnArgs {
    /// Files to capture as images
    pub(crate) files: Vec<PathBuf>,
    /// Text to capture instead of stdin or the clipboard
    #[arg(long, conflicts_with = "files")]
    pub(crate) text: Option<String>,
}
