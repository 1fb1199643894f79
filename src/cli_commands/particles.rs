use clap::Args;

#[derive(Args)]
pub(crate) struct ListArgs {
    /// Only this type (link, image, text)
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) kind: Option<String>,
    /// Include archived particles
    #[arg(long)]
    pub(crate) archived: bool,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Particle id (or a unique prefix)
    pub(crate) id: String,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct IdArgs {
    /// Particle id (or a unique prefix)
    pub(crate) id: String,
}

#[derive(Args)]
pub(crate) struct TagArgs {
    /// Particle id (or a unique prefix)
    pub(crate) id: String,
    /// Tag name; an existing tag is toggled, a new one is created and applied
    pub(crate) name: String,
}

#[derive(Args)]
pub(crate) struct DestroyArgs {
    /// Particle id (or a unique prefix)
    pub(crate) id: String,
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub(crate) yes: bool,
}
