use clap::Subcommand;

use crate::ConfigCommands;

pub(crate) mod auth;
pub(crate) mod capture;
pub(crate) mod particles;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Configure or show the backend connection
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Sign in (password, one-time code or browser)
    Login(auth::LoginArgs),

    /// Sign out and clear the stored session
    Logout(auth::LogoutArgs),

    /// Show the signed-in account
    Whoami(auth::WhoamiArgs),

    /// List your particles, newest first
    List(particles::ListArgs),

    /// Show one particle
    Show(particles::ShowArgs),

    /// Create a particle
    Create(capture::CreateArgs),

    /// Capture files, text, piped stdin or the clipboard in one step
    Spawn(capture::SpawnArgs),

    /// Toggle whether a particle is public
    Publish(particles::IdArgs),

    /// Toggle whether a particle is archived
    Archive(particles::IdArgs),

    /// Apply, remove or create-and-apply a tag
    Tag(particles::TagArgs),

    /// Delete a particle permanently
    Destroy(particles::DestroyArgs),

    /// Copy a particle's content (or image URL) to the clipboard
    Copy(particles::IdArgs),

    /// Open a link particle or an image's public URL in the browser
    Open(particles::IdArgs),

    /// Interactive terminal UI (the default)
    Tui,
}
