use super::auth::{handle_login_command, handle_logout_command, handle_whoami_command};
use super::capture::{handle_create_command, handle_spawn_command};
use super::config::handle_config_command;
use super::context::with_signed_in;
use super::particles::{
    handle_archive_command, handle_copy_command, handle_destroy_command, handle_list_command,
    handle_open_command, handle_publish_command, handle_show_command, handle_tag_command,
};
use super::*;

pub(super) fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Config { command } => handle_config_command(command)?,
        Commands::Login(args) => handle_login_command(args)?,
        Commands::Logout(args) => handle_logout_command(args.yes)?,
        Commands::Whoami(args) => handle_whoami_command(args.json)?,
        Commands::List(args) => {
            with_signed_in(|s| handle_list_command(s, args.kind, args.archived, args.json))?
        }
        Commands::Show(args) => with_signed_in(|s| handle_show_command(s, &args.id, args.json))?,
        Commands::Create(args) => with_signed_in(|s| handle_create_command(s, args))?,
        Commands::Spawn(args) => with_signed_in(|s| handle_spawn_command(s, args.files, args.text))?,
        Commands::Publish(args) => with_signed_in(|s| handle_publish_command(s, &args.id))?,
        Commands::Archive(args) => with_signed_in(|s| handle_archive_command(s, &args.id))?,
        Commands::Tag(args) => with_signed_in(|s| handle_tag_command(s, &args.id, &args.name))?,
        Commands::Destroy(args) => {
            with_signed_in(|s| handle_destroy_command(s, &args.id, args.yes))?
        }
        Commands::Copy(args) => with_signed_in(|s| handle_copy_command(s, &args.id))?,
        Commands::Open(args) => with_signed_in(|s| handle_open_command(s, &args.id))?,
        // Routed to the TUI before dispatch.
        Commands::Tui => anyhow::bail!("`tui` cannot be combined with other commands"),
    }

    Ok(())
}
