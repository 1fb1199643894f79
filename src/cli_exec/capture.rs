use std::path::PathBuf;

use particle::create::{self, CaptureCtx, CreateForm, FormContent, Submitted};
use particle::host::CliSelection;

use crate::cli_commands::capture::CreateArgs;

use super::context::Signed;
use super::particles::parse_kind;
use super::*;

pub(super) fn handle_create_command(s: &Signed, args: CreateArgs) -> Result<()> {
    let kind = parse_kind(&args.kind)?;
    let content = if args.file.is_empty() {
        FormContent::Text(args.content.unwrap_or_default())
    } else {
        FormContent::Files(args.file)
    };
    let form = CreateForm {
        kind: Some(kind),
        content,
        title: args.title.unwrap_or_default(),
        description: args.description.unwrap_or_default(),
        is_public: args.public,
    };

    let cap = CaptureCtx {
        backend: s.ctx.client.as_ref(),
        user_id: s.user_id(),
        completer: s.ctx.completer(),
    };
    match create::submit(&cap, &form, &mut StderrNotifier) {
        Submitted::Invalid(errors) => {
            for line in errors.lines() {
                eprintln!("error: {}", line);
            }
            Err(Reported.into())
        }
        Submitted::Failed => Err(Reported.into()),
        Submitted::Created(p) => {
            if args.json {
                print_json(&p, "particle")
            } else {
                println!("{}", p.id);
                Ok(())
            }
        }
    }
}

/// Exits non-zero only when nothing was captured.
pub(super) fn handle_spawn_command(
    s: &Signed,
    files: Vec<PathBuf>,
    text: Option<String>,
) -> Result<()> {
    let cap = CaptureCtx {
        backend: s.ctx.client.as_ref(),
        user_id: s.user_id(),
        completer: s.ctx.completer(),
    };
    let mut selection = CliSelection { files, text };
    let report = create::spawn(&cap, &mut selection, &mut StderrNotifier);
    reported(report.created > 0)
}
