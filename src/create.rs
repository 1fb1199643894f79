//! Creating particles: the interactive form and headless capture.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::backend::{Backend, insert_as};
use crate::completion::{Completer, auto_fill};
use crate::host::HostSelection;
use crate::model::{NewParticle, Particle, ParticleKind};
use crate::notify::{Notifier, Toast, failure_title};
use crate::utils::{is_url, upload_file};

/// Everything a create needs besides its input.
#[derive(Clone, Copy)]
pub struct CaptureCtx<'a> {
    pub backend: &'a dyn Backend,
    pub user_id: &'a str,
    pub completer: Option<&'a dyn Completer>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormContent {
    Text(String),
    Files(Vec<PathBuf>),
}

impl Default for FormContent {
    fn default() -> Self {
        FormContent::Text(String::new())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub kind: Option<ParticleKind>,
    pub content: FormContent,
    pub title: String,
    pub description: String,
    pub is_public: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub kind: Option<String>,
    pub content: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.content.is_none()
    }

    /// One line per failing field, for the CLI.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(e) = &self.kind {
            out.push(format!("type: {}", e));
        }
        if let Some(e) = &self.content {
            out.push(format!("content: {}", e));
        }
        out
    }
}

impl CreateForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        match self.kind {
            None => errors.kind = Some("The field should not be empty!".to_string()),
            Some(ParticleKind::Image) => match &self.content {
                FormContent::Files(files) if files.len() == 1 => {}
                FormContent::Files(files) if files.len() > 1 => {
                    errors.content = Some("Select exactly one image".to_string())
                }
                _ => errors.content = Some("Select an image file".to_string()),
            },
            Some(kind) => match &self.content {
                FormContent::Text(t) if t.trim().is_empty() => {
                    errors.content = Some("The field should not be empty!".to_string())
                }
                FormContent::Text(t) if kind == ParticleKind::Link && !is_url(t) => {
                    errors.content = Some("Enter an http(s) URL".to_string())
                }
                FormContent::Text(_) => {}
                FormContent::Files(_) => {
                    errors.content = Some(format!("{} particles take text, not files", kind))
                }
            },
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug)]
pub enum Submitted {
    /// Rejected before any remote call.
    Invalid(FieldErrors),
    /// Reported through the notifier.
    Failed,
    Created(Particle),
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Fills whichever of title/description is empty when a completer is set.
/// A completion failure keeps the entered values.
fn fill_text_fields(
    completer: Option<&dyn Completer>,
    content: &str,
    title: Option<String>,
    description: Option<String>,
) -> (Option<String>, Option<String>) {
    let Some(completer) = completer else {
        return (title, description);
    };
    if title.is_some() && description.is_some() {
        return (title, description);
    }
    match auto_fill(completer, content) {
        Ok(filled) => (
            title.or_else(|| non_blank(&filled.title)),
            description.or_else(|| non_blank(&filled.description)),
        ),
        Err(err) => {
            tracing::warn!(error = %format!("{:#}", err), "auto-fill skipped");
            (title, description)
        }
    }
}

fn insert_particle(ctx: &CaptureCtx<'_>, row: NewParticle) -> Result<Particle> {
    let created: Particle = insert_as(ctx.backend, "particle", &row)?;
    tracing::info!(id = %created.id, kind = row.type_id, "particle created");
    Ok(created)
}

fn build_row(ctx: &CaptureCtx<'_>, form: &CreateForm, kind: ParticleKind) -> Result<NewParticle> {
    let title = non_blank(&form.title);
    let description = non_blank(&form.description);
    match (&form.content, kind) {
        (FormContent::Files(files), ParticleKind::Image) => {
            let path = &files[0];
            let uploaded = upload_file(ctx.backend, ctx.user_id, path)
                .ok_or_else(|| anyhow::anyhow!("Could not upload {}", path.display()))?;
            Ok(NewParticle {
                title: title.or(Some(uploaded.title)),
                content: uploaded.key,
                description,
                type_id: kind.id(),
                is_public: form.is_public,
                user_id: ctx.user_id.to_string(),
            })
        }
        (FormContent::Text(text), _) => {
            let content = text.trim().to_string();
            let (title, description) = fill_text_fields(ctx.completer, &content, title, description);
            Ok(NewParticle {
                title,
                content,
                description,
                type_id: kind.id(),
                is_public: form.is_public,
                user_id: ctx.user_id.to_string(),
            })
        }
        (FormContent::Files(_), _) => anyhow::bail!("{} particles take text, not files", kind),
    }
}

/// Validates, then uploads (images) or auto-fills (text), then inserts.
pub fn submit(ctx: &CaptureCtx<'_>, form: &CreateForm, notifier: &mut dyn Notifier) -> Submitted {
    if let Err(errors) = form.validate() {
        return Submitted::Invalid(errors);
    }
    let Some(kind) = form.kind else {
        return Submitted::Invalid(FieldErrors::default());
    };

    notifier.show(Toast::animated("Creating particle..."));
    let res = build_row(ctx, form, kind).and_then(|row| insert_particle(ctx, row));
    match res {
        Ok(p) => {
            notifier.show(Toast::success("New particle created"));
            Submitted::Created(p)
        }
        Err(err) => {
            notifier.show(Toast::failure(failure_title(&err, "Failed to create a particle")));
            Submitted::Failed
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnReport {
    pub attempted: usize,
    pub created: usize,
}

impl SpawnReport {
    pub fn all_ok(&self) -> bool {
        self.attempted > 0 && self.created == self.attempted
    }
}

fn spawn_one_file(ctx: &CaptureCtx<'_>, path: &Path) -> bool {
    let Some(uploaded) = upload_file(ctx.backend, ctx.user_id, path) else {
        return false;
    };
    let row = NewParticle {
        title: Some(uploaded.title),
        content: uploaded.key,
        description: None,
        type_id: ParticleKind::Image.id(),
        is_public: false,
        user_id: ctx.user_id.to_string(),
    };
    match insert_particle(ctx, row) {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %format!("{:#}", err), "insert after upload failed");
            false
        }
    }
}

/// Uploads and inserts every file concurrently; failures are independent.
pub fn spawn_files(ctx: &CaptureCtx<'_>, files: &[PathBuf]) -> SpawnReport {
    let created = std::thread::scope(|s| {
        let handles: Vec<_> = files
            .iter()
            .map(|path| s.spawn(move || spawn_one_file(ctx, path)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|ok| *ok)
            .count()
    });
    SpawnReport {
        attempted: files.len(),
        created,
    }
}

fn spawn_text(ctx: &CaptureCtx<'_>, text: &str) -> Result<Particle> {
    let content = text.trim();
    if content.is_empty() {
        anyhow::bail!("Nothing selected to capture");
    }
    let kind = if is_url(content) {
        ParticleKind::Link
    } else {
        ParticleKind::Text
    };
    let (title, description) = fill_text_fields(ctx.completer, content, None, None);
    insert_particle(
        ctx,
        NewParticle {
            title,
            content: content.to_string(),
            description,
            type_id: kind.id(),
            is_public: false,
            user_id: ctx.user_id.to_string(),
        },
    )
}

/// Captures the current selection: selected files when there are any,
/// otherwise the selected text.
pub fn spawn(
    ctx: &CaptureCtx<'_>,
    selection: &mut dyn HostSelection,
    notifier: &mut dyn Notifier,
) -> SpawnReport {
    let files = selection.selected_files().unwrap_or_else(|err| {
        tracing::debug!(error = %format!("{:#}", err), "no file selection");
        Vec::new()
    });

    if !files.is_empty() {
        notifier.show(Toast::animated("Spawning particles..."));
        let report = spawn_files(ctx, &files);
        let title = format!(
            "Spawned {}/{} new particle(s)",
            report.created, report.attempted
        );
        if report.created > 0 {
            notifier.show(Toast::success(title));
        } else {
            notifier.show(Toast::failure(title));
        }
        return report;
    }

    notifier.show(Toast::animated("Spawning particle..."));
    let res = selection.selected_text().and_then(|text| spawn_text(ctx, &text));
    match res {
        Ok(_) => {
            notifier.show(Toast::success("Spawned new particle"));
            SpawnReport {
                attempted: 1,
                created: 1,
            }
        }
        Err(err) => {
            notifier.show(Toast::failure(failure_title(&err, "Could not spawn particle")));
            SpawnReport {
                attempted: 1,
                created: 0,
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/create_tests.rs"]
mod tests;
