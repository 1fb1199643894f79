//! Per-particle actions of the list view.
//!
//! Every mutation is pessimistic: in-progress toast, one remote call, one
//! revalidation of the particle list, then a success or failure toast. A
//! failed call leaves the previously fetched rows on screen.

use anyhow::Result;
use serde_json::json;

use crate::backend::{Backend, Filter, insert_as};
use crate::hooks::{ParticlesHook, TagsHook};
use crate::host::{Clipboard, Confirm, ConfirmPrompt};
use crate::model::{NewTag, Particle, ParticleBody, ParticleKind, ParticleTag, Tag, TypeRow};
use crate::notify::{Notifier, Toast, failure_title};
use crate::utils::random_color;

/// Client-side type filter of the list. Never hits the network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Only(ParticleKind),
}

impl KindFilter {
    pub fn next(self) -> Self {
        match self {
            KindFilter::All => KindFilter::Only(ParticleKind::Link),
            KindFilter::Only(ParticleKind::Link) => KindFilter::Only(ParticleKind::Image),
            KindFilter::Only(ParticleKind::Image) => KindFilter::Only(ParticleKind::Text),
            KindFilter::Only(ParticleKind::Text) => KindFilter::All,
        }
    }

    pub fn label(self, types: &[TypeRow]) -> String {
        match self {
            KindFilter::All => "All types".to_string(),
            KindFilter::Only(k) => kind_label(k, types),
        }
    }

    pub fn matches(self, particle: &Particle) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(k) => particle.type_id == k.id(),
        }
    }
}

/// Label of a kind from the fetched `type` rows, or its built-in name
/// when the rows are not loaded.
pub fn kind_label(kind: ParticleKind, types: &[TypeRow]) -> String {
    types
        .iter()
        .find(|t| t.kind() == Some(kind))
        .map(TypeRow::label)
        .unwrap_or_else(|| kind.name().to_string())
}

/// Kinds offered when creating, in `type` row order. Rows with an unknown
/// id are skipped; without usable rows every built-in kind is offered.
pub fn kind_choices(types: &[TypeRow]) -> Vec<(ParticleKind, String)> {
    let mut out: Vec<(ParticleKind, String)> = Vec::new();
    for row in types {
        if let Some(kind) = row.kind()
            && !out.iter().any(|(k, _)| *k == kind)
        {
            out.push((kind, row.label()));
        }
    }
    if out.is_empty() {
        out = ParticleKind::ALL
            .iter()
            .map(|k| (*k, k.name().to_string()))
            .collect();
    }
    out
}

pub fn filter_by_kind(particles: &[Particle], filter: KindFilter) -> Vec<&Particle> {
    particles.iter().filter(|p| filter.matches(p)).collect()
}

fn by_id(particle: &Particle) -> [Filter; 1] {
    [Filter::eq("id", &particle.id)]
}

/// Runs one mutation, then revalidates, then reports.
fn mutate(
    backend: &dyn Backend,
    particles: &mut ParticlesHook,
    notifier: &mut dyn Notifier,
    pending: &str,
    done: &str,
    fallback: &str,
    op: impl FnOnce(&dyn Backend) -> Result<()>,
) -> bool {
    notifier.show(Toast::animated(pending));
    let res = op(backend);
    particles.revalidate(backend);
    match res {
        Ok(()) => {
            notifier.show(Toast::success(done));
            true
        }
        Err(err) => {
            tracing::warn!(error = %format!("{:#}", err), "{}", pending);
            notifier.show(Toast::failure(failure_title(&err, fallback)));
            false
        }
    }
}

pub fn toggle_public(
    backend: &dyn Backend,
    particles: &mut ParticlesHook,
    particle: &Particle,
    notifier: &mut dyn Notifier,
) -> bool {
    let (pending, done) = if particle.is_public {
        ("Unpublishing particle...", "Particle is private")
    } else {
        ("Publishing particle...", "Particle is public")
    };
    let target = by_id(particle);
    let patch = json!({ "is_public": !particle.is_public });
    mutate(
        backend,
        particles,
        notifier,
        pending,
        done,
        "Could not update particle",
        |b| b.update_rows("particle", &target, &patch),
    )
}

pub fn toggle_archive(
    backend: &dyn Backend,
    particles: &mut ParticlesHook,
    particle: &Particle,
    notifier: &mut dyn Notifier,
) -> bool {
    let (pending, done) = if particle.is_archived {
        ("Unarchiving particle...", "Particle is listed")
    } else {
        ("Archiving particle...", "Particle is archived")
    };
    let target = by_id(particle);
    let patch = json!({ "is_archived": !particle.is_archived });
    mutate(
        backend,
        particles,
        notifier,
        pending,
        done,
        "Could not update particle",
        |b| b.update_rows("particle", &target, &patch),
    )
}

/// Deletes after confirmation. Declining issues no call and no toast.
pub fn destroy(
    backend: &dyn Backend,
    particles: &mut ParticlesHook,
    particle: &Particle,
    confirm: &mut dyn Confirm,
    notifier: &mut dyn Notifier,
) -> bool {
    if !confirm.confirm(&ConfirmPrompt::destroy_particle(particle.display_title())) {
        return false;
    }
    let target = by_id(particle);
    mutate(
        backend,
        particles,
        notifier,
        "Destroying particle...",
        "Particle destroyed",
        "Could not destroy particle",
        |b| b.delete_rows("particle", &target),
    )
}

/// What is copied for a particle: image particles yield their public URL.
pub fn copy_text(backend: &dyn Backend, particle: &Particle) -> String {
    match particle.body() {
        Ok(ParticleBody::Image { key }) => backend.media_url(key),
        _ => particle.content.clone(),
    }
}

pub fn copy_content(
    backend: &dyn Backend,
    particle: &Particle,
    clipboard: &mut dyn Clipboard,
    notifier: &mut dyn Notifier,
) -> bool {
    match clipboard.copy_text(&copy_text(backend, particle)) {
        Ok(()) => {
            notifier.show(Toast::success("Copied to clipboard"));
            true
        }
        Err(err) => {
            notifier.show(Toast::failure(failure_title(&err, "Could not copy")));
            false
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagChoice {
    CreateAndApply { name: String },
    Apply(Tag),
    Remove(Tag),
}

impl TagChoice {
    pub fn label(&self) -> String {
        match self {
            TagChoice::CreateAndApply { name } => format!("Create and apply \"{}\"", name),
            TagChoice::Apply(t) => format!("Apply \"{}\"", t.name),
            TagChoice::Remove(t) => format!("Remove \"{}\"", t.name),
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn toggle_for(particle: &Particle, tag: &Tag) -> TagChoice {
    if particle.has_tag(tag) {
        TagChoice::Remove(tag.clone())
    } else {
        TagChoice::Apply(tag.clone())
    }
}

/// Choices offered for a typed tag name.
///
/// An exact (case-insensitive, trimmed) match yields only its apply/remove
/// toggle. Otherwise "create and apply" comes first, followed by toggles for
/// tags whose names contain the input. Blank input lists every tag.
pub fn tag_choices(particle: &Particle, tags: &[Tag], input: &str) -> Vec<TagChoice> {
    let wanted = normalize(input);
    if wanted.is_empty() {
        return tags.iter().map(|t| toggle_for(particle, t)).collect();
    }
    if let Some(exact) = tags.iter().find(|t| normalize(&t.name) == wanted) {
        return vec![toggle_for(particle, exact)];
    }
    let mut out = vec![TagChoice::CreateAndApply {
        name: input.trim().to_string(),
    }];
    out.extend(
        tags.iter()
            .filter(|t| normalize(&t.name).contains(&wanted))
            .map(|t| toggle_for(particle, t)),
    );
    out
}

fn link(particle: &Particle, tag: &Tag) -> ParticleTag {
    ParticleTag {
        particle_id: particle.id.clone(),
        tag_id: tag.id,
    }
}

/// Creates the tag row, then the join row. A failed join deletes the new tag
/// row again; a failed cleanup leaves the orphan and is only logged.
fn create_and_apply(
    backend: &dyn Backend,
    user_id: &str,
    particle: &Particle,
    name: &str,
) -> Result<Tag> {
    let tag: Tag = insert_as(
        backend,
        "tag",
        &NewTag {
            name: name.to_string(),
            color: random_color()?,
            user_id: user_id.to_string(),
        },
    )?;
    if let Err(err) = insert_as::<serde_json::Value>(backend, "particle_tag", &link(particle, &tag)) {
        if let Err(cleanup) = backend.delete_rows("tag", &[Filter::eq("id", tag.id)]) {
            tracing::warn!(tag = %tag.id, error = %format!("{:#}", cleanup), "orphaned tag row left behind");
        }
        return Err(err);
    }
    Ok(tag)
}

#[allow(clippy::too_many_arguments)]
pub fn apply_tag_choice(
    backend: &dyn Backend,
    particles: &mut ParticlesHook,
    tags: Option<&mut TagsHook>,
    user_id: &str,
    particle: &Particle,
    choice: &TagChoice,
    notifier: &mut dyn Notifier,
) -> bool {
    let ok = match choice {
        TagChoice::CreateAndApply { name } => mutate(
            backend,
            particles,
            notifier,
            "Tagging particle...",
            &format!("Tagged with \"{}\"", name),
            "Could not tag particle",
            |b| create_and_apply(b, user_id, particle, name).map(|_| ()),
        ),
        TagChoice::Apply(tag) => {
            let row = link(particle, tag);
            mutate(
                backend,
                particles,
                notifier,
                "Tagging particle...",
                &format!("Tagged with \"{}\"", tag.name),
                "Could not tag particle",
                |b| insert_as::<serde_json::Value>(b, "particle_tag", &row).map(|_| ()),
            )
        }
        TagChoice::Remove(tag) => {
            let target = [
                Filter::eq("particle_id", &particle.id),
                Filter::eq("tag_id", tag.id),
            ];
            mutate(
                backend,
                particles,
                notifier,
                "Untagging particle...",
                &format!("Removed \"{}\"", tag.name),
                "Could not untag particle",
                |b| b.delete_rows("particle_tag", &target),
            )
        }
    };
    if ok && matches!(choice, TagChoice::CreateAndApply { .. }) && let Some(tags) = tags {
        tags.revalidate(backend);
    }
    ok
}

#[cfg(test)]
#[path = "tests/actions_tests.rs"]
mod tests;
