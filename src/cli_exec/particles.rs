use particle::actions::{self, KindFilter, filter_by_kind};
use particle::backend::Backend;
use particle::hooks::{TagsHook, tags_query};
use particle::host::{
    Confirm, ConfirmPrompt, Preconfirmed, StdinConfirm, SystemClipboard, open_in_browser,
};
use particle::model::{Particle, ParticleBody, ParticleKind};
use particle::utils::type_icon;

use super::context::Signed;
use super::*;

pub(super) fn parse_kind(s: &str) -> Result<ParticleKind> {
    ParticleKind::parse(s)
        .with_context(|| format!("unknown particle type {:?} (expected link, image or text)", s))
}

fn tag_list(p: &Particle) -> String {
    p.tags
        .iter()
        .map(|t| format!("#{}", t.name))
        .collect::<Vec<_>>()
        .join(" ")
}

fn row_line(p: &Particle) -> String {
    let mut flags = Vec::new();
    if p.is_public {
        flags.push("public");
    }
    if p.is_archived {
        flags.push("archived");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(","))
    };
    let date = p.created_at.get(..10).unwrap_or(&p.created_at);
    let mut line = format!(
        "{}  {} {}{}  {}",
        p.id,
        type_icon(p.type_id).glyph(),
        p.display_title(),
        flags,
        date
    );
    let tags = tag_list(p);
    if !tags.is_empty() {
        line.push_str("  ");
        line.push_str(&tags);
    }
    line
}

pub(super) fn handle_list_command(
    s: &Signed,
    kind: Option<String>,
    archived: bool,
    json: bool,
) -> Result<()> {
    let filter = match kind.as_deref() {
        Some(k) => KindFilter::Only(parse_kind(k)?),
        None => KindFilter::All,
    };
    let hook = s.particles()?;
    let shown: Vec<&Particle> = filter_by_kind(hook.data(), filter)
        .into_iter()
        .filter(|p| archived || !p.is_archived)
        .collect();

    if json {
        return print_json(&shown, "particle list");
    }
    if shown.is_empty() {
        println!("No particles");
        return Ok(());
    }
    for p in shown {
        println!("{}", row_line(p));
    }
    Ok(())
}

pub(super) fn handle_show_command(s: &Signed, id: &str, json: bool) -> Result<()> {
    let hook = s.particles()?;
    let p = s.resolve(&hook, id)?;
    if json {
        return print_json(&p, "particle");
    }

    let kind = p.kind().map(|k| k.name()).unwrap_or("unknown");
    println!("id: {}", p.id);
    println!("type: {}", kind);
    if let Some(t) = p.title.as_deref() {
        println!("title: {}", t);
    }
    println!("content: {}", p.content);
    if let Ok(ParticleBody::Image { key }) = p.body() {
        println!("url: {}", s.ctx.client.media_url(key));
    }
    if let Some(d) = p.description.as_deref() {
        println!("description: {}", d);
    }
    println!("public: {}", p.is_public);
    println!("archived: {}", p.is_archived);
    let tags = tag_list(&p);
    if !tags.is_empty() {
        println!("tags: {}", tags);
    }
    println!("created_at: {}", p.created_at);
    if let Some(u) = p.updated_at.as_deref() {
        println!("updated_at: {}", u);
    }
    Ok(())
}

pub(super) fn handle_publish_command(s: &Signed, id: &str) -> Result<()> {
    let mut hook = s.particles()?;
    let p = s.resolve(&hook, id)?;
    reported(actions::toggle_public(
        s.ctx.client.as_ref(),
        &mut hook,
        &p,
        &mut StderrNotifier,
    ))
}

pub(super) fn handle_archive_command(s: &Signed, id: &str) -> Result<()> {
    let mut hook = s.particles()?;
    let p = s.resolve(&hook, id)?;
    reported(actions::toggle_archive(
        s.ctx.client.as_ref(),
        &mut hook,
        &p,
        &mut StderrNotifier,
    ))
}

/// An existing tag (matched case-insensitively) is toggled; any other name
/// is created and applied.
pub(super) fn handle_tag_command(s: &Signed, id: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("tag name is empty");
    }
    let mut hook = s.particles()?;
    let p = s.resolve(&hook, id)?;

    let backend = s.ctx.client.as_ref();
    let mut tags = TagsHook::new(tags_query(s.user_id()));
    tags.mount(backend);
    if let Some(err) = tags.error() {
        anyhow::bail!("{}", err);
    }
    let choice = actions::tag_choices(&p, tags.data(), name)
        .into_iter()
        .next()
        .context("no tag choice for that name")?;
    reported(actions::apply_tag_choice(
        backend,
        &mut hook,
        Some(&mut tags),
        s.user_id(),
        &p,
        &choice,
        &mut StderrNotifier,
    ))
}

pub(super) fn handle_destroy_command(s: &Signed, id: &str, yes: bool) -> Result<()> {
    let mut hook = s.particles()?;
    let p = s.resolve(&hook, id)?;

    let mut confirm = StdinConfirm { assume_yes: yes };
    if !confirm.confirm(&ConfirmPrompt::destroy_particle(p.display_title())) {
        eprintln!("Cancelled");
        return Ok(());
    }
    reported(actions::destroy(
        s.ctx.client.as_ref(),
        &mut hook,
        &p,
        &mut Preconfirmed,
        &mut StderrNotifier,
    ))
}

pub(super) fn handle_copy_command(s: &Signed, id: &str) -> Result<()> {
    let hook = s.particles()?;
    let p = s.resolve(&hook, id)?;
    let mut clipboard = SystemClipboard::new()?;
    reported(actions::copy_content(
        s.ctx.client.as_ref(),
        &p,
        &mut clipboard,
        &mut StderrNotifier,
    ))
}

pub(super) fn handle_open_command(s: &Signed, id: &str) -> Result<()> {
    let hook = s.particles()?;
    let p = s.resolve(&hook, id)?;
    let url = match p.body()? {
        ParticleBody::Link(url) => url.trim().to_string(),
        ParticleBody::Image { key } => s.ctx.client.media_url(key),
        ParticleBody::Text(_) => anyhow::bail!("text particles have nothing to open"),
    };
    open_in_browser(&url)?;
    println!("{}", url);
    Ok(())
}
