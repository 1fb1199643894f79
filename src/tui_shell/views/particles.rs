use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::actions::KindFilter;
use crate::model::{Particle, TypeRow};
use crate::utils::type_icon;

use super::super::{RenderCtx, fmt_ts_list, fmt_ts_ui, render_view_chrome};

pub(in crate::tui_shell) struct ParticlesView<'a> {
    pub(in crate::tui_shell) particles: Vec<&'a Particle>,
    pub(in crate::tui_shell) selected: usize,
    pub(in crate::tui_shell) filter: KindFilter,
    pub(in crate::tui_shell) types: &'a [TypeRow],
    pub(in crate::tui_shell) loaded: bool,
    pub(in crate::tui_shell) error: Option<&'a str>,
}

fn last_touched(p: &Particle) -> &str {
    p.updated_at.as_deref().unwrap_or(&p.created_at)
}

/// Status markers shown after the title.
fn markers(p: &Particle) -> String {
    let mut out = Vec::new();
    if p.is_public {
        out.push("public");
    }
    if p.is_archived {
        out.push("archived");
    }
    if out.is_empty() {
        String::new()
    } else {
        format!(" [{}]", out.join(","))
    }
}

pub(in crate::tui_shell) fn row_line(p: &Particle, ctx: &RenderCtx) -> String {
    let title: String = p
        .display_title()
        .lines()
        .next()
        .unwrap_or("")
        .chars()
        .take(60)
        .collect();
    let tags = p
        .tags
        .iter()
        .map(|t| format!("#{}", t.name))
        .collect::<Vec<_>>()
        .join(" ");
    let mut line = format!(
        "{} {}{}  {}",
        type_icon(p.type_id).glyph(),
        title,
        markers(p),
        fmt_ts_list(last_touched(p), ctx)
    );
    if !tags.is_empty() {
        line.push_str("  ");
        line.push_str(&tags);
    }
    line
}

/// Full field listing; `media_url` is the public URL of an image particle.
pub(in crate::tui_shell) fn detail_lines(p: &Particle, media_url: Option<&str>) -> Vec<String> {
    let kind = p
        .kind()
        .map(|k| k.name().to_string())
        .unwrap_or_else(|| format!("unknown ({})", p.type_id));
    let mut out = vec![
        format!("id: {}", p.id),
        format!("type: {}", kind),
        format!("title: {}", p.title.as_deref().unwrap_or("-")),
        format!("public: {}", if p.is_public { "yes" } else { "no" }),
        format!("archived: {}", if p.is_archived { "yes" } else { "no" }),
        format!("created_at: {}", fmt_ts_ui(&p.created_at)),
    ];
    if let Some(u) = &p.updated_at {
        out.push(format!("updated_at: {}", fmt_ts_ui(u)));
    }
    if !p.tags.is_empty() {
        let names: Vec<&str> = p.tags.iter().map(|t| t.name.as_str()).collect();
        out.push(format!("tags: {}", names.join(", ")));
    }
    if let Some(url) = media_url {
        out.push(format!("url: {}", url));
    }
    if let Some(d) = p.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push(String::new());
        out.push(d.to_string());
    }
    out.push(String::new());
    out.extend(p.content.lines().map(str::to_string));
    out
}

impl ParticlesView<'_> {
    pub(in crate::tui_shell) fn render(
        &self,
        frame: &mut ratatui::Frame,
        area: ratatui::layout::Rect,
        ctx: &RenderCtx,
    ) {
        let note = format!("{} shown, filter: {}", self.particles.len(), self.filter.label(self.types));
        let inner = render_view_chrome(frame, "Particles", &note, area);
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(inner);

        let mut state = ListState::default();
        if !self.particles.is_empty() {
            state.select(Some(self.selected.min(self.particles.len() - 1)));
        }

        let mut rows: Vec<ListItem> = self
            .particles
            .iter()
            .map(|p| ListItem::new(row_line(p, ctx)))
            .collect();
        if rows.is_empty() {
            let msg = match (self.loaded, self.error) {
                (_, Some(err)) => format!("(failed to load: {})", err),
                (false, None) => "(loading)".to_string(),
                (true, None) => "(no particles; press n to create one)".to_string(),
            };
            rows.push(ListItem::new(msg));
        }

        let list = List::new(rows)
            .block(Block::default().borders(Borders::BOTTOM))
            .highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(list, parts[0], &mut state);

        let details: Vec<Line> = match self.particles.get(self.selected) {
            Some(p) => detail_lines(p, None).into_iter().map(Line::from).collect(),
            None => vec![Line::from("(no selection)")],
        };
        let mut para = Paragraph::new(details).wrap(Wrap { trim: false });
        if let Some(err) = self.error
            && !self.particles.is_empty()
        {
            para = para.block(
                Block::default()
                    .title(format!("stale: {}", err))
                    .title_style(Style::default().fg(Color::Red)),
            );
        }
        frame.render_widget(para, parts[1]);
    }
}

#[cfg(test)]
#[path = "../../tests/tui_shell/views/particles_tests.rs"]
mod tests;
