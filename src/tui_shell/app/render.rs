use super::super::views::{login::LoginView, particles::ParticlesView};
use super::*;

const LIST_HINTS: &str = "↑/↓ move  enter details  n new  c copy  o open  p publish  a archive  g tag  d destroy  t filter  r refresh  L logout  q quit";
const LOGIN_HINTS: &str = "p password  o email code  v verify code  b browser  q quit";

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(area);

    let authed = app.auth.context().is_authenticated();

    // Header
    let mut spans = vec![
        Span::styled(
            "Particle",
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        Span::raw("  "),
    ];
    match app.user_label() {
        Some(who) => spans.push(Span::styled(who, Style::default().fg(Color::Green))),
        None => spans.push(Span::styled("signed out", Style::default().fg(Color::Red))),
    }
    if authed {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("filter: {}", app.filter.label(app.types.data())),
            Style::default().fg(Color::Cyan),
        ));
        if app.particles.is_loading() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled("loading", Style::default().fg(Color::Gray)));
        }
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    // Main view
    let ctx = RenderCtx {
        now: OffsetDateTime::now_utc(),
    };
    if authed {
        let visible = app.visible();
        let view = ParticlesView {
            selected: app.selected.min(visible.len().saturating_sub(1)),
            particles: visible,
            filter: app.filter,
            types: app.types.data(),
            loaded: app.particles.has_data(),
            error: app.particles.error(),
        };
        view.render(frame, chunks[1], &ctx);
    } else {
        let pending = app.auth.pending_otp_email();
        let view = LoginView {
            state: app.auth.context().state(),
            pending_email: pending.as_deref(),
            oauth: app.ctx.config.oauth.is_some(),
        };
        view.render(frame, chunks[1]);
    }

    // Status: the current toast
    {
        let line = match app.last_toast() {
            Some(t) => {
                let (marker, style) = match t.style {
                    ToastStyle::Animated => ("… ", Style::default().fg(Color::Yellow)),
                    ToastStyle::Success => ("✓ ", Style::default().fg(Color::Green)),
                    ToastStyle::Failure => ("✗ ", Style::default().fg(Color::Red)),
                };
                let mut spans = vec![
                    Span::styled(marker, style),
                    Span::styled(t.title.as_str(), style),
                ];
                if let Some(m) = &t.message {
                    spans.push(Span::styled(
                        format!("  {}", m),
                        Style::default().fg(Color::Gray),
                    ));
                }
                Line::from(spans)
            }
            None => Line::from(""),
        };
        frame.render_widget(
            Paragraph::new(line)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::TOP)),
            chunks[2],
        );
    }

    let hints = if authed { LIST_HINTS } else { LOGIN_HINTS };
    frame.render_widget(
        Paragraph::new(Span::styled(
            hints,
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        )),
        chunks[3],
    );

    if let Some(m) = &app.modal {
        dim_frame(frame);
        modal::draw_modal(frame, m);
    }
}

fn dim_frame(frame: &mut ratatui::Frame) {
    let area = frame.area();
    let buf = frame.buffer_mut();
    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.modifier |= Modifier::DIM;
            }
        }
    }
}
