use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::session::{AuthPhase, SessionState};

use super::super::render_view_chrome;

pub(in crate::tui_shell) struct LoginView<'a> {
    pub(in crate::tui_shell) state: &'a SessionState,
    pub(in crate::tui_shell) pending_email: Option<&'a str>,
    pub(in crate::tui_shell) oauth: bool,
}

impl LoginView<'_> {
    pub(in crate::tui_shell) fn lines(&self) -> Vec<Line<'static>> {
        let mut out = vec![
            Line::from("Sign in to see your particles."),
            Line::from(""),
            Line::from("  p  email and password"),
            Line::from("  o  send a one-time code by email"),
        ];
        let pending = match &self.state.phase {
            AuthPhase::OtpPending { email } => Some(email.clone()),
            _ => self.pending_email.map(str::to_string),
        };
        if let Some(email) = pending {
            out.push(Line::from(format!("  v  enter the code sent to {}", email)));
        }
        if self.oauth {
            out.push(Line::from("  b  continue in the browser"));
        }
        if let Some(err) = &self.state.error {
            out.push(Line::from(""));
            out.push(Line::from(Span::styled(
                err.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        out
    }

    pub(in crate::tui_shell) fn render(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let inner = render_view_chrome(frame, "Sign in", "", area);
        frame.render_widget(Paragraph::new(self.lines()).wrap(Wrap { trim: false }), inner);
    }
}
