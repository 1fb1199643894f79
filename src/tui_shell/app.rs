use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::actions::{self, KindFilter, TagChoice};
use crate::context::ClientContext;
use crate::hooks::{ParticlesHook, TagsHook, TypesHook, particles_query, tags_query, types_query};
use crate::model::{Particle, ParticleId};
use crate::notify::{Notifier, Toast, ToastLog, ToastStyle};
use crate::session::AuthHook;

use time::OffsetDateTime;

use super::input::Input;
use super::modal;
use super::view::RenderCtx;
use super::wizard::{CreateWizard, LoginWizard};

mod event_loop;
mod modal_output;
mod modal_types;
mod particle_actions;
mod render;
mod runtime;
mod session_sync;
mod time_utils;

pub(super) use self::modal_types::{ChoiceAction, Modal, ModalKind, PendingAction, TextInputAction};
pub(super) use self::time_utils::{fmt_ts_list, fmt_ts_ui};
#[cfg(test)]
pub(super) use self::event_loop::handle_key;

pub(super) fn run() -> Result<()> {
    runtime::run()
}

pub(in crate::tui_shell) struct App {
    pub(in crate::tui_shell) ctx: ClientContext,
    pub(in crate::tui_shell) auth: AuthHook,
    // Raised by the session observer; consumed once per loop turn.
    pub(in crate::tui_shell) session_changed: Arc<AtomicBool>,

    pub(in crate::tui_shell) particles: ParticlesHook,
    pub(in crate::tui_shell) tags: TagsHook,
    pub(in crate::tui_shell) types: TypesHook,

    pub(in crate::tui_shell) filter: KindFilter,
    pub(in crate::tui_shell) selected: usize,

    pub(in crate::tui_shell) toasts: ToastLog,
    pub(in crate::tui_shell) modal: Option<Modal>,

    pub(in crate::tui_shell) create_wizard: Option<CreateWizard>,
    pub(in crate::tui_shell) login_wizard: Option<LoginWizard>,

    pub(in crate::tui_shell) quit: bool,
}

impl App {
    pub(in crate::tui_shell) fn load(ctx: ClientContext) -> Self {
        let mut auth = ctx.auth_hook();
        let session_changed = Arc::new(AtomicBool::new(true));
        let flag = session_changed.clone();
        auth.subscribe(move |_| flag.store(true, Ordering::SeqCst));

        let mut app = App {
            ctx,
            auth,
            session_changed,
            particles: ParticlesHook::new(particles_query("")),
            tags: TagsHook::new(tags_query("")),
            types: TypesHook::new(types_query()),
            filter: KindFilter::All,
            selected: 0,
            toasts: ToastLog::default(),
            modal: None,
            create_wizard: None,
            login_wizard: None,
            quit: false,
        };
        app.sync_session();
        app
    }

    /// Particles passing the current type filter, in list order.
    pub(in crate::tui_shell) fn visible(&self) -> Vec<&Particle> {
        actions::filter_by_kind(self.particles.data(), self.filter)
    }

    pub(in crate::tui_shell) fn selected_particle(&self) -> Option<Particle> {
        let visible = self.visible();
        if visible.is_empty() {
            return None;
        }
        visible
            .get(self.selected.min(visible.len() - 1))
            .map(|p| (*p).clone())
    }

    pub(in crate::tui_shell) fn particle_by_id(&self, id: &ParticleId) -> Option<Particle> {
        self.particles.data().iter().find(|p| &p.id == id).cloned()
    }

    pub(in crate::tui_shell) fn clamp_selection(&mut self) {
        let n = self.visible().len();
        self.selected = if n == 0 { 0 } else { self.selected.min(n - 1) };
    }

    pub(in crate::tui_shell) fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub(in crate::tui_shell) fn move_down(&mut self) {
        let n = self.visible().len();
        if n > 0 {
            self.selected = (self.selected + 1).min(n - 1);
        }
    }

    pub(in crate::tui_shell) fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.clamp_selection();
    }

    pub(in crate::tui_shell) fn user_label(&self) -> Option<String> {
        self.auth
            .user()
            .map(|u| u.email.clone().unwrap_or_else(|| u.id.clone()))
    }

    pub(in crate::tui_shell) fn last_toast(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub(in crate::tui_shell) fn toast(&mut self, toast: Toast) {
        self.toasts.show(toast);
    }
}
