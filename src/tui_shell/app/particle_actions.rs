use crate::backend::Backend;
use crate::host::{Clipboard, ConfirmPrompt, Preconfirmed, SystemClipboard, open_in_browser};
use crate::model::ParticleBody;

use super::*;

impl App {
    fn require_selected(&mut self) -> Option<Particle> {
        let p = self.selected_particle();
        if p.is_none() {
            self.toast(Toast::failure("No particle selected"));
        }
        p
    }

    fn require_user_id(&mut self) -> Option<String> {
        let uid = self.auth.user().map(|u| u.id.clone());
        if uid.is_none() {
            self.toast(Toast::failure("Sign in first"));
        }
        uid
    }

    pub(in crate::tui_shell) fn copy_selected(&mut self) {
        let Some(p) = self.require_selected() else {
            return;
        };
        let mut clipboard = match SystemClipboard::new() {
            Ok(c) => c,
            Err(err) => {
                self.toast(Toast::failure(crate::notify::failure_title(
                    &err,
                    "Clipboard unavailable",
                )));
                return;
            }
        };
        actions::copy_content(
            self.ctx.client.as_ref(),
            &p,
            &mut clipboard as &mut dyn Clipboard,
            &mut self.toasts,
        );
    }

    pub(in crate::tui_shell) fn toggle_public_selected(&mut self) {
        let Some(p) = self.require_selected() else {
            return;
        };
        actions::toggle_public(
            self.ctx.client.as_ref(),
            &mut self.particles,
            &p,
            &mut self.toasts,
        );
        self.clamp_selection();
    }

    pub(in crate::tui_shell) fn toggle_archive_selected(&mut self) {
        let Some(p) = self.require_selected() else {
            return;
        };
        actions::toggle_archive(
            self.ctx.client.as_ref(),
            &mut self.particles,
            &p,
            &mut self.toasts,
        );
        self.clamp_selection();
    }

    pub(in crate::tui_shell) fn start_tag_selected(&mut self) {
        let Some(p) = self.require_selected() else {
            return;
        };
        let current = if p.tags.is_empty() {
            "no tags".to_string()
        } else {
            p.tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        self.open_text_input_modal(
            "Tag",
            "tag> ",
            TextInputAction::TagName {
                particle: p.id.clone(),
            },
            None,
            vec![
                format!("particle: {}", p.display_title()),
                format!("tags: {}", current),
                "Type a name to search or create; empty lists every tag.".to_string(),
            ],
        );
    }

    pub(in crate::tui_shell) fn offer_tag_choices(&mut self, particle: ParticleId, input: &str) {
        let Some(p) = self.particle_by_id(&particle) else {
            self.toast(Toast::failure("Particle is gone"));
            return;
        };
        let choices = actions::tag_choices(&p, self.tags.data(), input);
        if choices.is_empty() {
            self.toast(Toast::failure("No tags yet; type a name to create one"));
            return;
        }
        let options = choices.iter().map(TagChoice::label).collect();
        self.open_choice_modal(
            "Tag",
            ChoiceAction::Tag { particle, choices },
            options,
            vec![format!("particle: {}", p.display_title())],
        );
    }

    pub(in crate::tui_shell) fn apply_tag(&mut self, particle: ParticleId, choice: TagChoice) {
        let Some(p) = self.particle_by_id(&particle) else {
            self.toast(Toast::failure("Particle is gone"));
            return;
        };
        let Some(uid) = self.require_user_id() else {
            return;
        };
        actions::apply_tag_choice(
            self.ctx.client.as_ref(),
            &mut self.particles,
            Some(&mut self.tags),
            &uid,
            &p,
            &choice,
            &mut self.toasts,
        );
    }

    pub(in crate::tui_shell) fn confirm_destroy_selected(&mut self) {
        let Some(p) = self.require_selected() else {
            return;
        };
        self.open_confirm_modal(
            &ConfirmPrompt::destroy_particle(p.display_title()),
            PendingAction::Destroy(p.id.clone()),
        );
    }

    pub(in crate::tui_shell) fn confirm_logout(&mut self) {
        self.open_confirm_modal(&ConfirmPrompt::logout(), PendingAction::Logout);
    }

    /// Runs an action the user already confirmed in a modal.
    pub(in crate::tui_shell) fn run_pending_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::Destroy(id) => {
                let Some(p) = self.particle_by_id(&id) else {
                    self.toast(Toast::failure("Particle is gone"));
                    return;
                };
                actions::destroy(
                    self.ctx.client.as_ref(),
                    &mut self.particles,
                    &p,
                    &mut Preconfirmed,
                    &mut self.toasts,
                );
                self.clamp_selection();
            }
            PendingAction::Logout => {
                self.auth.logout(&mut self.toasts);
            }
        }
    }

    pub(in crate::tui_shell) fn open_selected(&mut self) {
        let Some(p) = self.require_selected() else {
            return;
        };
        let url = match p.body() {
            Ok(ParticleBody::Link(url)) => url.trim().to_string(),
            Ok(ParticleBody::Image { key }) => self.ctx.client.media_url(key),
            Ok(ParticleBody::Text(_)) | Err(_) => {
                self.show_selected();
                return;
            }
        };
        match open_in_browser(&url) {
            Ok(()) => self.toast(Toast::success("Opened in browser")),
            Err(err) => self.toast(Toast::failure(crate::notify::failure_title(
                &err,
                "Could not open",
            ))),
        }
    }

    pub(in crate::tui_shell) fn show_selected(&mut self) {
        let Some(p) = self.require_selected() else {
            return;
        };
        let media = match p.body() {
            Ok(ParticleBody::Image { key }) => Some(self.ctx.client.media_url(key)),
            _ => None,
        };
        let lines = super::super::views::particles::detail_lines(&p, media.as_deref());
        self.open_modal(p.display_title().to_string(), lines);
    }
}
