use std::path::PathBuf;

use crate::actions::{KindFilter, kind_choices};
use crate::create::{CaptureCtx, CreateForm, FieldErrors, FormContent, Submitted, submit};
use crate::host::open_in_browser;
use crate::model::ParticleKind;
use crate::notify::Toast;
use crate::session::{Credential, extract_auth_code};

use super::{App, ChoiceAction, TextInputAction};

#[derive(Clone, Debug, Default)]
pub(super) struct CreateWizard {
    pub(super) form: CreateForm,
}

#[derive(Clone, Debug, Default)]
pub(super) struct LoginWizard {
    pub(super) email: Option<String>,
    pub(super) verifier: Option<String>,
}

fn content_prompt(kind: ParticleKind) -> (&'static str, &'static str) {
    match kind {
        ParticleKind::Link => ("url> ", "Link to capture (http or https)."),
        ParticleKind::Image => ("file> ", "Path of the image file to upload."),
        ParticleKind::Text => ("text> ", "Text to capture."),
    }
}

impl App {
    pub(super) fn submit_text_input(&mut self, action: TextInputAction, value: String) {
        match action {
            TextInputAction::TagName { particle } => self.offer_tag_choices(particle, &value),

            TextInputAction::LoginEmail
            | TextInputAction::LoginPassword
            | TextInputAction::OtpEmail
            | TextInputAction::OtpCode
            | TextInputAction::OAuthCode => self.continue_login_wizard(action, value),

            TextInputAction::CreateContent
            | TextInputAction::CreateTitle
            | TextInputAction::CreateDescription => self.continue_create_wizard(action, value),
        }
    }

    pub(super) fn submit_choice(&mut self, action: ChoiceAction, index: usize) {
        match action {
            ChoiceAction::Tag { particle, choices } => {
                if let Some(choice) = choices.into_iter().nth(index) {
                    self.apply_tag(particle, choice);
                }
            }
            ChoiceAction::CreateKind { kinds } => {
                let Some(kind) = kinds.get(index).copied() else {
                    return;
                };
                if let Some(w) = self.create_wizard.as_mut() {
                    w.form.kind = Some(kind);
                    w.form.content = FormContent::default();
                }
                self.ask_create_content(Vec::new());
            }
            ChoiceAction::CreatePublic => {
                if let Some(w) = self.create_wizard.as_mut() {
                    w.form.is_public = index == 1;
                }
                self.finish_create_wizard();
            }
        }
    }

    // Sign-in

    pub(in crate::tui_shell) fn start_password_login(&mut self) {
        self.login_wizard = Some(LoginWizard::default());
        self.open_text_input_modal(
            "Sign in",
            "email> ",
            TextInputAction::LoginEmail,
            None,
            vec!["Email address of your account.".to_string()],
        );
    }

    pub(in crate::tui_shell) fn start_otp_login(&mut self) {
        self.login_wizard = Some(LoginWizard::default());
        let initial = self.auth.pending_otp_email();
        self.open_text_input_modal(
            "Email code",
            "email> ",
            TextInputAction::OtpEmail,
            initial,
            vec!["A one-time code is sent to this address.".to_string()],
        );
    }

    pub(in crate::tui_shell) fn start_otp_verify(&mut self) {
        let Some(email) = self.auth.pending_otp_email() else {
            self.toast(Toast::failure("No code pending; press o to request one"));
            return;
        };
        self.ask_otp_code(email);
    }

    fn ask_otp_code(&mut self, email: String) {
        let lines = vec![format!("Code sent to {}.", email)];
        self.login_wizard = Some(LoginWizard {
            email: Some(email),
            verifier: None,
        });
        self.open_text_input_modal("Email code", "code> ", TextInputAction::OtpCode, None, lines);
    }

    pub(in crate::tui_shell) fn start_oauth_login(&mut self) {
        if self.ctx.config.oauth.is_none() {
            self.toast(Toast::failure("Browser sign-in is not configured"));
            return;
        }
        let Some(start) = self.auth.begin_oauth(&mut self.toasts) else {
            return;
        };
        let mut lines = Vec::new();
        if let Err(err) = open_in_browser(&start.url) {
            tracing::warn!(error = %format!("{:#}", err), "browser launch failed");
            lines.push("Open this URL to continue:".to_string());
            lines.push(start.url.clone());
            lines.push(String::new());
        }
        lines.push("Paste the code (or the whole redirect URL) here.".to_string());
        self.login_wizard = Some(LoginWizard {
            email: None,
            verifier: Some(start.verifier),
        });
        self.open_text_input_modal("Browser sign-in", "code> ", TextInputAction::OAuthCode, None, lines);
    }

    fn continue_login_wizard(&mut self, action: TextInputAction, value: String) {
        let Some(mut wizard) = self.login_wizard.take() else {
            self.toast(Toast::failure("Sign-in was cancelled"));
            return;
        };

        match action {
            TextInputAction::LoginEmail => {
                wizard.email = Some(value);
                self.login_wizard = Some(wizard);
                self.open_text_input_modal(
                    "Sign in",
                    "password> ",
                    TextInputAction::LoginPassword,
                    None,
                    Vec::new(),
                );
            }
            TextInputAction::LoginPassword => {
                let Some(email) = wizard.email else {
                    self.start_password_login();
                    return;
                };
                self.auth.login(
                    Credential::Password {
                        email,
                        password: value,
                    },
                    &mut self.toasts,
                );
            }
            TextInputAction::OtpEmail => {
                if self.auth.send_otp(&value, &mut self.toasts) {
                    self.ask_otp_code(value);
                }
            }
            TextInputAction::OtpCode => {
                let Some(email) = wizard.email.or_else(|| self.auth.pending_otp_email()) else {
                    self.toast(Toast::failure("No code pending; press o to request one"));
                    return;
                };
                self.auth.login(
                    Credential::Otp {
                        email,
                        token: value,
                    },
                    &mut self.toasts,
                );
            }
            TextInputAction::OAuthCode => {
                let Some(verifier) = wizard.verifier.or_else(|| self.auth.pending_verifier()) else {
                    self.toast(Toast::failure("Browser sign-in expired; press b to restart"));
                    return;
                };
                self.auth.login(
                    Credential::OAuthCode {
                        code: extract_auth_code(&value),
                        verifier,
                    },
                    &mut self.toasts,
                );
            }
            _ => {}
        }
    }

    // Create

    pub(in crate::tui_shell) fn start_create_wizard(&mut self) {
        if self.auth.user().is_none() {
            self.toast(Toast::failure("Sign in first"));
            return;
        }
        self.create_wizard = Some(CreateWizard::default());
        self.ask_create_kind(Vec::new());
    }

    fn ask_create_kind(&mut self, mut lines: Vec<String>) {
        lines.insert(0, "What kind of particle?".to_string());
        let (kinds, options): (Vec<_>, Vec<_>) =
            kind_choices(self.types.data()).into_iter().unzip();
        self.open_choice_modal("New particle", ChoiceAction::CreateKind { kinds }, options, lines);
    }

    fn ask_create_content(&mut self, errors: Vec<String>) {
        let Some(w) = self.create_wizard.as_ref() else {
            return;
        };
        let Some(kind) = w.form.kind else {
            self.ask_create_kind(errors);
            return;
        };
        let initial = match &w.form.content {
            FormContent::Text(t) if !t.is_empty() => Some(t.clone()),
            FormContent::Files(files) => files.first().map(|p| p.display().to_string()),
            _ => None,
        };
        let (prompt, help) = content_prompt(kind);
        let mut lines = vec![help.to_string()];
        lines.extend(errors.into_iter().map(|e| format!("error: {}", e)));
        self.open_text_input_modal(
            format!("New {}", kind.name().to_lowercase()),
            prompt,
            TextInputAction::CreateContent,
            initial,
            lines,
        );
    }

    fn empty_field_note(&self, field: &str) -> String {
        let image = self
            .create_wizard
            .as_ref()
            .is_some_and(|w| w.form.kind == Some(ParticleKind::Image));
        if image && field == "title" {
            "Empty uses the file name.".to_string()
        } else if !image && self.ctx.completer().is_some() {
            format!("Empty generates the {} from the content.", field)
        } else {
            format!("Empty leaves the {} blank.", field)
        }
    }

    fn continue_create_wizard(&mut self, action: TextInputAction, value: String) {
        let Some(w) = self.create_wizard.as_mut() else {
            self.toast(Toast::failure("Create was cancelled"));
            return;
        };

        match action {
            TextInputAction::CreateContent => {
                w.form.content = if w.form.kind == Some(ParticleKind::Image) {
                    FormContent::Files(vec![PathBuf::from(value)])
                } else {
                    FormContent::Text(value)
                };
                let note = self.empty_field_note("title");
                self.open_text_input_modal(
                    "Title",
                    "title> ",
                    TextInputAction::CreateTitle,
                    None,
                    vec![note],
                );
            }
            TextInputAction::CreateTitle => {
                w.form.title = value;
                let note = self.empty_field_note("description");
                self.open_text_input_modal(
                    "Description",
                    "description> ",
                    TextInputAction::CreateDescription,
                    None,
                    vec![note],
                );
            }
            TextInputAction::CreateDescription => {
                w.form.description = value;
                self.open_choice_modal(
                    "Visibility",
                    ChoiceAction::CreatePublic,
                    vec!["Private".to_string(), "Public".to_string()],
                    vec!["Who can see this particle?".to_string()],
                );
            }
            _ => {}
        }
    }

    fn finish_create_wizard(&mut self) {
        let Some(wizard) = self.create_wizard.take() else {
            return;
        };
        let Some(uid) = self.auth.user().map(|u| u.id.clone()) else {
            self.toast(Toast::failure("Sign in first"));
            return;
        };

        let ctx = CaptureCtx {
            backend: self.ctx.client.as_ref(),
            user_id: &uid,
            completer: self.ctx.completer(),
        };
        match submit(&ctx, &wizard.form, &mut self.toasts) {
            Submitted::Invalid(errors) => self.reopen_create_wizard(wizard, errors),
            Submitted::Failed => {}
            Submitted::Created(p) => {
                self.particles.revalidate(self.ctx.client.as_ref());
                self.filter = KindFilter::All;
                let idx = self.visible().iter().position(|v| v.id == p.id);
                self.selected = idx.unwrap_or(0);
            }
        }
    }

    /// Sends the user back to the first failing field with the errors shown.
    fn reopen_create_wizard(&mut self, wizard: CreateWizard, errors: FieldErrors) {
        let lines = errors.lines();
        self.create_wizard = Some(wizard);
        if errors.kind.is_some() {
            self.ask_create_kind(lines);
        } else {
            self.ask_create_content(lines);
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/wizard_tests.rs"]
mod tests;
