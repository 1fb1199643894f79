//! Sign-in state and the hook that drives it.
//!
//! `SessionContext` holds the current phase; `AuthHook` is its only writer.
//! Views subscribe to the context and re-render on every change.

use std::sync::Arc;

use anyhow::Result;

use crate::backend::AuthProvider;
use crate::model::{AuthUser, ClientConfig};
use crate::notify::{Notifier, Toast, failure_title};
use crate::remote::PkcePair;
use crate::store::KeyValueStorage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthPhase {
    Anonymous,
    OtpPending { email: String },
    Authenticated(AuthUser),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub phase: AuthPhase,
    /// Message of the last failed transition, cleared by the next success.
    pub error: Option<String>,
}

type Observer = Box<dyn FnMut(&SessionState) + Send>;

pub struct SessionContext {
    state: SessionState,
    observers: Vec<Observer>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            state: SessionState {
                phase: AuthPhase::Anonymous,
                error: None,
            },
            observers: Vec::new(),
        }
    }
}

impl SessionContext {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&AuthUser> {
        match &self.state.phase {
            AuthPhase::Authenticated(u) => Some(u),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&SessionState) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn set(&mut self, phase: AuthPhase, error: Option<String>) {
        self.state = SessionState { phase, error };
        for observer in self.observers.iter_mut() {
            observer(&self.state);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credential {
    Password { email: String, password: String },
    Otp { email: String, token: String },
    OAuthCode { code: String, verifier: String },
}

/// Browser sign-in waiting for its authorization code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthStart {
    pub url: String,
    pub verifier: String,
}

/// Authorization code from a pasted value: either the bare code or the whole
/// redirect URL carrying it as `?code=`.
pub fn extract_auth_code(value: &str) -> String {
    let value = value.trim();
    match url::Url::parse(value) {
        Ok(u) => u
            .query_pairs()
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_else(|| value.to_string()),
        Err(_) => value.to_string(),
    }
}

pub struct AuthHook {
    auth: Arc<dyn AuthProvider>,
    storage: Arc<dyn KeyValueStorage>,
    otp_email_key: String,
    pkce_verifier_key: String,
    auxiliary_keys: Vec<String>,
    ctx: SessionContext,
}

impl AuthHook {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        storage: Arc<dyn KeyValueStorage>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            auth,
            storage,
            otp_email_key: config.otp_email_key(),
            pkce_verifier_key: config.pkce_verifier_key(),
            auxiliary_keys: config.auxiliary_keys(),
            ctx: SessionContext::default(),
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&SessionState) + Send + 'static) {
        self.ctx.subscribe(observer);
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.ctx.user()
    }

    /// Email of the one-time code still waiting for verification, if any.
    pub fn pending_otp_email(&self) -> Option<String> {
        match &self.ctx.state.phase {
            AuthPhase::OtpPending { email } => Some(email.clone()),
            _ => self.storage.get_item(&self.otp_email_key).ok().flatten(),
        }
    }

    pub fn pending_verifier(&self) -> Option<String> {
        self.storage.get_item(&self.pkce_verifier_key).ok().flatten()
    }

    /// True when a logout would clear anything: a session, a pending code
    /// or a browser sign-in in progress.
    pub fn has_local_state(&self) -> bool {
        self.user().is_some()
            || matches!(self.ctx.state.phase, AuthPhase::OtpPending { .. })
            || self
                .auxiliary_keys
                .iter()
                .any(|k| matches!(self.storage.get_item(k), Ok(Some(_))))
    }

    /// Loads the persisted session, refreshing it when expired.
    ///
    /// Runs at startup without toasts.
    pub fn restore(&mut self) {
        match self.auth.current_session() {
            Ok(Some(session)) if session.user.is_authenticated() => {
                tracing::debug!(user = %session.user.id, "session restored");
                self.ctx.set(AuthPhase::Authenticated(session.user), None);
            }
            Ok(_) => {
                let phase = match self.storage.get_item(&self.otp_email_key).ok().flatten() {
                    Some(email) => AuthPhase::OtpPending { email },
                    None => AuthPhase::Anonymous,
                };
                self.ctx.set(phase, None);
            }
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "session restore failed");
                self.ctx
                    .set(AuthPhase::Anonymous, Some(failure_title(&err, "Session unavailable")));
            }
        }
    }

    pub fn login(&mut self, credential: Credential, notifier: &mut dyn Notifier) -> bool {
        notifier.show(Toast::animated("Signing in..."));
        let res = match &credential {
            Credential::Password { email, password } => {
                self.auth.sign_in_with_password(email, password)
            }
            Credential::Otp { email, token } => self.auth.verify_otp(email, token),
            Credential::OAuthCode { code, verifier } => self.auth.exchange_code(code, verifier),
        };
        let res = res.and_then(|s| {
            if s.user.is_authenticated() {
                Ok(s.user)
            } else {
                anyhow::bail!("account is not authenticated (audience {:?})", s.user.aud)
            }
        });

        match res {
            Ok(user) => {
                for key in [&self.otp_email_key, &self.pkce_verifier_key] {
                    if let Err(err) = self.storage.remove_item(key) {
                        tracing::warn!(error = %err, key = %key, "clear sign-in state");
                    }
                }
                let who = user.email.clone().unwrap_or_else(|| user.id.clone());
                self.ctx.set(AuthPhase::Authenticated(user), None);
                notifier.show(Toast::success(format!("Signed in as {}", who)));
                true
            }
            Err(err) => {
                let title = failure_title(&err, "Sign-in failed");
                let phase = match &self.ctx.state.phase {
                    AuthPhase::Authenticated(_) => AuthPhase::Anonymous,
                    other => other.clone(),
                };
                self.ctx.set(phase, Some(title.clone()));
                notifier.show(Toast::failure(title));
                false
            }
        }
    }

    /// Requests a one-time code. Repeating the request for the same email
    /// while the code is outstanding reports success without re-sending.
    pub fn send_otp(&mut self, email: &str, notifier: &mut dyn Notifier) -> bool {
        let email = email.trim();
        if let AuthPhase::OtpPending { email: pending } = &self.ctx.state.phase
            && pending == email
            && self.ctx.state.error.is_none()
        {
            notifier.show(Toast::success(format!("Code already sent to {}", email)));
            return true;
        }

        notifier.show(Toast::animated("Sending code..."));
        let res = self
            .auth
            .send_otp(email)
            .and_then(|()| self.storage.set_item(&self.otp_email_key, email));
        match res {
            Ok(()) => {
                self.ctx.set(
                    AuthPhase::OtpPending {
                        email: email.to_string(),
                    },
                    None,
                );
                notifier.show(Toast::success(format!("Check {} for your code", email)));
                true
            }
            Err(err) => {
                let title = failure_title(&err, "Could not send code");
                let phase = self.ctx.state.phase.clone();
                self.ctx.set(phase, Some(title.clone()));
                notifier.show(Toast::failure(title));
                false
            }
        }
    }

    /// Starts a browser sign-in; the verifier is kept until the code arrives.
    pub fn begin_oauth(&mut self, notifier: &mut dyn Notifier) -> Option<OAuthStart> {
        let res = (|| -> Result<OAuthStart> {
            let pair = PkcePair::generate()?;
            let url = self.auth.authorize_url(&pair.challenge)?;
            self.storage.set_item(&self.pkce_verifier_key, &pair.verifier)?;
            Ok(OAuthStart {
                url,
                verifier: pair.verifier,
            })
        })();
        match res {
            Ok(start) => Some(start),
            Err(err) => {
                let title = failure_title(&err, "Could not start sign-in");
                let phase = self.ctx.state.phase.clone();
                self.ctx.set(phase, Some(title.clone()));
                notifier.show(Toast::failure(title));
                None
            }
        }
    }

    /// Signs out remotely, then drops the local session and sign-in state.
    /// Local state is cleared even when the remote call fails.
    pub fn logout(&mut self, notifier: &mut dyn Notifier) -> bool {
        notifier.show(Toast::animated("Signing out..."));
        let remote = self.auth.sign_out();
        for key in &self.auxiliary_keys {
            if let Err(err) = self.storage.remove_item(key) {
                tracing::warn!(error = %err, key = %key, "clear auxiliary state");
            }
        }
        match remote {
            Ok(()) => {
                self.ctx.set(AuthPhase::Anonymous, None);
                notifier.show(Toast::success("Signed out"));
                true
            }
            Err(err) => {
                let title = failure_title(&err, "Sign-out failed");
                self.ctx.set(AuthPhase::Anonymous, Some(title.clone()));
                notifier.show(Toast::failure(title).with_message("local session cleared"));
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
