//! Identity endpoints under `/auth/v1`.

use super::*;

impl RemoteClient {
    fn auth_request(&self, method: reqwest::Method, path: &str) -> reqwest::blocking::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("apikey", &self.config.anon_key)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.config.anon_key),
            )
    }

    fn token_grant(&self, grant_type: &str, body: &impl serde::Serialize) -> Result<AuthSession> {
        let label = format!("{} sign-in", grant_type.replace('_', " "));
        let resp = self
            .auth_request(reqwest::Method::POST, "/auth/v1/token")
            .query(&[("grant_type", grant_type)])
            .json(body)
            .send()
            .with_context(|| label.clone())?;
        let session: AuthSession = self
            .ensure_ok(resp, &label)?
            .json()
            .context("parse session")?;
        self.store_session(session)
    }

    fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession> {
        self.token_grant("refresh_token", &RefreshGrant { refresh_token })
    }
}

impl AuthProvider for RemoteClient {
    fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let session = self.token_grant("password", &PasswordGrant { email, password })?;
        tracing::info!(user = %session.user.id, "signed in with password");
        Ok(session)
    }

    fn send_otp(&self, email: &str) -> Result<()> {
        let resp = self
            .auth_request(reqwest::Method::POST, "/auth/v1/otp")
            .json(&OtpRequest {
                email,
                create_user: true,
            })
            .send()
            .context("request one-time code")?;
        self.ensure_ok(resp, "request one-time code")?;
        Ok(())
    }

    fn verify_otp(&self, email: &str, token: &str) -> Result<AuthSession> {
        let resp = self
            .auth_request(reqwest::Method::POST, "/auth/v1/verify")
            .json(&VerifyRequest {
                kind: "email",
                email,
                token,
            })
            .send()
            .context("verify one-time code")?;
        let session: AuthSession = self
            .ensure_ok(resp, "verify one-time code")?
            .json()
            .context("parse session")?;
        let session = self.store_session(session)?;
        tracing::info!(user = %session.user.id, "signed in with one-time code");
        Ok(session)
    }

    fn exchange_code(&self, code: &str, verifier: &str) -> Result<AuthSession> {
        let session = self.token_grant(
            "pkce",
            &PkceGrant {
                auth_code: code,
                code_verifier: verifier,
            },
        )?;
        tracing::info!(user = %session.user.id, "signed in with authorization code");
        Ok(session)
    }

    fn sign_out(&self) -> Result<()> {
        let Some(session) = self.cached_session() else {
            return self.clear_session();
        };
        let res = self
            .auth_request(reqwest::Method::POST, "/auth/v1/logout")
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", session.access_token),
            )
            .send()
            .context("sign out")
            .and_then(|resp| self.ensure_ok(resp, "sign out").map(|_| ()));
        self.clear_session()?;
        res
    }

    fn current_session(&self) -> Result<Option<AuthSession>> {
        let Some(session) = self.cached_session() else {
            return Ok(None);
        };
        if !session.is_expired_at(now_unix()) {
            return Ok(Some(session));
        }
        let Some(refresh) = session.refresh_token.as_deref() else {
            self.clear_session()?;
            return Ok(None);
        };
        match self.refresh_session(refresh) {
            Ok(s) => Ok(Some(s)),
            Err(err) => {
                tracing::warn!(error = %err, "session refresh failed; signing out locally");
                self.clear_session()?;
                Ok(None)
            }
        }
    }

    fn authorize_url(&self, challenge: &str) -> Result<String> {
        let oauth = self
            .config
            .oauth
            .as_ref()
            .context("OAuth is not configured (run `particle config set --oauth-redirect ...`)")?;
        let mut url = url::Url::parse(&self.url("/auth/v1/authorize")).context("parse base url")?;
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("provider", &oauth.provider);
            q.append_pair("redirect_to", &oauth.redirect_to);
            q.append_pair("code_challenge", challenge);
            q.append_pair("code_challenge_method", "s256");
            if let Some(scopes) = &oauth.scopes {
                q.append_pair("scopes", scopes);
            }
        }
        Ok(url.to_string())
    }
}
