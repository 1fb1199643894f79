use serde::{Deserialize, Serialize};

pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub aud: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthUser {
    pub fn is_authenticated(&self) -> bool {
        self.aud == AUTHENTICATED_AUDIENCE
    }
}

/// Backend-issued credentials, persisted under the configured storage key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl AuthSession {
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now_unix)
    }

    /// Fills `expires_at` from `expires_in` when the backend only sent the latter.
    pub fn with_expiry_from(mut self, now_unix: i64) -> Self {
        if self.expires_at.is_none()
            && let Some(secs) = self.expires_in
        {
            self.expires_at = Some(now_unix + secs);
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}
