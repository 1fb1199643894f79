use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub version: u32,

    /// Backend root, e.g. `https://<project>.supabase.co`.
    pub base_url: String,

    /// Public (anon) API key sent as `apikey` on every request.
    pub anon_key: String,

    /// Object storage namespace for uploaded media.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Key under which the auth session is persisted.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OAuthConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionConfig>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            version: CONFIG_VERSION,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            bucket: default_bucket(),
            storage_key: default_storage_key(),
            oauth: None,
            completion: None,
        }
    }

    /// Key holding the email of an outstanding one-time code.
    pub fn otp_email_key(&self) -> String {
        format!("{}.otp-email", self.storage_key)
    }

    /// Key holding the verifier of an OAuth sign-in started in the browser.
    pub fn pkce_verifier_key(&self) -> String {
        format!("{}.pkce-verifier", self.storage_key)
    }

    /// Keys written alongside the session that sign-out must clear.
    pub fn auxiliary_keys(&self) -> Vec<String> {
        vec![self.otp_email_key(), self.pkce_verifier_key()]
    }
}

fn default_bucket() -> String {
    "media".to_string()
}

fn default_storage_key() -> String {
    "particle".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Where the identity service sends the browser after sign-in.
    pub redirect_to: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<String>,
}

impl OAuthConfig {
    pub fn new(redirect_to: impl Into<String>) -> Self {
        Self {
            provider: default_provider(),
            redirect_to: redirect_to.into(),
            scopes: None,
        }
    }
}

fn default_provider() -> String {
    "google".to_string()
}

/// OpenAI-compatible chat completion endpoint used for auto titles/summaries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub base_url: String,
    pub model: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl CompletionConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_api_key_env() -> String {
    "PARTICLE_COMPLETION_KEY".to_string()
}

/// Backing document of the local key-value storage.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClientState {
    pub version: u32,

    #[serde(default)]
    pub items: std::collections::BTreeMap<String, String>,
}
