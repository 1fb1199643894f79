use std::sync::{Arc, RwLock};

use anyhow::{Context, Result, anyhow};

use crate::backend::{AuthProvider, Backend, Filter, Query};
use crate::model::{AuthSession, ClientConfig};
use crate::store::KeyValueStorage;

mod http_client;

mod types;
pub use self::types::*;
mod auth;
mod pkce;
pub use self::pkce::{PkcePair, challenge_for};
mod rows;
mod storage;

/// Handle to the hosted store: rows, media objects and identity.
pub struct RemoteClient {
    config: ClientConfig,
    storage: Arc<dyn KeyValueStorage>,
    session: RwLock<Option<AuthSession>>,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    /// Builds the client and restores any session persisted under the storage key.
    pub fn new(config: ClientConfig, storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("particle/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build reqwest client")?;

        let restored = match storage.get_item(&config.storage_key)? {
            Some(raw) => match serde_json::from_str::<AuthSession>(&raw) {
                Ok(s) => Some(s),
                Err(err) => {
                    tracing::warn!(error = %err, "dropping unreadable persisted session");
                    storage.remove_item(&config.storage_key)?;
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            config,
            storage,
            session: RwLock::new(restored),
            client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStorage> {
        &self.storage
    }

    /// Session currently held in memory, without refreshing.
    pub fn cached_session(&self) -> Option<AuthSession> {
        self.session.read().ok().and_then(|s| s.clone())
    }

    fn store_session(&self, session: AuthSession) -> Result<AuthSession> {
        let session = session.with_expiry_from(now_unix());
        let raw = serde_json::to_string(&session).context("serialize session")?;
        self.storage.set_item(&self.config.storage_key, &raw)?;
        let mut slot = self
            .session
            .write()
            .map_err(|_| anyhow!("session lock poisoned"))?;
        *slot = Some(session.clone());
        Ok(session)
    }

    fn clear_session(&self) -> Result<()> {
        if let Ok(mut slot) = self.session.write() {
            *slot = None;
        }
        self.storage.remove_item(&self.config.storage_key)
    }
}

fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
