//! Wiring shared by the CLI and the TUI: local home, config, remote client.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::backend::AuthProvider;
use crate::completion::{Completer, HttpCompleter};
use crate::model::ClientConfig;
use crate::remote::RemoteClient;
use crate::session::AuthHook;
use crate::store::{KeyValueStorage, LocalStore};

pub const NOT_CONFIGURED: &str =
    "no backend configured (run `particle config set --url ... --anon-key ...`)";

pub struct ClientContext {
    pub store: Arc<LocalStore>,
    pub config: ClientConfig,
    pub client: Arc<RemoteClient>,
    completer: Option<HttpCompleter>,
}

impl ClientContext {
    pub fn open_default() -> Result<Self> {
        Self::open(Arc::new(LocalStore::open_default()?))
    }

    pub fn open(store: Arc<LocalStore>) -> Result<Self> {
        let config = store.load_config()?.context(NOT_CONFIGURED)?;
        let storage: Arc<dyn KeyValueStorage> = store.clone();
        let client = Arc::new(RemoteClient::new(config.clone(), storage)?);
        let completer = config
            .completion
            .clone()
            .map(HttpCompleter::new)
            .transpose()?;
        Ok(Self {
            store,
            config,
            client,
            completer,
        })
    }

    pub fn completer(&self) -> Option<&dyn Completer> {
        self.completer.as_ref().map(|c| c as &dyn Completer)
    }

    /// Auth hook over this client with the persisted session restored.
    pub fn auth_hook(&self) -> AuthHook {
        let auth: Arc<dyn AuthProvider> = self.client.clone();
        let storage: Arc<dyn KeyValueStorage> = self.store.clone();
        let mut hook = AuthHook::new(auth, storage, &self.config);
        hook.restore();
        hook
    }
}
