use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};

use crate::model::{CONFIG_VERSION, ClientConfig, ClientState};

const STATE_VERSION: u32 = 1;

pub const HOME_ENV: &str = "PARTICLE_HOME";
pub const URL_ENV: &str = "PARTICLE_URL";
pub const ANON_KEY_ENV: &str = "PARTICLE_ANON_KEY";

/// String key-value storage the auth session and auxiliary state persist into.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// On-disk client home: `config.json` plus `state.json` (the key-value items).
pub struct LocalStore {
    root: PathBuf,
    state_lock: Mutex<()>,
}

impl LocalStore {
    /// `$PARTICLE_HOME`, falling back to the platform config directory.
    pub fn default_root() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV) {
            return Ok(PathBuf::from(home));
        }
        let dirs = directories::ProjectDirs::from("", "", "particle")
            .ok_or_else(|| anyhow!("cannot determine a config directory (set {})", HOME_ENV))?;
        Ok(dirs.config_dir().to_path_buf())
    }

    pub fn open_default() -> Result<Self> {
        Self::open(&Self::default_root()?)
    }

    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).with_context(|| format!("create {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
            state_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("particle.log")
    }

    pub fn read_config(&self) -> Result<Option<ClientConfig>> {
        let path = self.root.join("config.json");
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).context("read config.json")?;
        let cfg: ClientConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        if cfg.version != CONFIG_VERSION {
            anyhow::bail!("unsupported config version {}", cfg.version);
        }
        Ok(Some(cfg))
    }

    /// File config with `PARTICLE_URL` / `PARTICLE_ANON_KEY` applied on top.
    pub fn load_config(&self) -> Result<Option<ClientConfig>> {
        let url = std::env::var(URL_ENV).ok().filter(|s| !s.is_empty());
        let key = std::env::var(ANON_KEY_ENV).ok().filter(|s| !s.is_empty());
        let cfg = match (self.read_config()?, url, key) {
            (Some(mut cfg), url, key) => {
                if let Some(url) = url {
                    cfg.base_url = url.trim_end_matches('/').to_string();
                }
                if let Some(key) = key {
                    cfg.anon_key = key;
                }
                Some(cfg)
            }
            (None, Some(url), Some(key)) => Some(ClientConfig::new(url, key)),
            (None, _, _) => None,
        };
        Ok(cfg)
    }

    pub fn write_config(&self, cfg: &ClientConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.root.join("config.json"), &bytes).context("write config.json")?;
        Ok(())
    }

    pub fn read_state(&self) -> Result<ClientState> {
        let path = self.root.join("state.json");
        if !path.exists() {
            return Ok(ClientState {
                version: STATE_VERSION,
                items: BTreeMap::new(),
            });
        }
        let bytes = fs::read(&path).context("read state.json")?;
        let st: ClientState = serde_json::from_slice(&bytes).context("parse state.json")?;
        if st.version != STATE_VERSION {
            anyhow::bail!("unsupported client state version {}", st.version);
        }
        Ok(st)
    }

    pub fn write_state(&self, st: &ClientState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(st).context("serialize state")?;
        write_atomic(&self.root.join("state.json"), &bytes).context("write state.json")?;
        Ok(())
    }

    fn update_state(&self, f: impl FnOnce(&mut ClientState)) -> Result<()> {
        let _guard = self
            .state_lock
            .lock()
            .map_err(|_| anyhow!("state lock poisoned"))?;
        let mut st = self.read_state()?;
        f(&mut st);
        self.write_state(&st)
    }
}

impl KeyValueStorage for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_state()?.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.update_state(|st| {
            st.items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.update_state(|st| {
            st.items.remove(key);
        })
    }
}

/// Process-local storage; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock().map_err(|_| anyhow!("storage lock poisoned"))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().map_err(|_| anyhow!("storage lock poisoned"))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.lock().map_err(|_| anyhow!("storage lock poisoned"))?;
        items.remove(key);
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store/local_store_tests.rs"]
mod tests;
