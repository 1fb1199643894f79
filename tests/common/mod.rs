use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use particle::model::ClientConfig;
use particle::remote::RemoteClient;
use particle::store::{KeyValueStorage, MemoryStorage};

pub const ANON_KEY: &str = "test-anon-key";
pub const EMAIL: &str = "dev@particle.test";
pub const PASSWORD: &str = "correct horse";
pub const OTP_CODE: &str = "424242";

pub struct DevstoreGuard {
    pub base_url: String,
    _dir: tempfile::TempDir,
    child: Child,
}

impl Drop for DevstoreGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl DevstoreGuard {
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url, ANON_KEY)
    }

    /// A client over fresh in-memory storage.
    #[allow(dead_code)]
    pub fn client(&self) -> Result<(RemoteClient, Arc<MemoryStorage>)> {
        let storage = Arc::new(MemoryStorage::new());
        let dyn_storage: Arc<dyn KeyValueStorage> = storage.clone();
        Ok((RemoteClient::new(self.config(), dyn_storage)?, storage))
    }
}

pub fn spawn_devstore() -> Result<DevstoreGuard> {
    let dir = tempfile::tempdir().context("create devstore tempdir")?;
    let addr_file = dir.path().join("addr.txt");

    let child = Command::new(env!("CARGO_BIN_EXE_particle-devstore"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--anon-key",
            ANON_KEY,
            "--email",
            EMAIL,
            "--password",
            PASSWORD,
            "--otp-code",
            OTP_CODE,
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn particle-devstore")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(DevstoreGuard {
        base_url,
        _dir: dir,
        child,
    })
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("devstore did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

/// Runs the `particle` binary against an isolated home.
#[allow(dead_code)]
pub fn run_particle(home: &Path, args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_particle"))
        .args(args)
        .env("PARTICLE_HOME", home)
        .env_remove("PARTICLE_URL")
        .env_remove("PARTICLE_ANON_KEY")
        .env_remove("PARTICLE_LOG")
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("run particle {:?}", args))
}

/// Like `run_particle`, but fails unless the command succeeded; returns stdout.
#[allow(dead_code)]
pub fn particle_ok(home: &Path, args: &[&str]) -> Result<String> {
    let out = run_particle(home, args)?;
    if !out.status.success() {
        anyhow::bail!(
            "particle {:?} failed (status {:?})\nstdout:\n{}\nstderr:\n{}",
            args,
            out.status,
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&out.stdout).to_string())
}
