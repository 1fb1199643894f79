use std::path::Path;

use anyhow::{Result, anyhow};

use crate::backend::Backend;
use crate::model::ParticleKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Link,
    Image,
    Bubble,
    Document,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Link => "🔗",
            Icon::Image => "🖼",
            Icon::Bubble => "💬",
            Icon::Document => "📄",
        }
    }
}

pub fn type_icon(type_id: i64) -> Icon {
    match ParticleKind::from_id(type_id) {
        Some(ParticleKind::Link) => Icon::Link,
        Some(ParticleKind::Image) => Icon::Image,
        Some(ParticleKind::Text) => Icon::Bubble,
        None => Icon::Document,
    }
}

/// True only for absolute `http`/`https` URLs.
pub fn is_url(s: &str) -> bool {
    match url::Url::parse(s.trim()) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.has_host(),
        Err(_) => false,
    }
}

/// Collapses every whitespace run to one space and trims the ends.
pub fn sanitize_completion(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow!("getrandom: {:?}", e))?;
    Ok(bytes)
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// Random `#rrggbb` display color for a new tag.
pub fn random_color() -> Result<String> {
    Ok(format!("#{}", hex(&random_bytes::<3>()?)))
}

/// `<20 hex chars>_<unix millis><ext>`, `ext` including its dot (or empty).
pub fn random_filename(ext: &str) -> Result<String> {
    let millis = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    Ok(format!("{}_{}{}", hex(&random_bytes::<10>()?), millis, ext))
}

/// Lowercased extension of `path` with its leading dot, or empty.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original file name, used as the particle title.
    pub title: String,
    /// Object key inside the media namespace.
    pub key: String,
}

/// Uploads a local file under `{user_id}/{random name}`.
///
/// `None` when the extension has no known content type, the path is not a
/// regular file, or the read or upload fails. The cause is logged only.
pub fn upload_file(backend: &dyn Backend, user_id: &str, path: &Path) -> Option<UploadedFile> {
    match try_upload_file(backend, user_id, path) {
        Ok(out) => Some(out),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %format!("{:#}", err), "upload skipped");
            None
        }
    }
}

fn try_upload_file(backend: &dyn Backend, user_id: &str, path: &Path) -> Result<UploadedFile> {
    let ext = dotted_extension(path);
    let content_type = mime_guess::from_ext(ext.trim_start_matches('.'))
        .first()
        .ok_or_else(|| anyhow!("unsupported file type {:?}", ext))?;
    let meta = std::fs::metadata(path).map_err(|e| anyhow!("stat: {}", e))?;
    if !meta.is_file() {
        anyhow::bail!("not a regular file");
    }
    let bytes = std::fs::read(path).map_err(|e| anyhow!("read: {}", e))?;

    let key = format!("{}/{}", user_id, random_filename(&ext)?);
    let stored = backend.upload_media(&key, bytes, content_type.essence_str())?;
    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| stored.clone());
    Ok(UploadedFile { title, key: stored })
}

#[cfg(test)]
#[path = "tests/utils_tests.rs"]
mod tests;
