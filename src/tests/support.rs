//! In-memory stand-ins for the hosted store used by unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use serde_json::{Value, json};

use crate::backend::{AuthProvider, Backend, Filter, Query};
use crate::model::{AUTHENTICATED_AUDIENCE, AuthSession, AuthUser};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Select(String),
    Insert(String),
    Update(String),
    Delete(String),
    Upload(String),
}

#[derive(Default)]
struct Inner {
    tables: BTreeMap<String, Vec<Value>>,
    seq: i64,
    calls: Vec<Call>,
    // (operation label, message): the next matching call fails once.
    fail_once: Vec<(String, String)>,
    // Upload keys containing one of these fragments always fail.
    fail_uploads: Vec<String>,
}

#[derive(Default)]
pub(crate) struct MemoryBackend {
    inner: Mutex<Inner>,
}

fn text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| match f {
        Filter::Eq { column, value } => row.get(column).map(text).as_deref() == Some(value),
    })
}

impl MemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the three type rows.
    pub(crate) fn with_types() -> Self {
        let b = Self::new();
        b.seed(
            "type",
            vec![
                json!({"id": 3, "name": "Text", "emoji": "💬"}),
                json!({"id": 1, "name": "Link", "emoji": "🔗"}),
                json!({"id": 2, "name": "Image", "emoji": "🖼"}),
            ],
        );
        b
    }

    pub(crate) fn seed(&self, relation: &str, rows: Vec<Value>) {
        let mut inner = self.inner.lock().unwrap();
        inner.tables.entry(relation.to_string()).or_default().extend(rows);
    }

    pub(crate) fn rows(&self, relation: &str) -> Vec<Value> {
        let inner = self.inner.lock().unwrap();
        inner.tables.get(relation).cloned().unwrap_or_default()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    /// Next `op` ("insert:particle", "update:particle", ...) fails with `message`.
    pub(crate) fn fail_once(&self, op: &str, message: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_once.push((op.to_string(), message.to_string()));
    }

    pub(crate) fn fail_uploads_containing(&self, fragment: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_uploads.push(fragment.to_string());
    }

    fn check_fail(inner: &mut Inner, op: &str) -> Result<()> {
        if let Some(pos) = inner.fail_once.iter().position(|(o, _)| o == op) {
            let (_, msg) = inner.fail_once.remove(pos);
            return Err(anyhow!(msg));
        }
        Ok(())
    }

    fn next_ts(inner: &mut Inner) -> String {
        inner.seq += 1;
        format!("2026-01-01T00:{:02}:{:02}Z", inner.seq / 60, inner.seq % 60)
    }
}

impl Backend for MemoryBackend {
    fn select_rows(&self, query: &Query) -> Result<Vec<Value>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Select(query.relation.clone()));
        Self::check_fail(&mut inner, &format!("select:{}", query.relation))?;

        let mut rows: Vec<Value> = inner
            .tables
            .get(&query.relation)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|r| matches(r, &query.filters))
            .collect();

        if let Some(o) = &query.order {
            rows.sort_by(|a, b| {
                let ord = match (a.get(&o.column), b.get(&o.column)) {
                    (Some(Value::Number(x)), Some(Value::Number(y))) => x
                        .as_f64()
                        .partial_cmp(&y.as_f64())
                        .unwrap_or(std::cmp::Ordering::Equal),
                    (x, y) => x.map(text).cmp(&y.map(text)),
                };
                if o.ascending { ord } else { ord.reverse() }
            });
        }

        if query.relation == "particle" && query.select.contains("tag(") {
            let links = inner.tables.get("particle_tag").cloned().unwrap_or_default();
            let tags = inner.tables.get("tag").cloned().unwrap_or_default();
            for row in rows.iter_mut() {
                let pid = row.get("id").map(text);
                let embedded: Vec<Value> = links
                    .iter()
                    .filter(|l| l.get("particle_id").map(text) == pid)
                    .filter_map(|l| {
                        let tid = l.get("tag_id").map(text);
                        tags.iter().find(|t| t.get("id").map(text) == tid).cloned()
                    })
                    .collect();
                row["tag"] = Value::Array(embedded);
            }
        }
        Ok(rows)
    }

    fn insert_row(&self, relation: &str, row: &Value) -> Result<Value> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Insert(relation.to_string()));
        Self::check_fail(&mut inner, &format!("insert:{}", relation))?;

        let mut row = row.clone();
        let ts = Self::next_ts(&mut inner);
        let seq = inner.seq;
        match relation {
            "particle" => {
                row["id"] = json!(format!("p-{}", seq));
                for flag in ["is_public", "is_archived", "is_trashed"] {
                    if row.get(flag).is_none() {
                        row[flag] = json!(false);
                    }
                }
                row["created_at"] = json!(ts.clone());
                row["updated_at"] = json!(ts);
            }
            "tag" => {
                row["id"] = json!(seq);
            }
            "particle_tag" => {
                let dup = inner.tables.get(relation).is_some_and(|rows| {
                    rows.iter().any(|r| {
                        r.get("particle_id") == row.get("particle_id")
                            && r.get("tag_id") == row.get("tag_id")
                    })
                });
                if dup {
                    anyhow::bail!("duplicate key value violates unique constraint");
                }
            }
            _ => {}
        }
        inner
            .tables
            .entry(relation.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    fn update_rows(&self, relation: &str, filters: &[Filter], patch: &Value) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Update(relation.to_string()));
        Self::check_fail(&mut inner, &format!("update:{}", relation))?;

        let ts = Self::next_ts(&mut inner);
        if let Some(rows) = inner.tables.get_mut(relation) {
            for row in rows.iter_mut().filter(|r| matches(r, filters)) {
                if let (Some(obj), Some(p)) = (row.as_object_mut(), patch.as_object()) {
                    for (k, v) in p {
                        obj.insert(k.clone(), v.clone());
                    }
                    if relation == "particle" {
                        obj.insert("updated_at".to_string(), json!(ts.clone()));
                    }
                }
            }
        }
        Ok(())
    }

    fn delete_rows(&self, relation: &str, filters: &[Filter]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Delete(relation.to_string()));
        Self::check_fail(&mut inner, &format!("delete:{}", relation))?;

        if let Some(rows) = inner.tables.get_mut(relation) {
            rows.retain(|r| !matches(r, filters));
        }
        Ok(())
    }

    fn upload_media(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Upload(key.to_string()));
        if inner.fail_uploads.iter().any(|f| key.contains(f.as_str())) {
            anyhow::bail!("storage unavailable");
        }
        Self::check_fail(&mut inner, "upload")?;
        inner.tables.entry("__objects".to_string()).or_default().push(json!({
            "key": key,
            "size": bytes.len(),
            "content_type": content_type,
        }));
        Ok(key.to_string())
    }

    fn media_url(&self, key: &str) -> String {
        format!("http://store.test/storage/v1/object/public/media/{}", key)
    }
}

pub(crate) fn test_user() -> AuthUser {
    AuthUser {
        id: "user-1".to_string(),
        aud: AUTHENTICATED_AUDIENCE.to_string(),
        email: Some("me@example.com".to_string()),
    }
}

pub(crate) fn test_session() -> AuthSession {
    AuthSession {
        access_token: "access".to_string(),
        refresh_token: Some("refresh".to_string()),
        token_type: "bearer".to_string(),
        expires_in: Some(3600),
        expires_at: None,
        user: test_user(),
    }
}

/// Identity service accepting one password and one one-time code.
pub(crate) struct FakeAuth {
    pub(crate) password: String,
    pub(crate) otp_code: String,
    pub(crate) fail_sign_out: bool,
    session: Mutex<Option<AuthSession>>,
    otp_sent: Mutex<Vec<String>>,
}

impl FakeAuth {
    pub(crate) fn new() -> Self {
        Self {
            password: "hunter2".to_string(),
            otp_code: "123456".to_string(),
            fail_sign_out: false,
            session: Mutex::new(None),
            otp_sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn signed_in() -> Self {
        let f = Self::new();
        *f.session.lock().unwrap() = Some(test_session());
        f
    }

    pub(crate) fn otp_sends(&self) -> Vec<String> {
        self.otp_sent.lock().unwrap().clone()
    }

    fn issue(&self) -> AuthSession {
        let s = test_session();
        *self.session.lock().unwrap() = Some(s.clone());
        s
    }
}

impl AuthProvider for FakeAuth {
    fn sign_in_with_password(&self, _email: &str, password: &str) -> Result<AuthSession> {
        if password != self.password {
            anyhow::bail!("Invalid login credentials");
        }
        Ok(self.issue())
    }

    fn send_otp(&self, email: &str) -> Result<()> {
        if !email.contains('@') {
            anyhow::bail!("Unable to validate email address: invalid format");
        }
        self.otp_sent.lock().unwrap().push(email.to_string());
        Ok(())
    }

    fn verify_otp(&self, _email: &str, token: &str) -> Result<AuthSession> {
        if token != self.otp_code {
            anyhow::bail!("Token has expired or is invalid");
        }
        Ok(self.issue())
    }

    fn exchange_code(&self, code: &str, verifier: &str) -> Result<AuthSession> {
        if code.is_empty() || verifier.is_empty() {
            anyhow::bail!("invalid flow state");
        }
        Ok(self.issue())
    }

    fn sign_out(&self) -> Result<()> {
        *self.session.lock().unwrap() = None;
        if self.fail_sign_out {
            anyhow::bail!("network down");
        }
        Ok(())
    }

    fn current_session(&self) -> Result<Option<AuthSession>> {
        Ok(self.session.lock().unwrap().clone())
    }

    fn authorize_url(&self, challenge: &str) -> Result<String> {
        Ok(format!(
            "http://store.test/auth/v1/authorize?code_challenge={}",
            challenge
        ))
    }
}
