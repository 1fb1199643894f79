use time::format_description::well_known::Rfc3339;

use super::*;

pub(super) const SESSION_TTL_SECS: i64 = 3600;
pub(super) const AUTHENTICATED: &str = "authenticated";

pub(super) struct AppState {
    pub(super) anon_key: String,
    pub(super) otp_code: String,
    /// Account signed in by the browser flow.
    pub(super) dev_user_id: String,
    pub(super) db: RwLock<Db>,
    pub(super) identity: RwLock<Identity>,
    pub(super) objects: RwLock<HashMap<String, StoredObject>>,
}

pub(super) struct StoredObject {
    pub(super) content_type: String,
    pub(super) bytes: Bytes,
}

/// Row tables keyed by relation name.
#[derive(Default)]
pub(super) struct Db {
    pub(super) tables: HashMap<String, Vec<Value>>,
    pub(super) next_tag_id: i64,
}

pub(super) const RELATIONS: [&str; 5] = ["particle", "type", "tag", "particle_tag", "profile"];

impl Db {
    pub(super) fn seeded() -> Self {
        let mut db = Db {
            tables: RELATIONS
                .iter()
                .map(|r| (r.to_string(), Vec::new()))
                .collect(),
            next_tag_id: 1,
        };
        let types = [(1, "Link", "🔗"), (2, "Image", "🖼"), (3, "Text", "💬")];
        for (id, name, emoji) in types {
            db.rows_mut("type")
                .push(json!({ "id": id, "name": name, "emoji": emoji }));
        }
        db
    }

    pub(super) fn rows(&self, relation: &str) -> &[Value] {
        self.tables.get(relation).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(super) fn rows_mut(&mut self, relation: &str) -> &mut Vec<Value> {
        self.tables.entry(relation.to_string()).or_default()
    }

    pub(super) fn add_profile(&mut self, user: &DevUser) {
        let username = user.email.split('@').next().unwrap_or_default().to_string();
        self.rows_mut("profile").push(json!({
            "id": user.id,
            "username": username,
            "full_name": Value::Null,
            "avatar_url": Value::Null,
        }));
    }
}

#[derive(Clone, Debug)]
pub(super) struct DevUser {
    pub(super) id: String,
    pub(super) email: String,
    pub(super) password_hash: Option<String>,
}

impl DevUser {
    pub(super) fn to_json(&self) -> Value {
        json!({ "id": self.id, "aud": AUTHENTICATED, "email": self.email })
    }
}

pub(super) struct SessionEntry {
    pub(super) user_id: String,
    pub(super) refresh_hash: String,
    pub(super) expires_at: i64,
}

pub(super) struct PendingCode {
    pub(super) user_id: String,
    pub(super) challenge: String,
}

/// Users plus every outstanding secret, stored by hash only.
#[derive(Default)]
pub(super) struct Identity {
    pub(super) users: HashMap<String, DevUser>,
    /// Access token hash to session.
    pub(super) sessions: HashMap<String, SessionEntry>,
    /// Refresh token hash to user id.
    pub(super) refresh: HashMap<String, String>,
    pub(super) pending_otp: HashSet<String>,
    /// Authorization code hash to its PKCE challenge.
    pub(super) auth_codes: HashMap<String, PendingCode>,
}

impl Identity {
    pub(super) fn user_by_email(&self, email: &str) -> Option<&DevUser> {
        let email = email.trim().to_lowercase();
        self.users.values().find(|u| u.email == email)
    }

    /// Issues a fresh access/refresh pair and returns the session body.
    pub(super) fn issue_session(&mut self, user_id: &str) -> Result<Value> {
        let user = self
            .users
            .get(user_id)
            .cloned()
            .with_context(|| format!("unknown user {}", user_id))?;
        let access = new_secret()?;
        let refresh = new_secret()?;
        let expires_at = now_unix() + SESSION_TTL_SECS;
        let refresh_hash = hash_secret(&refresh);
        self.sessions.insert(
            hash_secret(&access),
            SessionEntry {
                user_id: user.id.clone(),
                refresh_hash: refresh_hash.clone(),
                expires_at,
            },
        );
        self.refresh.insert(refresh_hash, user.id.clone());
        Ok(json!({
            "access_token": access,
            "refresh_token": refresh,
            "token_type": "bearer",
            "expires_in": SESSION_TTL_SECS,
            "expires_at": expires_at,
            "user": user.to_json(),
        }))
    }

    pub(super) fn user_for_access(&self, token: &str) -> Option<&DevUser> {
        let entry = self.sessions.get(&hash_secret(token))?;
        if entry.expires_at <= now_unix() {
            return None;
        }
        self.users.get(&entry.user_id)
    }
}

pub(super) fn hash_secret(secret: &str) -> String {
    blake3::hash(secret.as_bytes()).to_hex().to_string()
}

pub(super) fn new_secret() -> Result<String> {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;
    Ok(hex(&bytes))
}

/// Random id shaped like a UUID v4.
pub(super) fn new_uuid() -> Result<String> {
    let mut b = [0u8; 16];
    getrandom::getrandom(&mut b).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;
    b[6] = (b[6] & 0x0f) | 0x40;
    b[8] = (b[8] & 0x3f) | 0x80;
    let h = hex(&b);
    Ok(format!(
        "{}-{}-{}-{}-{}",
        &h[0..8],
        &h[8..12],
        &h[12..16],
        &h[16..20],
        &h[20..32]
    ))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub(super) fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

pub(super) fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

pub(super) fn has_apikey(state: &AppState, headers: &HeaderMap) -> bool {
    headers
        .get("apikey")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|k| k == state.anon_key)
}

/// `Bearer` credential of a request, if any.
pub(super) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Signed-in user behind the request's bearer, if it is a live session.
pub(super) async fn session_user(state: &AppState, headers: &HeaderMap) -> Option<DevUser> {
    let token = bearer_token(headers)?;
    let identity = state.identity.read().await;
    identity.user_for_access(token).cloned()
}
