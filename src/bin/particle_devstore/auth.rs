//! `/auth/v1` endpoints.

use particle::remote::challenge_for;

use super::*;

#[derive(serde::Deserialize)]
pub(super) struct TokenParams {
    grant_type: String,
}

#[derive(serde::Deserialize)]
struct PasswordGrant {
    email: String,
    password: String,
}

#[derive(serde::Deserialize)]
struct RefreshGrant {
    refresh_token: String,
}

#[derive(serde::Deserialize)]
struct PkceGrant {
    auth_code: String,
    code_verifier: String,
}

#[derive(serde::Deserialize)]
struct OtpRequest {
    email: String,
    #[serde(default)]
    create_user: bool,
}

#[derive(serde::Deserialize)]
struct VerifyRequest {
    email: String,
    token: String,
}

#[derive(serde::Deserialize)]
pub(super) struct AuthorizeParams {
    redirect_to: String,
    code_challenge: String,
    #[serde(default)]
    code_challenge_method: Option<String>,
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body)
        .map_err(|e| auth_error(StatusCode::BAD_REQUEST, "validation_failed", &e.to_string()))
}

fn invalid_grant(description: &str) -> Response {
    auth_error(StatusCode::BAD_REQUEST, "invalid_grant", description)
}

fn session_response(result: Result<Value>) -> Response {
    match result {
        Ok(session) => Json(session).into_response(),
        Err(err) => internal_error(err),
    }
}

pub(super) async fn token(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TokenParams>,
    body: Bytes,
) -> Response {
    match params.grant_type.as_str() {
        "password" => {
            let grant: PasswordGrant = match parse_body(&body) {
                Ok(g) => g,
                Err(resp) => return resp,
            };
            let mut identity = state.identity.write().await;
            let user_id = match identity.user_by_email(&grant.email) {
                Some(u) if u.password_hash.as_deref() == Some(&hash_secret(&grant.password)) => {
                    u.id.clone()
                }
                _ => return invalid_grant("Invalid login credentials"),
            };
            tracing::info!(user = %user_id, "password sign-in");
            session_response(identity.issue_session(&user_id))
        }
        "refresh_token" => {
            let grant: RefreshGrant = match parse_body(&body) {
                Ok(g) => g,
                Err(resp) => return resp,
            };
            let mut identity = state.identity.write().await;
            let refresh_hash = hash_secret(&grant.refresh_token);
            // Refresh tokens are single use.
            let Some(user_id) = identity.refresh.remove(&refresh_hash) else {
                return invalid_grant("Invalid Refresh Token");
            };
            identity.sessions.retain(|_, s| s.refresh_hash != refresh_hash);
            session_response(identity.issue_session(&user_id))
        }
        "pkce" => {
            let grant: PkceGrant = match parse_body(&body) {
                Ok(g) => g,
                Err(resp) => return resp,
            };
            let mut identity = state.identity.write().await;
            let Some(pending) = identity.auth_codes.remove(&hash_secret(&grant.auth_code)) else {
                return invalid_grant("invalid flow state, no valid flow state found");
            };
            if challenge_for(&grant.code_verifier) != pending.challenge {
                return invalid_grant("code challenge does not match previously saved code verifier");
            }
            session_response(identity.issue_session(&pending.user_id))
        }
        other => auth_error(
            StatusCode::BAD_REQUEST,
            "unsupported_grant_type",
            &format!("unsupported grant_type {}", other),
        ),
    }
}

pub(super) async fn otp(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let req: OtpRequest = match parse_body(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let email = req.email.trim().to_lowercase();
    if !email.contains('@') {
        return auth_error(StatusCode::BAD_REQUEST, "validation_failed", "Unable to validate email address");
    }

    let mut identity = state.identity.write().await;
    if identity.user_by_email(&email).is_none() {
        if !req.create_user {
            return auth_error(StatusCode::BAD_REQUEST, "otp_disabled", "Signups not allowed for otp");
        }
        let user = match new_uuid() {
            Ok(id) => DevUser {
                id,
                email: email.clone(),
                password_hash: None,
            },
            Err(err) => return internal_error(err),
        };
        state.db.write().await.add_profile(&user);
        identity.users.insert(user.id.clone(), user);
    }
    identity.pending_otp.insert(email.clone());
    tracing::info!(%email, "one-time code issued");
    Json(json!({})).into_response()
}

pub(super) async fn verify(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let req: VerifyRequest = match parse_body(&body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let email = req.email.trim().to_lowercase();
    let mut identity = state.identity.write().await;
    if !identity.pending_otp.contains(&email) || req.token.trim() != state.otp_code {
        return auth_error(StatusCode::FORBIDDEN, "otp_expired", "Token has expired or is invalid");
    }
    let Some(user_id) = identity.user_by_email(&email).map(|u| u.id.clone()) else {
        return auth_error(StatusCode::FORBIDDEN, "otp_expired", "Token has expired or is invalid");
    };
    identity.pending_otp.remove(&email);
    session_response(identity.issue_session(&user_id))
}

pub(super) async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return unauthorized();
    };
    let mut identity = state.identity.write().await;
    let Some(entry) = identity.sessions.remove(&hash_secret(token)) else {
        return unauthorized();
    };
    identity.refresh.remove(&entry.refresh_hash);
    tracing::info!(user = %entry.user_id, "signed out");
    StatusCode::NO_CONTENT.into_response()
}

pub(super) async fn user(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match session_user(&state, &headers).await {
        Some(u) => Json(u.to_json()).into_response(),
        None => unauthorized(),
    }
}

/// Stands in for the provider round trip: the seeded user is signed in at once and the browser is sent to `redirect_to?code=...`.
pub(super) async fn authorize(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthorizeParams>,
) -> Response {
    if params
        .code_challenge_method
        .as_deref()
        .is_some_and(|m| !m.eq_ignore_ascii_case("s256"))
    {
        return bad_request("only s256 code challenges are supported");
    }
    let mut redirect = match url::Url::parse(&params.redirect_to) {
        Ok(u) => u,
        Err(e) => return bad_request(format!("invalid redirect_to: {}", e)),
    };

    let code = match new_secret() {
        Ok(c) => c,
        Err(err) => return internal_error(err),
    };
    state.identity.write().await.auth_codes.insert(
        hash_secret(&code),
        PendingCode {
            user_id: state.dev_user_id.clone(),
            challenge: params.code_challenge,
        },
    );
    redirect.query_pairs_mut().append_pair("code", &code);

    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, redirect.to_string())],
    )
        .into_response()
}
