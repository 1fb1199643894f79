use super::*;

/// Row/storage error body: `{"message": ...}`.
pub(super) fn api_error(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(json!({ "message": msg.into() }))).into_response()
}

/// Identity error body: `{"error": ..., "error_description": ...}`.
pub(super) fn auth_error(status: StatusCode, code: &str, description: &str) -> Response {
    (
        status,
        Json(json!({ "error": code, "error_description": description })),
    )
        .into_response()
}

pub(super) fn unauthorized() -> Response {
    api_error(StatusCode::UNAUTHORIZED, "JWT expired or missing")
}

pub(super) fn invalid_apikey() -> Response {
    api_error(StatusCode::UNAUTHORIZED, "Invalid API key")
}

pub(super) fn bad_request(msg: impl Into<String>) -> Response {
    api_error(StatusCode::BAD_REQUEST, msg)
}

pub(super) fn not_found(msg: impl Into<String>) -> Response {
    api_error(StatusCode::NOT_FOUND, msg)
}

pub(super) fn conflict(msg: impl Into<String>) -> Response {
    api_error(StatusCode::CONFLICT, msg)
}

pub(super) fn internal_error(err: anyhow::Error) -> Response {
    tracing::error!(error = %format!("{:#}", err), "request failed");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
