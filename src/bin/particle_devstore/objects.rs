//! Media objects under `/storage/v1/object/*`: `POST {bucket}/{key}` uploads,
//! `GET public/{bucket}/{key}` serves without credentials.

use super::*;

pub(super) async fn upload(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !has_apikey(&state, &headers) {
        return invalid_apikey();
    }
    if session_user(&state, &headers).await.is_none() {
        return unauthorized();
    }
    let Some((bucket, key)) = path.split_once('/').filter(|(b, k)| !b.is_empty() && !k.is_empty())
    else {
        return bad_request("object path must be {bucket}/{key}");
    };
    let upsert = headers
        .get("x-upsert")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let full = format!("{}/{}", bucket, key);
    let mut objects = state.objects.write().await;
    if !upsert && objects.contains_key(&full) {
        return conflict("The resource already exists");
    }
    let size = body.len();
    objects.insert(
        full.clone(),
        StoredObject {
            content_type,
            bytes: body,
        },
    );
    tracing::info!(key = %full, size, "stored object");
    Json(json!({ "Key": full })).into_response()
}

pub(super) async fn fetch_public(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    let Some(full) = path.strip_prefix("public/") else {
        return not_found("Object not found");
    };
    let objects = state.objects.read().await;
    match objects.get(full) {
        Some(obj) => (
            [(header::CONTENT_TYPE, obj.content_type.clone())],
            obj.bytes.clone(),
        )
            .into_response(),
        None => not_found("Object not found"),
    }
}
