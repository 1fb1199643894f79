//! `/rest/v1/{relation}`: `eq` filters, `order`, and `tag(*)` embedding on
//! particles. Reads need only the API key; writes need a live session.

use std::cmp::Ordering;

use super::*;

#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct RestParams {
    pub(super) select: String,
    pub(super) filters: Vec<(String, String)>,
    pub(super) order: Option<(String, bool)>,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum RowError {
    BadRequest(String),
    Forbidden(String),
    Conflict(String),
}

impl IntoResponse for RowError {
    fn into_response(self) -> Response {
        match self {
            RowError::BadRequest(m) => bad_request(m),
            RowError::Forbidden(m) => api_error(StatusCode::FORBIDDEN, m),
            RowError::Conflict(m) => conflict(m),
        }
    }
}

pub(super) fn parse_params(pairs: &[(String, String)]) -> Result<RestParams, RowError> {
    let mut out = RestParams {
        select: "*".to_string(),
        ..RestParams::default()
    };
    for (key, value) in pairs {
        match key.as_str() {
            "select" => out.select = value.clone(),
            "order" => {
                let (column, dir) = value.split_once('.').unwrap_or((value.as_str(), "asc"));
                let ascending = match dir {
                    "asc" => true,
                    "desc" => false,
                    other => {
                        return Err(RowError::BadRequest(format!("unknown order direction {}", other)));
                    }
                };
                out.order = Some((column.to_string(), ascending));
            }
            column => {
                let Some(v) = value.strip_prefix("eq.") else {
                    return Err(RowError::BadRequest(format!(
                        "unsupported filter {}={} (only eq is served)",
                        column, value
                    )));
                };
                out.filters.push((column.to_string(), v.to_string()));
            }
        }
    }
    Ok(out)
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

pub(super) fn matches_filters(row: &Value, filters: &[(String, String)]) -> bool {
    filters
        .iter()
        .all(|(column, want)| value_text(row.get(column).unwrap_or(&Value::Null)) == *want)
}

fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or_default()
            .partial_cmp(&y.as_f64().unwrap_or_default())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => value_text(a).cmp(&value_text(b)),
    }
}

pub(super) fn sort_rows(rows: &mut [Value], column: &str, ascending: bool) {
    rows.sort_by(|a, b| {
        let ord = cmp_values(
            a.get(column).unwrap_or(&Value::Null),
            b.get(column).unwrap_or(&Value::Null),
        );
        if ascending { ord } else { ord.reverse() }
    });
}

fn embeds_tags(relation: &str, select: &str) -> bool {
    relation == "particle" && select.split(',').any(|c| c.trim().starts_with("tag("))
}

/// Attaches each particle's tags under `tag`, through `particle_tag`.
pub(super) fn embed_tags(db: &Db, rows: &mut [Value]) {
    for row in rows.iter_mut() {
        let id = row.get("id").map(value_text).unwrap_or_default();
        let tags: Vec<Value> = db
            .rows("particle_tag")
            .iter()
            .filter(|j| j.get("particle_id").map(value_text).as_deref() == Some(id.as_str()))
            .filter_map(|j| {
                let tag_id = j.get("tag_id")?;
                db.rows("tag")
                    .iter()
                    .find(|t| t.get("id") == Some(tag_id))
                    .cloned()
            })
            .collect();
        if let Some(obj) = row.as_object_mut() {
            obj.insert("tag".to_string(), Value::Array(tags));
        }
    }
}

pub(super) fn select_rows(db: &Db, relation: &str, params: &RestParams) -> Vec<Value> {
    let mut rows: Vec<Value> = db
        .rows(relation)
        .iter()
        .filter(|r| matches_filters(r, &params.filters))
        .cloned()
        .collect();
    if let Some((column, ascending)) = &params.order {
        sort_rows(&mut rows, column, *ascending);
    }
    if embeds_tags(relation, &params.select) {
        embed_tags(db, &mut rows);
    }
    rows
}

fn str_field<'a>(row: &'a Value, column: &str) -> Result<&'a str, RowError> {
    row.get(column)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            RowError::BadRequest(format!(
                "null value in column \"{}\" violates not-null constraint",
                column
            ))
        })
}

fn exists(db: &Db, relation: &str, id: &Value) -> bool {
    db.rows(relation).iter().any(|r| r.get("id") == Some(id))
}

fn fk_violation(relation: &str, column: &str) -> RowError {
    RowError::Conflict(format!(
        "insert or update on table \"{}\" violates foreign key constraint \"{}_{}_fkey\"",
        relation, relation, column
    ))
}

/// Fills generated columns and checks constraints for one new row.
fn prepare_row(db: &mut Db, relation: &str, row: Value) -> Result<Value, RowError> {
    let Value::Object(mut obj) = row else {
        return Err(RowError::BadRequest("row must be a JSON object".to_string()));
    };
    let now = now_ts();
    match relation {
        "particle" => {
            let probe = Value::Object(obj.clone());
            str_field(&probe, "content")?;
            str_field(&probe, "user_id")?;
            let type_id = obj.get("type").cloned().unwrap_or(Value::Null);
            if !exists(db, "type", &type_id) {
                return Err(fk_violation("particle", "type"));
            }
            let id = new_uuid().map_err(|e| RowError::BadRequest(e.to_string()))?;
            obj.insert("id".to_string(), json!(id));
            for flag in ["is_public", "is_archived", "is_trashed"] {
                obj.entry(flag).or_insert(json!(false));
            }
            for column in ["title", "description"] {
                obj.entry(column).or_insert(Value::Null);
            }
            obj.insert("created_at".to_string(), json!(now));
            obj.insert("updated_at".to_string(), json!(now));
        }
        "tag" => {
            let probe = Value::Object(obj.clone());
            let name = str_field(&probe, "name")?.to_string();
            let user_id = str_field(&probe, "user_id")?.to_string();
            let taken = db.rows("tag").iter().any(|t| {
                t.get("user_id").and_then(Value::as_str) == Some(user_id.as_str())
                    && t.get("name").and_then(Value::as_str) == Some(name.as_str())
            });
            if taken {
                return Err(RowError::Conflict(
                    "duplicate key value violates unique constraint \"tag_user_id_name_key\""
                        .to_string(),
                ));
            }
            obj.insert("id".to_string(), json!(db.next_tag_id));
            db.next_tag_id += 1;
            obj.entry("color").or_insert(Value::Null);
            obj.insert("created_at".to_string(), json!(now));
        }
        "particle_tag" => {
            let particle_id = obj.get("particle_id").cloned().unwrap_or(Value::Null);
            let tag_id = obj.get("tag_id").cloned().unwrap_or(Value::Null);
            if !exists(db, "particle", &particle_id) {
                return Err(fk_violation("particle_tag", "particle_id"));
            }
            if !exists(db, "tag", &tag_id) {
                return Err(fk_violation("particle_tag", "tag_id"));
            }
            let dup = db.rows("particle_tag").iter().any(|j| {
                j.get("particle_id") == Some(&particle_id) && j.get("tag_id") == Some(&tag_id)
            });
            if dup {
                return Err(RowError::Conflict(
                    "duplicate key value violates unique constraint \"particle_tag_pkey\""
                        .to_string(),
                ));
            }
        }
        "type" => {
            return Err(RowError::Forbidden("permission denied for table type".to_string()));
        }
        _ => {}
    }
    Ok(Value::Object(obj))
}

/// Inserts one row or an array of rows; all or nothing.
pub(super) fn insert_rows(db: &mut Db, relation: &str, body: Value) -> Result<Vec<Value>, RowError> {
    let rows = match body {
        Value::Array(rows) => rows,
        row => vec![row],
    };
    let next_tag_id = db.next_tag_id;
    let mut prepared = Vec::with_capacity(rows.len());
    for row in rows {
        match prepare_row(db, relation, row) {
            Ok(r) => prepared.push(r),
            Err(err) => {
                db.next_tag_id = next_tag_id;
                return Err(err);
            }
        }
    }
    db.rows_mut(relation).extend(prepared.iter().cloned());
    Ok(prepared)
}

pub(super) fn update_rows(
    db: &mut Db,
    relation: &str,
    filters: &[(String, String)],
    patch: Value,
) -> Result<usize, RowError> {
    if relation == "type" {
        return Err(RowError::Forbidden("permission denied for table type".to_string()));
    }
    if filters.is_empty() {
        return Err(RowError::BadRequest("UPDATE requires a WHERE clause".to_string()));
    }
    let Value::Object(patch) = patch else {
        return Err(RowError::BadRequest("patch must be a JSON object".to_string()));
    };
    if patch.contains_key("id") {
        return Err(RowError::BadRequest("column \"id\" can only be updated to DEFAULT".to_string()));
    }
    let now = now_ts();
    let mut n = 0;
    for row in db.rows_mut(relation).iter_mut() {
        if !matches_filters(row, filters) {
            continue;
        }
        if let Some(obj) = row.as_object_mut() {
            for (k, v) in &patch {
                obj.insert(k.clone(), v.clone());
            }
            if relation == "particle" {
                obj.insert("updated_at".to_string(), json!(now));
            }
            n += 1;
        }
    }
    Ok(n)
}

/// Deletes matching rows; join rows of deleted particles and tags go too.
pub(super) fn delete_rows(
    db: &mut Db,
    relation: &str,
    filters: &[(String, String)],
) -> Result<usize, RowError> {
    if relation == "type" {
        return Err(RowError::Forbidden("permission denied for table type".to_string()));
    }
    if filters.is_empty() {
        return Err(RowError::BadRequest("DELETE requires a WHERE clause".to_string()));
    }
    let (gone, kept): (Vec<Value>, Vec<Value>) = std::mem::take(db.rows_mut(relation))
        .into_iter()
        .partition(|r| matches_filters(r, filters));
    *db.rows_mut(relation) = kept;

    let join_column = match relation {
        "particle" => Some("particle_id"),
        "tag" => Some("tag_id"),
        _ => None,
    };
    if let Some(column) = join_column {
        let ids: Vec<&Value> = gone.iter().filter_map(|r| r.get("id")).collect();
        db.rows_mut("particle_tag")
            .retain(|j| !j.get(column).is_some_and(|v| ids.contains(&v)));
    }
    Ok(gone.len())
}

fn known_relation(relation: &str) -> Result<(), Response> {
    if RELATIONS.contains(&relation) {
        Ok(())
    } else {
        Err(not_found(format!("relation \"public.{}\" does not exist", relation)))
    }
}

fn parse_json(body: &Bytes) -> Result<Value, Response> {
    serde_json::from_slice(body).map_err(|e| bad_request(format!("invalid JSON body: {}", e)))
}

pub(super) async fn get_rows(
    State(state): State<Arc<AppState>>,
    Path(relation): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    if let Err(resp) = known_relation(&relation) {
        return resp;
    }
    let params = match parse_params(&pairs) {
        Ok(p) => p,
        Err(err) => return err.into_response(),
    };
    let db = state.db.read().await;
    Json(select_rows(&db, &relation, &params)).into_response()
}

pub(super) async fn post_rows(
    State(state): State<Arc<AppState>>,
    Path(relation): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = known_relation(&relation) {
        return resp;
    }
    if session_user(&state, &headers).await.is_none() {
        return unauthorized();
    }
    let body = match parse_json(&body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let mut db = state.db.write().await;
    match insert_rows(&mut db, &relation, body) {
        Ok(rows) => {
            tracing::info!(%relation, rows = rows.len(), "inserted");
            (StatusCode::CREATED, Json(rows)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(super) async fn patch_rows(
    State(state): State<Arc<AppState>>,
    Path(relation): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = known_relation(&relation) {
        return resp;
    }
    if session_user(&state, &headers).await.is_none() {
        return unauthorized();
    }
    let params = match parse_params(&pairs) {
        Ok(p) => p,
        Err(err) => return err.into_response(),
    };
    let patch = match parse_json(&body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let mut db = state.db.write().await;
    match update_rows(&mut db, &relation, &params.filters, patch) {
        Ok(n) => {
            tracing::info!(%relation, rows = n, "updated");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(super) async fn delete_rows_handler(
    State(state): State<Arc<AppState>>,
    Path(relation): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = known_relation(&relation) {
        return resp;
    }
    if session_user(&state, &headers).await.is_none() {
        return unauthorized();
    }
    let params = match parse_params(&pairs) {
        Ok(p) => p,
        Err(err) => return err.into_response(),
    };
    let mut db = state.db.write().await;
    match delete_rows(&mut db, &relation, &params.filters) {
        Ok(n) => {
            tracing::info!(%relation, rows = n, "deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
#[path = "../../tests/bin/particle_devstore/rest_tests.rs"]
mod tests;
