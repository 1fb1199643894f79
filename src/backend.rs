//! Seams between the flows and the hosted store.
//!
//! `RemoteClient` implements both traits over HTTP. Hooks, actions and the
//! create/spawn flows only ever see `&dyn Backend` / `&dyn AuthProvider`.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::model::AuthSession;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    Eq { column: String, value: String },
}

impl Filter {
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Filter::Eq {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub fn to_pair(&self) -> (String, String) {
        match self {
            Filter::Eq { column, value } => (column.clone(), format!("eq.{}", value)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A read against one relation: projection, equality filters and ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub relation: String,
    pub select: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
}

impl Query {
    pub fn from(relation: &str) -> Self {
        Self {
            relation: relation.to_string(),
            select: "*".to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    /// PostgREST query-string pairs, in a stable order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = vec![("select".to_string(), self.select.clone())];
        out.extend(self.filters.iter().map(Filter::to_pair));
        if let Some(o) = &self.order {
            let dir = if o.ascending { "asc" } else { "desc" };
            out.push(("order".to_string(), format!("{}.{}", o.column, dir)));
        }
        out
    }
}

/// Row and object operations against the hosted store.
pub trait Backend: Send + Sync {
    fn select_rows(&self, query: &Query) -> Result<Vec<serde_json::Value>>;

    /// Inserts one row and returns it as stored (ids and defaults filled in).
    fn insert_row(&self, relation: &str, row: &serde_json::Value) -> Result<serde_json::Value>;

    fn update_rows(&self, relation: &str, filters: &[Filter], patch: &serde_json::Value)
    -> Result<()>;

    fn delete_rows(&self, relation: &str, filters: &[Filter]) -> Result<()>;

    /// Uploads bytes into the media namespace; returns the stored object key.
    fn upload_media(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;

    /// Public URL of a media object. Derived locally, no request.
    fn media_url(&self, key: &str) -> String;
}

/// Identity operations against the hosted store.
pub trait AuthProvider: Send + Sync {
    fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession>;
    fn send_otp(&self, email: &str) -> Result<()>;
    fn verify_otp(&self, email: &str, token: &str) -> Result<AuthSession>;
    fn exchange_code(&self, code: &str, verifier: &str) -> Result<AuthSession>;

    /// Ends the session remotely. The local copy is dropped either way.
    fn sign_out(&self) -> Result<()>;

    fn current_session(&self) -> Result<Option<AuthSession>>;

    /// Provider sign-in URL carrying the given PKCE challenge.
    fn authorize_url(&self, challenge: &str) -> Result<String>;
}

pub fn select_as<T: DeserializeOwned>(backend: &dyn Backend, query: &Query) -> Result<Vec<T>> {
    let rows = backend.select_rows(query)?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).with_context(|| format!("parse {} row", query.relation)))
        .collect()
}

pub fn insert_as<T: DeserializeOwned>(
    backend: &dyn Backend,
    relation: &str,
    row: &impl serde::Serialize,
) -> Result<T> {
    let row = serde_json::to_value(row).with_context(|| format!("serialize {} row", relation))?;
    let stored = backend.insert_row(relation, &row)?;
    serde_json::from_value(stored).with_context(|| format!("parse inserted {} row", relation))
}

#[cfg(test)]
#[path = "tests/backend/query_tests.rs"]
mod tests;
