//! Query-bound data holders for the views.
//!
//! A hook issues its query once when mounted and again on `revalidate` or a
//! query change. Results are cached in memory for the hook's lifetime only.

use anyhow::Result;
use serde::de::DeserializeOwned;

use crate::backend::{Backend, Query, select_as};
use crate::model::{Particle, Tag, TypeRow};
use crate::notify::failure_title;

pub fn particles_query(user_id: &str) -> Query {
    Query::from("particle")
        .select("*,tag(*)")
        .eq("user_id", user_id)
        .eq("is_trashed", false)
        .order("updated_at", false)
}

pub fn types_query() -> Query {
    Query::from("type").order("id", true)
}

pub fn tags_query(user_id: &str) -> Query {
    Query::from("tag").eq("user_id", user_id).order("name", true)
}

/// Identifies one fetch; only the newest ticket may land.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

pub struct DataHook<T> {
    query: Query,
    data: Option<Vec<T>>,
    error: Option<String>,
    is_loading: bool,
    generation: u64,
    mounted: bool,
}

impl<T: DeserializeOwned> DataHook<T> {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            data: None,
            error: None,
            is_loading: false,
            generation: 0,
            mounted: false,
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn data(&self) -> &[T] {
        self.data.as_deref().unwrap_or(&[])
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mount(&mut self, backend: &dyn Backend) {
        self.mounted = true;
        self.fetch(backend);
    }

    /// Result of any fetch still in flight is dropped once this returns.
    pub fn teardown(&mut self) {
        self.mounted = false;
        self.is_loading = false;
    }

    /// Starts a fetch and supersedes every earlier ticket.
    ///
    /// `mount` and `revalidate` fetch inline. A caller that runs the query on
    /// another thread holds the ticket and hands the result to `finish`.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.is_loading = true;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Lands a fetch result. Returns false when the ticket was superseded or
    /// the hook is no longer mounted; the result is then discarded.
    pub fn finish(&mut self, ticket: FetchTicket, result: Result<Vec<T>>) -> bool {
        if !self.mounted || ticket.generation != self.generation {
            tracing::debug!(relation = %self.query.relation, "discarding stale fetch");
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(rows) => {
                self.data = Some(rows);
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(relation = %self.query.relation, error = %format!("{:#}", err), "fetch failed");
                self.error = Some(failure_title(&err, "Failed to load"));
            }
        }
        true
    }

    pub fn revalidate(&mut self, backend: &dyn Backend) {
        self.fetch(backend);
    }

    /// Swaps the query and refetches when it actually changed.
    pub fn set_query(&mut self, query: Query, backend: &dyn Backend) {
        if query == self.query {
            return;
        }
        self.query = query;
        self.data = None;
        self.fetch(backend);
    }

    fn fetch(&mut self, backend: &dyn Backend) {
        let ticket = self.begin();
        let result = select_as::<T>(backend, &self.query);
        self.finish(ticket, result);
    }
}

pub type ParticlesHook = DataHook<Particle>;
pub type TypesHook = DataHook<TypeRow>;
pub type TagsHook = DataHook<Tag>;

#[cfg(test)]
#[path = "tests/hooks_tests.rs"]
mod tests;
