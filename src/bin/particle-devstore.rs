//! In-memory development stand-in for the hosted backend: the row, identity
//! and media endpoints the particle client talks to.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tokio::sync::RwLock;

#[path = "particle_devstore/state.rs"]
mod state;
use self::state::*;
#[path = "particle_devstore/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "particle_devstore/auth.rs"]
mod auth;
#[path = "particle_devstore/rest.rs"]
mod rest;
#[path = "particle_devstore/objects.rs"]
mod objects;
#[path = "particle_devstore/runtime.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
