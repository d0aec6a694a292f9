pub mod client;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod stats;

use std::sync::Arc;

use db::MemoryStore;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub config: config::AppConfig,
}
