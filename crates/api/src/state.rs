use std::sync::Arc;

use crate::background::scheduler::JobScheduler;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: shutterdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Scheduled job runner (one instance per process).
    pub scheduler: Arc<JobScheduler>,
}
