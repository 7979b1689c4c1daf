use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and the config sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: woundcare_db::DbPool,
    /// Immutable server configuration (JWT, cookies, upload storage).
    pub config: Arc<ServerConfig>,
}
