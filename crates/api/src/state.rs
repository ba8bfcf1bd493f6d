use std::sync::Arc;

use crate::config::ServerConfig;
use crate::middleware::throttle::ThrottleRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: watchbase_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Process-wide request counters backing the throttle classes.
    pub throttle: Arc<ThrottleRegistry>,
}
