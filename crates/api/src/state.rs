use std::sync::Arc;

use canvass_core::registry::SurveyKindRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: canvass_db::DbPool,
    /// Server configuration (JWT secret, timeouts, CORS).
    pub config: Arc<ServerConfig>,
    /// Survey-capable page kinds, built at startup. Scopes which pages the
    /// listing and authorization queries consider.
    pub registry: Arc<SurveyKindRegistry>,
}
