//! Visitor-facing survey page routes. Mounted at `/pages` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::serve;
use crate::state::AppState;

/// ```text
/// GET  /{slug} -> serve_page (form or landing view)
/// POST /{slug} -> submit_page
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{slug}", get(serve::serve_page).post(serve::submit_page))
}
