pub mod auth;
pub mod health;
pub mod pages;
pub mod surveys;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                                  login (public)
///
/// /surveys                                     index of manageable surveys
/// /surveys/menu                                admin-shell menu entry
/// /surveys/{page_id}                           get, update, delete
/// /surveys/{page_id}/editors/{user_id}         grant, revoke (admin only)
/// /surveys/{page_id}/fields                    list, create
/// /surveys/{page_id}/fields/reorder            reorder (POST)
/// /surveys/{page_id}/fields/{id}               update, delete
/// /surveys/{page_id}/submissions               list / CSV export
/// /surveys/{page_id}/submissions/{id}          delete confirmation context
/// /surveys/{page_id}/submissions/{id}/delete   delete (POST)
///
/// /pages/{slug}                                visitor form view (GET),
///                                              submission (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/surveys", surveys::router())
        .nest("/pages", pages::router())
}
