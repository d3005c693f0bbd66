//! Route definitions for the survey management surface.
//!
//! Mounted at `/surveys` by `api_routes()`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{fields, submissions, surveys};
use crate::state::AppState;

/// ```text
/// GET    /                                  -> list_surveys (?p)
/// POST   /                                  -> create_survey (admin)
/// GET    /menu                              -> menu_item
/// GET    /{page_id}                         -> get_survey
/// PUT    /{page_id}                         -> update_survey
/// DELETE /{page_id}                         -> delete_survey (admin)
/// POST   /{page_id}/editors/{user_id}       -> add_editor (admin)
/// DELETE /{page_id}/editors/{user_id}       -> remove_editor (admin)
/// GET    /{page_id}/fields                  -> list_fields
/// POST   /{page_id}/fields                  -> create_field
/// POST   /{page_id}/fields/reorder          -> reorder_fields
/// PUT    /{page_id}/fields/{id}             -> update_field
/// DELETE /{page_id}/fields/{id}             -> delete_field
/// GET    /{page_id}/submissions             -> list_submissions (?p, ?date_from, ?date_to, ?action=CSV)
/// GET    /{page_id}/submissions/{id}        -> get_submission (delete confirmation)
/// POST   /{page_id}/submissions/{id}/delete -> delete_submission
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(surveys::list_surveys).post(surveys::create_survey),
        )
        .route("/menu", get(surveys::menu_item))
        .route(
            "/{page_id}",
            get(surveys::get_survey)
                .put(surveys::update_survey)
                .delete(surveys::delete_survey),
        )
        .route(
            "/{page_id}/editors/{user_id}",
            post(surveys::add_editor).delete(surveys::remove_editor),
        )
        .route(
            "/{page_id}/fields",
            get(fields::list_fields).post(fields::create_field),
        )
        .route("/{page_id}/fields/reorder", post(fields::reorder_fields))
        .route(
            "/{page_id}/fields/{id}",
            put(fields::update_field).delete(fields::delete_field),
        )
        .route("/{page_id}/submissions", get(submissions::list_submissions))
        .route(
            "/{page_id}/submissions/{id}",
            get(submissions::get_submission),
        )
        .route(
            "/{page_id}/submissions/{id}/delete",
            post(submissions::delete_submission),
        )
}
