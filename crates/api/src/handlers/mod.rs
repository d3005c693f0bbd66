//! Request handlers.

pub mod auth;
pub mod fields;
pub mod serve;
pub mod submissions;
pub mod surveys;

use canvass_core::error::CoreError;
use canvass_core::types::DbId;
use canvass_db::models::page::SurveyPage;
use canvass_db::repositories::PageRepo;

use crate::error::AppError;
use crate::state::AppState;

/// Resolve a page id to a survey page.
///
/// A page whose kind is not in the survey registry is indistinguishable from
/// a missing page to this add-on: both are `NotFound`.
pub(crate) async fn resolve_survey_page(
    state: &AppState,
    page_id: DbId,
) -> Result<SurveyPage, AppError> {
    PageRepo::find_by_id(&state.pool, page_id)
        .await?
        .filter(|p| state.registry.contains(&p.kind))
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", page_id)))
}
