//! Submission listing, CSV export, confirmation, and deletion.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use canvass_core::error::CoreError;
use canvass_core::filters::submission_range;
use canvass_core::pagination::{page_info, parse_page_param, PAGE_SIZE};
use canvass_core::submissions::{build_csv, format_timestamp, project_rows, SubmissionRecord};
use canvass_core::types::DbId;
use canvass_db::models::form_field::to_definitions;
use canvass_db::repositories::{FormFieldRepo, SubmissionRepo};
use serde_json::{json, Value};

use crate::behavior::behavior_for;
use crate::error::{AppError, AppResult};
use crate::handlers::resolve_survey_page;
use crate::middleware::auth::AuthUser;
use crate::permissions::require_page_manager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the submissions listing.
///
/// `p` is parsed leniently (non-numeric falls back to page 1) and the date
/// bounds fail open on malformed input, so everything arrives as raw text.
#[derive(Debug, serde::Deserialize)]
pub struct ListSubmissionsParams {
    pub p: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// `action=CSV` switches from the paginated table to a CSV download.
    pub action: Option<String>,
}

/// GET /surveys/{page_id}/submissions?p=&date_from=&date_to=&action=
///
/// List a page's submissions as a paginated table, or export them as CSV.
pub async fn list_submissions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Query(params): Query<ListSubmissionsParams>,
) -> AppResult<Response> {
    let page = resolve_survey_page(&state, page_id).await?;
    require_page_manager(&state.pool, &auth, page.id).await?;

    let behavior = behavior_for(&page.kind).ok_or_else(|| {
        AppError::Core(CoreError::Internal(format!(
            "No behavior registered for page kind '{}'",
            page.kind
        )))
    })?;

    let rows = FormFieldRepo::list_by_page(&state.pool, page.id).await?;
    let definitions = to_definitions(&rows)?;
    let data_fields = behavior.data_fields(&definitions);
    let range = submission_range(params.date_from.as_deref(), params.date_to.as_deref());

    if params.action.as_deref() == Some("CSV") {
        let records: Vec<SubmissionRecord> = SubmissionRepo::list_all(&state.pool, page.id, &range)
            .await?
            .iter()
            .map(|s| s.to_record())
            .collect();

        let csv = build_csv(&records, &data_fields);

        return Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment;filename=export.csv"),
            ],
            csv,
        )
            .into_response());
    }

    let total = SubmissionRepo::count_for_page(&state.pool, page.id, &range).await?;
    let info = page_info(parse_page_param(params.p.as_deref()), total, PAGE_SIZE);

    let records: Vec<SubmissionRecord> =
        SubmissionRepo::list_page(&state.pool, page.id, &range, info.per_page, info.offset)
            .await?
            .iter()
            .map(|s| s.to_record())
            .collect();

    let headings: Vec<&str> = data_fields.iter().map(|f| f.label.as_str()).collect();
    let table_rows = project_rows(&records, &data_fields);

    Ok(Json(DataResponse {
        data: json!({
            "page_id": page.id,
            "headings": headings,
            "rows": table_rows,
            "pagination": info,
        }),
    })
    .into_response())
}

/// GET /surveys/{page_id}/submissions/{id}
///
/// Confirmation context for deletion: the page and the resolved submission.
/// No side effects.
pub async fn get_submission(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((page_id, submission_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    require_page_manager(&state.pool, &auth, page.id).await?;

    let submission = SubmissionRepo::find_in_page(&state.pool, page.id, submission_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Submission", submission_id)))?;

    let record = submission.to_record();
    Ok(Json(DataResponse {
        data: json!({
            "page": { "id": page.id, "title": page.title, "slug": page.slug },
            "submission": {
                "id": record.id,
                "created_at": format_timestamp(record.created_at),
                "data": Value::Object(record.resolved_data()),
            },
        }),
    }))
}

/// POST /surveys/{page_id}/submissions/{id}/delete
///
/// Delete exactly one submission and point the caller back at the listing.
pub async fn delete_submission(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((page_id, submission_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    require_page_manager(&state.pool, &auth, page.id).await?;

    let deleted = SubmissionRepo::delete(&state.pool, page.id, submission_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found(
            "Submission",
            submission_id,
        )));
    }

    tracing::info!(
        user_id = auth.user_id,
        page_id = page.id,
        submission_id,
        "Submission deleted"
    );

    Ok(Json(json!({
        "message": "Submission deleted.",
        "redirect": format!("/api/v1/surveys/{}/submissions", page.id),
    })))
}
