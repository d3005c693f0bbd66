//! Survey page index, CRUD, editor grants, and the admin menu entry.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use canvass_core::error::CoreError;
use canvass_core::pagination::{page_info, parse_page_param, PAGE_SIZE};
use canvass_core::types::DbId;
use canvass_db::models::page::{CreateSurveyPage, UpdateSurveyPage};
use canvass_db::repositories::{FormFieldRepo, PageRepo, UserRepo};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::resolve_survey_page;
use crate::menu::surveys_menu_item;
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::permissions::require_page_manager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the survey index.
#[derive(Debug, serde::Deserialize)]
pub struct IndexParams {
    pub p: Option<String>,
}

/// GET /surveys?p=
///
/// Paginated index of the survey pages the caller may manage submissions
/// for, scoped by the survey-kind registry.
pub async fn list_surveys(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> AppResult<impl IntoResponse> {
    let kinds = state.registry.kinds();
    let total =
        PageRepo::count_for_user(&state.pool, auth.user_id, auth.is_admin(), kinds).await?;
    let info = page_info(parse_page_param(params.p.as_deref()), total, PAGE_SIZE);

    let pages = PageRepo::list_for_user(
        &state.pool,
        auth.user_id,
        auth.is_admin(),
        kinds,
        info.per_page,
        info.offset,
    )
    .await?;

    Ok(Json(DataResponse {
        data: json!({ "items": pages, "pagination": info }),
    }))
}

/// GET /surveys/menu
///
/// The registrable admin-shell menu entry. `shown` is true only when the
/// caller manages submissions for at least one survey page.
pub async fn menu_item(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let total = PageRepo::count_for_user(
        &state.pool,
        auth.user_id,
        auth.is_admin(),
        state.registry.kinds(),
    )
    .await?;

    Ok(Json(DataResponse {
        data: surveys_menu_item(total > 0),
    }))
}

/// POST /surveys
///
/// Create a survey page (admin only).
pub async fn create_survey(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSurveyPage>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must not be empty".into(),
        )));
    }
    validate_slug(&input.slug)?;
    if let Some(kind) = &input.kind {
        if !state.registry.contains(kind) {
            return Err(AppError::BadRequest(format!(
                "Unknown survey page kind '{kind}'"
            )));
        }
    }

    let page = PageRepo::create(&state.pool, &input).await?;

    tracing::info!(user_id = admin.user_id, page_id = page.id, slug = %page.slug, "Survey page created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: page })))
}

/// GET /surveys/{page_id}
///
/// One survey page with its field definitions.
pub async fn get_survey(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    require_page_manager(&state.pool, &auth, page.id).await?;

    let fields = FormFieldRepo::list_by_page(&state.pool, page.id).await?;

    Ok(Json(DataResponse {
        data: json!({ "page": page, "fields": fields }),
    }))
}

/// PUT /surveys/{page_id}
///
/// Update a survey page's content.
pub async fn update_survey(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(input): Json<UpdateSurveyPage>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    require_page_manager(&state.pool, &auth, page.id).await?;

    let updated = PageRepo::update(&state.pool, page.id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", page.id)))?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /surveys/{page_id}
///
/// Delete a survey page; its fields and submissions cascade (admin only).
pub async fn delete_survey(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    PageRepo::delete(&state.pool, page.id).await?;

    tracing::info!(user_id = admin.user_id, page_id = page.id, "Survey page deleted");

    Ok(Json(json!({ "message": "Survey deleted." })))
}

/// POST /surveys/{page_id}/editors/{user_id}
///
/// Grant a user submission-management rights on a page (admin only).
pub async fn add_editor(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((page_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user_id)))?;

    PageRepo::add_editor(&state.pool, page.id, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "granted": true })),
    ))
}

/// DELETE /surveys/{page_id}/editors/{user_id}
///
/// Revoke a user's rights on a page (admin only).
pub async fn remove_editor(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((page_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    let revoked = PageRepo::remove_editor(&state.pool, page.id, user_id).await?;
    if !revoked {
        return Err(AppError::Core(CoreError::not_found("EditorGrant", user_id)));
    }
    Ok(Json(json!({ "revoked": true })))
}

/// Page slugs are URL path segments: lowercase alphanumerics and hyphens.
fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Slug must not be empty".into(),
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::Core(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        )));
    }
    Ok(())
}
