//! Field definition CRUD: the editing surface for a page's form schema.
//!
//! Clean names are derived from labels at write time and must stay unique
//! within a page -- a colliding label ("Café" next to "Cafe") is rejected
//! with a conflict rather than silently merging two fields' values.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use canvass_core::error::CoreError;
use canvass_core::fields::{clean_name, validate_label};
use canvass_core::types::DbId;
use canvass_db::models::form_field::{CreateFormField, UpdateFormField};
use canvass_db::repositories::FormFieldRepo;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::resolve_survey_page;
use crate::middleware::auth::AuthUser;
use crate::permissions::require_page_manager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Derive and reserve the clean name for a label, rejecting collisions.
async fn derived_clean_name(
    state: &AppState,
    page_id: DbId,
    label: &str,
    exclude_id: Option<DbId>,
) -> Result<String, AppError> {
    validate_label(label)?;
    let name = clean_name(label);
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Label must contain at least one letter or digit".into(),
        )));
    }
    if FormFieldRepo::clean_name_exists(&state.pool, page_id, &name, exclude_id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Another field on this page already uses the name '{name}'"
        ))));
    }
    Ok(name)
}

/// GET /surveys/{page_id}/fields
///
/// A page's field definitions in display order.
pub async fn list_fields(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    require_page_manager(&state.pool, &auth, page.id).await?;

    let fields = FormFieldRepo::list_by_page(&state.pool, page.id).await?;
    Ok(Json(DataResponse { data: fields }))
}

/// POST /surveys/{page_id}/fields
///
/// Add a field to a page. Without an explicit `sort_order` the field is
/// appended after the existing ones.
pub async fn create_field(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(input): Json<CreateFormField>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    require_page_manager(&state.pool, &auth, page.id).await?;

    let name = derived_clean_name(&state, page.id, &input.label, None).await?;
    let sort_order = match input.sort_order {
        Some(order) => order,
        None => FormFieldRepo::next_sort_order(&state.pool, page.id).await?,
    };

    let field = FormFieldRepo::create(&state.pool, page.id, &input, &name, sort_order).await?;

    tracing::info!(
        user_id = auth.user_id,
        page_id = page.id,
        field_id = field.id,
        clean_name = %field.clean_name,
        "Form field created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: field })))
}

/// PUT /surveys/{page_id}/fields/{id}
///
/// Update a field. Changing the label re-derives the clean name, so
/// submissions recorded under the old key stop resolving and the listing
/// shows those cells as missing.
pub async fn update_field(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((page_id, field_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateFormField>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    require_page_manager(&state.pool, &auth, page.id).await?;

    let existing = FormFieldRepo::find_in_page(&state.pool, page.id, field_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("FormField", field_id)))?;

    let new_clean_name = match &input.label {
        Some(label) if *label != existing.label => {
            Some(derived_clean_name(&state, page.id, label, Some(field_id)).await?)
        }
        _ => None,
    };

    let field = FormFieldRepo::update(
        &state.pool,
        page.id,
        field_id,
        &input,
        new_clean_name.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::not_found("FormField", field_id)))?;

    Ok(Json(DataResponse { data: field }))
}

/// DELETE /surveys/{page_id}/fields/{id}
pub async fn delete_field(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((page_id, field_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    require_page_manager(&state.pool, &auth, page.id).await?;

    let deleted = FormFieldRepo::delete(&state.pool, page.id, field_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("FormField", field_id)));
    }

    tracing::info!(
        user_id = auth.user_id,
        page_id = page.id,
        field_id,
        "Form field deleted"
    );

    Ok(Json(json!({ "message": "Field deleted." })))
}

/// Request body for field reordering.
#[derive(Debug, serde::Deserialize)]
pub struct ReorderFields {
    /// Field ids in the desired display order.
    pub order: Vec<DbId>,
}

/// POST /surveys/{page_id}/fields/reorder
///
/// Rewrite the page's field order, returning the fields in their new order.
pub async fn reorder_fields(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(input): Json<ReorderFields>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_survey_page(&state, page_id).await?;
    require_page_manager(&state.pool, &auth, page.id).await?;

    FormFieldRepo::reorder(&state.pool, page.id, &input.order).await?;
    let fields = FormFieldRepo::list_by_page(&state.pool, page.id).await?;

    Ok(Json(DataResponse { data: fields }))
}
