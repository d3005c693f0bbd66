//! Visitor-facing survey page controller.
//!
//! `GET /pages/{slug}` renders the form view (or the landing view when the
//! page's gate says the visitor is done); `POST /pages/{slug}` validates and
//! persists a submission. The landing view is a response body, not a
//! redirect, so refreshing after a POST reposts -- a documented limitation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use canvass_core::error::CoreError;
use canvass_core::fields::FieldDefinition;
use canvass_core::forms::{compile, FieldError};
use canvass_db::models::form_field::to_definitions;
use canvass_db::models::page::SurveyPage;
use canvass_db::repositories::{FormFieldRepo, PageRepo};
use serde_json::{json, Map, Value};

use crate::behavior::{behavior_for, GateOutcome, SurveyBehavior};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::state::AppState;

fn page_context(page: &SurveyPage) -> Value {
    json!({
        "id": page.id,
        "title": page.title,
        "slug": page.slug,
        "intro": page.intro,
    })
}

/// The form view: page context plus the compiled form descriptor. `values`
/// and `errors` are present when re-rendering a failed submission.
fn form_view(
    page: &SurveyPage,
    definitions: &[FieldDefinition],
    values: Option<&Map<String, Value>>,
    errors: Option<&[FieldError]>,
) -> Value {
    let form = compile(definitions);
    let mut view = json!({
        "view": "form",
        "page": page_context(page),
        "form": form,
    });
    if let Some(values) = values {
        view["values"] = Value::Object(values.clone());
    }
    if let Some(errors) = errors {
        let by_field: Map<String, Value> = errors
            .iter()
            .map(|e| (e.field.clone(), Value::String(e.message.clone())))
            .collect();
        view["errors"] = Value::Object(by_field);
    }
    view
}

/// The landing view shown after (or instead of) the form.
fn landing_view(page: &SurveyPage) -> Value {
    json!({
        "view": "landing",
        "page": page_context(page),
        "thank_you_text": page.thank_you_text,
    })
}

/// Resolve a slug to a survey page and its behavior + field definitions.
async fn resolve(
    state: &AppState,
    slug: &str,
) -> Result<(SurveyPage, &'static dyn SurveyBehavior, Vec<FieldDefinition>), AppError> {
    let page = PageRepo::find_survey_by_slug(&state.pool, slug, state.registry.kinds())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", slug)))?;

    let behavior = behavior_for(&page.kind).ok_or_else(|| {
        AppError::Core(CoreError::Internal(format!(
            "No behavior registered for page kind '{}'",
            page.kind
        )))
    })?;

    let rows = FormFieldRepo::list_by_page(&state.pool, page.id).await?;
    let definitions = to_definitions(&rows)?;

    Ok((page, behavior, definitions))
}

/// GET /pages/{slug}
///
/// Serve the unbound form, or the landing view when the gate is closed.
pub async fn serve_page(
    OptionalAuthUser(visitor): OptionalAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let (page, behavior, definitions) = resolve(&state, &slug).await?;

    match behavior.gate(&state.pool, &page, visitor.as_ref()).await? {
        GateOutcome::AlreadySubmitted => Ok(Json(landing_view(&page))),
        GateOutcome::Open => Ok(Json(form_view(&page, &definitions, None, None))),
    }
}

/// POST /pages/{slug}
///
/// Validate the submitted data. On success persist exactly one submission
/// and serve the landing view; on failure re-serve the form view with the
/// bound values and per-field errors, persisting nothing.
pub async fn submit_page(
    OptionalAuthUser(visitor): OptionalAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let (page, behavior, definitions) = resolve(&state, &slug).await?;

    // Idempotent access: a visitor who already submitted sees the landing
    // view instead of a second accepted submission.
    if behavior.gate(&state.pool, &page, visitor.as_ref()).await?
        == GateOutcome::AlreadySubmitted
    {
        return Ok(Json(landing_view(&page)).into_response());
    }

    let data = body
        .as_object()
        .ok_or_else(|| AppError::BadRequest("Expected a JSON object of field values".into()))?;

    let form = compile(&definitions);
    match form.validate(data) {
        Err(errors) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(form_view(&page, &definitions, Some(data), Some(&errors))),
        )
            .into_response()),
        Ok(cleaned) => {
            let submission = behavior
                .store_submission(&state.pool, &page, visitor.as_ref(), cleaned)
                .await?;

            tracing::info!(
                page_id = page.id,
                submission_id = submission.id,
                kind = %page.kind,
                "Survey submission stored"
            );

            Ok(Json(landing_view(&page)).into_response())
        }
    }
}
