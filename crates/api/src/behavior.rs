//! Per-kind survey page behavior.
//!
//! A page's kind selects one of these capability objects, which decides the
//! submission store shape (anonymous vs. user-attributed), the display
//! columns, and the pre-serve gate. Adding a survey-capable page kind means
//! registering it in the kind registry and providing a behavior here.

use async_trait::async_trait;
use canvass_core::error::CoreError;
use canvass_core::fields::FieldDefinition;
use canvass_core::registry::{KIND_PER_USER, KIND_STANDARD};
use canvass_core::submissions::{base_data_fields, DataField, USERNAME_KEY, USERNAME_LABEL};
use canvass_db::models::page::SurveyPage;
use canvass_db::models::submission::Submission;
use canvass_db::repositories::SubmissionRepo;
use canvass_db::DbPool;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

/// Outcome of the pre-serve gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Serve the form.
    Open,
    /// Serve the landing view directly (idempotent access after submitting).
    AlreadySubmitted,
}

/// Capability interface implemented once per survey page kind.
#[async_trait]
pub trait SurveyBehavior: Send + Sync {
    /// The page kind code this behavior serves.
    fn kind(&self) -> &'static str;

    /// Whether submissions record the submitting user.
    fn collects_user(&self) -> bool {
        false
    }

    /// The (key, label) display columns for this page's submissions.
    fn data_fields(&self, definitions: &[FieldDefinition]) -> Vec<DataField> {
        base_data_fields(definitions)
    }

    /// Check whether the visitor should see the form or go straight to the
    /// landing view.
    async fn gate(
        &self,
        _pool: &DbPool,
        _page: &SurveyPage,
        _visitor: Option<&AuthUser>,
    ) -> Result<GateOutcome, AppError> {
        Ok(GateOutcome::Open)
    }

    /// Persist one validated submission.
    async fn store_submission(
        &self,
        pool: &DbPool,
        page: &SurveyPage,
        visitor: Option<&AuthUser>,
        cleaned: Map<String, Value>,
    ) -> Result<Submission, AppError>;
}

/// Resolve the behavior for a page kind.
pub fn behavior_for(kind: &str) -> Option<&'static dyn SurveyBehavior> {
    match kind {
        KIND_STANDARD => Some(&StandardSurvey),
        KIND_PER_USER => Some(&PerUserSurvey),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Standard surveys: anonymous, ungated
// ---------------------------------------------------------------------------

pub struct StandardSurvey;

#[async_trait]
impl SurveyBehavior for StandardSurvey {
    fn kind(&self) -> &'static str {
        KIND_STANDARD
    }

    async fn store_submission(
        &self,
        pool: &DbPool,
        page: &SurveyPage,
        _visitor: Option<&AuthUser>,
        cleaned: Map<String, Value>,
    ) -> Result<Submission, AppError> {
        let submission =
            SubmissionRepo::create(pool, page.id, None, &Value::Object(cleaned)).await?;
        Ok(submission)
    }
}

// ---------------------------------------------------------------------------
// Per-user surveys: authenticated, one submission per user
// ---------------------------------------------------------------------------

pub struct PerUserSurvey;

impl PerUserSurvey {
    fn require_visitor<'a>(visitor: Option<&'a AuthUser>) -> Result<&'a AuthUser, AppError> {
        visitor.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Sign in to access this survey".into(),
            ))
        })
    }
}

#[async_trait]
impl SurveyBehavior for PerUserSurvey {
    fn kind(&self) -> &'static str {
        KIND_PER_USER
    }

    fn collects_user(&self) -> bool {
        true
    }

    /// Identity column goes ahead of the schema-derived ones.
    fn data_fields(&self, definitions: &[FieldDefinition]) -> Vec<DataField> {
        let mut fields = base_data_fields(definitions);
        fields.insert(0, DataField::new(USERNAME_KEY, USERNAME_LABEL));
        fields
    }

    async fn gate(
        &self,
        pool: &DbPool,
        page: &SurveyPage,
        visitor: Option<&AuthUser>,
    ) -> Result<GateOutcome, AppError> {
        let visitor = Self::require_visitor(visitor)?;
        if SubmissionRepo::exists_for_user(pool, page.id, visitor.user_id).await? {
            Ok(GateOutcome::AlreadySubmitted)
        } else {
            Ok(GateOutcome::Open)
        }
    }

    async fn store_submission(
        &self,
        pool: &DbPool,
        page: &SurveyPage,
        visitor: Option<&AuthUser>,
        cleaned: Map<String, Value>,
    ) -> Result<Submission, AppError> {
        let visitor = Self::require_visitor(visitor)?;
        let submission =
            SubmissionRepo::create(pool, page.id, Some(visitor.user_id), &Value::Object(cleaned))
                .await?;
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvass_core::fields::{clean_name, FieldType};

    fn def(id: i64, label: &str, sort_order: i32) -> FieldDefinition {
        FieldDefinition {
            id,
            label: label.to_string(),
            clean_name: clean_name(label),
            field_type: FieldType::SingleLine,
            required: true,
            choices: String::new(),
            default_value: String::new(),
            help_text: String::new(),
            sort_order,
        }
    }

    #[test]
    fn behavior_resolution_by_kind() {
        assert_eq!(behavior_for(KIND_STANDARD).unwrap().kind(), KIND_STANDARD);
        assert_eq!(behavior_for(KIND_PER_USER).unwrap().kind(), KIND_PER_USER);
        assert!(behavior_for("newsletter").is_none());
    }

    #[test]
    fn standard_data_fields_have_no_identity_column() {
        let defs = vec![def(1, "Your name", 1)];
        let fields = StandardSurvey.data_fields(&defs);
        assert_eq!(fields[0].label, "Submission Date");
        assert_eq!(fields[1].label, "Your name");
        assert!(!StandardSurvey.collects_user());
    }

    #[test]
    fn per_user_prepends_username_column() {
        let defs = vec![def(1, "Your name", 1)];
        let fields = PerUserSurvey.data_fields(&defs);
        let labels: Vec<_> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Username", "Submission Date", "Your name"]);
        assert!(PerUserSurvey.collects_user());
    }
}
