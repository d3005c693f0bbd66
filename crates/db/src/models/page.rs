//! Survey page model.

use canvass_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `pages` table.
///
/// `kind` selects the page's survey behavior (see the kind registry);
/// `thank_you_text` drives the landing view shown after a submission.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SurveyPage {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub kind: String,
    pub intro: String,
    pub thank_you_text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a survey page.
#[derive(Debug, Deserialize)]
pub struct CreateSurveyPage {
    pub title: String,
    pub slug: String,
    pub kind: Option<String>,
    pub intro: Option<String>,
    pub thank_you_text: Option<String>,
}

/// DTO for updating a survey page.
#[derive(Debug, Deserialize)]
pub struct UpdateSurveyPage {
    pub title: Option<String>,
    pub intro: Option<String>,
    pub thank_you_text: Option<String>,
}
