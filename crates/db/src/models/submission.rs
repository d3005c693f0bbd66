//! Submission model: one visitor's persisted response.

use canvass_core::submissions::SubmissionRecord;
use canvass_core::types::{DbId, Timestamp};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;

/// A row from the `submissions` table. Immutable once created.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Submission {
    pub id: DbId,
    pub page_id: DbId,
    pub user_id: Option<DbId>,
    pub form_data: Value,
    pub created_at: Timestamp,
}

/// A submission row joined with the submitting user's name (per-user pages;
/// `username` is NULL for anonymous submissions).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubmissionWithUser {
    pub id: DbId,
    pub page_id: DbId,
    pub user_id: Option<DbId>,
    pub username: Option<String>,
    pub form_data: Value,
    pub created_at: Timestamp,
}

impl SubmissionWithUser {
    /// Convert to the display record the projection pipeline consumes.
    ///
    /// A `form_data` blob that is not a JSON object (which the controller
    /// never writes) projects as an empty map rather than failing the
    /// whole listing.
    pub fn to_record(&self) -> SubmissionRecord {
        let form_data = self
            .form_data
            .as_object()
            .cloned()
            .unwrap_or_else(Map::new);
        SubmissionRecord {
            id: self.id,
            created_at: self.created_at,
            username: self.username.clone(),
            form_data,
        }
    }
}
