//! Repository for the `submissions` table.
//!
//! Submissions are append-only: there is no update operation. Listing joins
//! the submitting user so per-user pages can show the identity column.
//! Date bounds are optional on both sides; a `NULL` bound means "no filter".

use canvass_core::filters::DateRange;
use canvass_core::types::DbId;
use serde_json::Value;
use sqlx::PgPool;

use crate::models::submission::{Submission, SubmissionWithUser};

/// Column list for joined submission queries.
const JOINED_COLUMNS: &str =
    "s.id, s.page_id, s.user_id, u.username, s.form_data, s.created_at";

/// Store-natural listing order: oldest first, ties broken by id.
const ORDER: &str = "s.created_at ASC, s.id ASC";

/// Provides create/list/delete for survey submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Persist one submission atomically, returning the created row.
    pub async fn create(
        pool: &PgPool,
        page_id: DbId,
        user_id: Option<DbId>,
        form_data: &Value,
    ) -> Result<Submission, sqlx::Error> {
        sqlx::query_as::<_, Submission>(
            "INSERT INTO submissions (page_id, user_id, form_data)
             VALUES ($1, $2, $3)
             RETURNING id, page_id, user_id, form_data, created_at",
        )
        .bind(page_id)
        .bind(user_id)
        .bind(form_data)
        .fetch_one(pool)
        .await
    }

    /// Count a page's submissions within the date range.
    pub async fn count_for_page(
        pool: &PgPool,
        page_id: DbId,
        range: &DateRange,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM submissions
             WHERE page_id = $1
               AND ($2::timestamptz IS NULL OR created_at >= $2)
               AND ($3::timestamptz IS NULL OR created_at <= $3)",
        )
        .bind(page_id)
        .bind(range.from)
        .bind(range.to)
        .fetch_one(pool)
        .await
    }

    /// List one page slice of a page's submissions within the date range.
    pub async fn list_page(
        pool: &PgPool,
        page_id: DbId,
        range: &DateRange,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubmissionWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM submissions s
             LEFT JOIN users u ON u.id = s.user_id
             WHERE s.page_id = $1
               AND ($2::timestamptz IS NULL OR s.created_at >= $2)
               AND ($3::timestamptz IS NULL OR s.created_at <= $3)
             ORDER BY {ORDER}
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, SubmissionWithUser>(&query)
            .bind(page_id)
            .bind(range.from)
            .bind(range.to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List all of a page's submissions within the date range (CSV export
    /// ignores pagination).
    pub async fn list_all(
        pool: &PgPool,
        page_id: DbId,
        range: &DateRange,
    ) -> Result<Vec<SubmissionWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM submissions s
             LEFT JOIN users u ON u.id = s.user_id
             WHERE s.page_id = $1
               AND ($2::timestamptz IS NULL OR s.created_at >= $2)
               AND ($3::timestamptz IS NULL OR s.created_at <= $3)
             ORDER BY {ORDER}"
        );
        sqlx::query_as::<_, SubmissionWithUser>(&query)
            .bind(page_id)
            .bind(range.from)
            .bind(range.to)
            .fetch_all(pool)
            .await
    }

    /// Find a submission by ID within a page.
    pub async fn find_in_page(
        pool: &PgPool,
        page_id: DbId,
        id: DbId,
    ) -> Result<Option<SubmissionWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM submissions s
             LEFT JOIN users u ON u.id = s.user_id
             WHERE s.id = $1 AND s.page_id = $2"
        );
        sqlx::query_as::<_, SubmissionWithUser>(&query)
            .bind(id)
            .bind(page_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a user has already submitted to a page (per-user gate).
    pub async fn exists_for_user(
        pool: &PgPool,
        page_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM submissions WHERE page_id = $1 AND user_id = $2)",
        )
        .bind(page_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a submission by ID within a page. Returns `true` if a row was
    /// deleted.
    pub async fn delete(pool: &PgPool, page_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1 AND page_id = $2")
            .bind(id)
            .bind(page_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
