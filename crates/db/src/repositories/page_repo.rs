//! Repository for the `pages` table.

use canvass_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::{CreateSurveyPage, SurveyPage, UpdateSurveyPage};

/// Column list for pages queries.
const COLUMNS: &str = "id, title, slug, kind, intro, thank_you_text, created_at, updated_at";

/// Provides CRUD and authorization-scoped listing for survey pages.
pub struct PageRepo;

impl PageRepo {
    /// Create a new survey page, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSurveyPage) -> Result<SurveyPage, sqlx::Error> {
        let kind = input.kind.as_deref().unwrap_or("standard");
        let query = format!(
            "INSERT INTO pages (title, slug, kind, intro, thank_you_text)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SurveyPage>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(kind)
            .bind(input.intro.as_deref().unwrap_or(""))
            .bind(input.thank_you_text.as_deref().unwrap_or(""))
            .fetch_one(pool)
            .await
    }

    /// Find a page by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SurveyPage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, SurveyPage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a survey page by slug, restricted to the registered survey kinds.
    pub async fn find_survey_by_slug(
        pool: &PgPool,
        slug: &str,
        kinds: &[String],
    ) -> Result<Option<SurveyPage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE slug = $1 AND kind = ANY($2)");
        sqlx::query_as::<_, SurveyPage>(&query)
            .bind(slug)
            .bind(kinds)
            .fetch_optional(pool)
            .await
    }

    /// List the survey pages a user may manage submissions for, newest first.
    ///
    /// Admins manage every survey page; editors only the pages they are
    /// listed on in `page_editors`.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        is_admin: bool,
        kinds: &[String],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SurveyPage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pages
             WHERE kind = ANY($1)
               AND ($2 OR EXISTS (
                   SELECT 1 FROM page_editors pe
                   WHERE pe.page_id = pages.id AND pe.user_id = $3))
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, SurveyPage>(&query)
            .bind(kinds)
            .bind(is_admin)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count the survey pages a user may manage submissions for.
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: DbId,
        is_admin: bool,
        kinds: &[String],
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pages
             WHERE kind = ANY($1)
               AND ($2 OR EXISTS (
                   SELECT 1 FROM page_editors pe
                   WHERE pe.page_id = pages.id AND pe.user_id = $3))",
        )
        .bind(kinds)
        .bind(is_admin)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Whether a user is listed as an editor of a page.
    pub async fn is_editor(pool: &PgPool, page_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM page_editors WHERE page_id = $1 AND user_id = $2)",
        )
        .bind(page_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Grant a user submission-management rights on a page. Idempotent.
    pub async fn add_editor(pool: &PgPool, page_id: DbId, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO page_editors (page_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(page_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Revoke a user's rights on a page. Returns `true` if a grant existed.
    pub async fn remove_editor(
        pool: &PgPool,
        page_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM page_editors WHERE page_id = $1 AND user_id = $2")
            .bind(page_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update a page by ID, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSurveyPage,
    ) -> Result<Option<SurveyPage>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET
                title = COALESCE($2, title),
                intro = COALESCE($3, intro),
                thank_you_text = COALESCE($4, thank_you_text),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SurveyPage>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.intro)
            .bind(&input.thank_you_text)
            .fetch_optional(pool)
            .await
    }

    /// Delete a page by ID. Fields and submissions cascade with it.
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
