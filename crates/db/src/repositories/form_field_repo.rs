//! Repository for the `form_fields` table.

use canvass_core::types::DbId;
use sqlx::PgPool;

use crate::models::form_field::{CreateFormField, FormField, UpdateFormField};

/// Column list for form_fields queries.
const COLUMNS: &str = "id, page_id, sort_order, label, clean_name, field_type, required, \
    choices, default_value, help_text, created_at, updated_at";

/// Provides CRUD and reordering for a page's field definitions.
pub struct FormFieldRepo;

impl FormFieldRepo {
    /// List a page's fields in display order (`sort_order`, then id).
    pub async fn list_by_page(pool: &PgPool, page_id: DbId) -> Result<Vec<FormField>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM form_fields
             WHERE page_id = $1
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, FormField>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }

    /// Find a field by ID within a page.
    pub async fn find_in_page(
        pool: &PgPool,
        page_id: DbId,
        id: DbId,
    ) -> Result<Option<FormField>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM form_fields WHERE id = $1 AND page_id = $2");
        sqlx::query_as::<_, FormField>(&query)
            .bind(id)
            .bind(page_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether another field on the page already owns a clean name.
    pub async fn clean_name_exists(
        pool: &PgPool,
        page_id: DbId,
        clean_name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM form_fields
                 WHERE page_id = $1 AND clean_name = $2 AND ($3::bigint IS NULL OR id <> $3))",
        )
        .bind(page_id)
        .bind(clean_name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Sort order that appends a new field after the page's existing ones.
    pub async fn next_sort_order(pool: &PgPool, page_id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM form_fields WHERE page_id = $1",
        )
        .bind(page_id)
        .fetch_one(pool)
        .await
    }

    /// Create a field on a page, returning the created row.
    ///
    /// `clean_name` and `sort_order` are resolved by the caller (derivation
    /// and collision policy live above the storage layer).
    pub async fn create(
        pool: &PgPool,
        page_id: DbId,
        input: &CreateFormField,
        clean_name: &str,
        sort_order: i32,
    ) -> Result<FormField, sqlx::Error> {
        let query = format!(
            "INSERT INTO form_fields
                (page_id, sort_order, label, clean_name, field_type, required,
                 choices, default_value, help_text)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormField>(&query)
            .bind(page_id)
            .bind(sort_order)
            .bind(&input.label)
            .bind(clean_name)
            .bind(input.field_type.as_str())
            .bind(input.required.unwrap_or(true))
            .bind(input.choices.as_deref().unwrap_or(""))
            .bind(input.default_value.as_deref().unwrap_or(""))
            .bind(input.help_text.as_deref().unwrap_or(""))
            .fetch_one(pool)
            .await
    }

    /// Update a field by ID, returning the updated row.
    ///
    /// `clean_name` is `Some` when the label changed and the key was
    /// re-derived by the caller.
    pub async fn update(
        pool: &PgPool,
        page_id: DbId,
        id: DbId,
        input: &UpdateFormField,
        clean_name: Option<&str>,
    ) -> Result<Option<FormField>, sqlx::Error> {
        let query = format!(
            "UPDATE form_fields SET
                label = COALESCE($3, label),
                clean_name = COALESCE($4, clean_name),
                field_type = COALESCE($5, field_type),
                required = COALESCE($6, required),
                choices = COALESCE($7, choices),
                default_value = COALESCE($8, default_value),
                help_text = COALESCE($9, help_text),
                sort_order = COALESCE($10, sort_order),
                updated_at = NOW()
             WHERE id = $1 AND page_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormField>(&query)
            .bind(id)
            .bind(page_id)
            .bind(&input.label)
            .bind(clean_name)
            .bind(input.field_type.map(|t| t.as_str()))
            .bind(input.required)
            .bind(&input.choices)
            .bind(&input.default_value)
            .bind(&input.help_text)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a field by ID within a page. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, page_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM form_fields WHERE id = $1 AND page_id = $2")
            .bind(id)
            .bind(page_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rewrite a page's display order to match `ids` (first = sort_order 0).
    ///
    /// IDs not belonging to the page are ignored by the per-row guard; all
    /// updates apply in one transaction.
    pub async fn reorder(pool: &PgPool, page_id: DbId, ids: &[DbId]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for (position, id) in ids.iter().enumerate() {
            sqlx::query(
                "UPDATE form_fields SET sort_order = $3, updated_at = NOW()
                 WHERE id = $1 AND page_id = $2",
            )
            .bind(id)
            .bind(page_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }
}
