//! Form field model: one editor-authored input definition on a page.

use canvass_core::error::CoreError;
use canvass_core::fields::{FieldDefinition, FieldType};
use canvass_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `form_fields` table.
///
/// `clean_name` is stored rather than re-derived so submissions keep
/// resolving against the key they were recorded under; it is recomputed
/// whenever the label changes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FormField {
    pub id: DbId,
    pub page_id: DbId,
    pub sort_order: i32,
    pub label: String,
    pub clean_name: String,
    pub field_type: String,
    pub required: bool,
    pub choices: String,
    pub default_value: String,
    pub help_text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FormField {
    /// Convert to the pure definition the form compiler consumes.
    pub fn to_definition(&self) -> Result<FieldDefinition, CoreError> {
        let field_type = FieldType::parse(&self.field_type).ok_or_else(|| {
            CoreError::Internal(format!(
                "Stored field {} has unknown field type '{}'",
                self.id, self.field_type
            ))
        })?;
        Ok(FieldDefinition {
            id: self.id,
            label: self.label.clone(),
            clean_name: self.clean_name.clone(),
            field_type,
            required: self.required,
            choices: self.choices.clone(),
            default_value: self.default_value.clone(),
            help_text: self.help_text.clone(),
            sort_order: self.sort_order,
        })
    }
}

/// Convert a page's field rows into compiler definitions.
pub fn to_definitions(rows: &[FormField]) -> Result<Vec<FieldDefinition>, CoreError> {
    rows.iter().map(FormField::to_definition).collect()
}

/// DTO for creating a form field.
#[derive(Debug, Deserialize)]
pub struct CreateFormField {
    pub label: String,
    pub field_type: FieldType,
    /// Defaults to `true`, matching the editing UI.
    pub required: Option<bool>,
    pub choices: Option<String>,
    pub default_value: Option<String>,
    pub help_text: Option<String>,
    /// Defaults to the end of the page's current field list.
    pub sort_order: Option<i32>,
}

/// DTO for updating a form field.
#[derive(Debug, Deserialize)]
pub struct UpdateFormField {
    pub label: Option<String>,
    pub field_type: Option<FieldType>,
    pub required: Option<bool>,
    pub choices: Option<String>,
    pub default_value: Option<String>,
    pub help_text: Option<String>,
    pub sort_order: Option<i32>,
}
