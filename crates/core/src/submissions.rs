//! Submission projection: turning stored form-data blobs into display
//! columns, table rows, and CSV exports.
//!
//! The (key, label) column list is derived from the *current* field set at
//! read time -- submissions recorded before a schema change may be missing
//! keys, and those cells project as missing.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::fields::FieldDefinition;
use crate::types::{DbId, Timestamp};

/// Key and label of the always-present submission timestamp column.
pub const SUBMISSION_DATE_KEY: &str = "created_at";
pub const SUBMISSION_DATE_LABEL: &str = "Submission Date";

/// Key and label of the identity column on per-user surveys.
pub const USERNAME_KEY: &str = "username";
pub const USERNAME_LABEL: &str = "Username";

// ---------------------------------------------------------------------------
// Data fields
// ---------------------------------------------------------------------------

/// One display column: storage key plus human-readable heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataField {
    pub name: String,
    pub label: String,
}

impl DataField {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// The base column list: submission date first, then one column per current
/// field definition in `sort_order` order. Page behaviors may prepend
/// identity columns ahead of these.
pub fn base_data_fields(definitions: &[FieldDefinition]) -> Vec<DataField> {
    let mut ordered: Vec<&FieldDefinition> = definitions.iter().collect();
    ordered.sort_by_key(|d| (d.sort_order, d.id));

    let mut fields = Vec::with_capacity(ordered.len() + 1);
    fields.push(DataField::new(SUBMISSION_DATE_KEY, SUBMISSION_DATE_LABEL));
    fields.extend(
        ordered
            .into_iter()
            .map(|d| DataField::new(d.clean_name.clone(), d.label.clone())),
    );
    fields
}

// ---------------------------------------------------------------------------
// Records and rows
// ---------------------------------------------------------------------------

/// A stored submission, resolved for display.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub id: DbId,
    pub created_at: Timestamp,
    /// Submitting user's name, for per-user surveys.
    pub username: Option<String>,
    /// The persisted clean-name to value map.
    pub form_data: Map<String, Value>,
}

impl SubmissionRecord {
    /// The form data augmented with the synthetic `created_at` (and, when
    /// present, `username`) entries the column list refers to.
    pub fn resolved_data(&self) -> Map<String, Value> {
        let mut data = self.form_data.clone();
        data.insert(
            SUBMISSION_DATE_KEY.to_string(),
            Value::String(format_timestamp(self.created_at)),
        );
        if let Some(username) = &self.username {
            data.insert(USERNAME_KEY.to_string(), Value::String(username.clone()));
        }
        data
    }
}

/// One table row: projected cell values plus the owning submission id so the
/// listing view can offer per-row actions.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRow {
    pub id: DbId,
    pub fields: Vec<Value>,
}

/// Project records into table rows. Missing values become JSON `null`;
/// the CSV export renders the same cells as the string `None`.
pub fn project_rows(records: &[SubmissionRecord], data_fields: &[DataField]) -> Vec<SubmissionRow> {
    records
        .iter()
        .map(|record| {
            let data = record.resolved_data();
            let fields = data_fields
                .iter()
                .map(|f| data.get(&f.name).cloned().unwrap_or(Value::Null))
                .collect();
            SubmissionRow {
                id: record.id,
                fields,
            }
        })
        .collect()
}

/// Render a timestamp the way the listing and export show it.
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%:z").to_string()
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Build the full CSV export: one header row of column labels, then one row
/// per record in the given order. Comma-delimited, CRLF line terminators.
///
/// Missing and null cells emit the literal string `None`; the table view
/// renders the same cells blank.
pub fn build_csv(records: &[SubmissionRecord], data_fields: &[DataField]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);

    let header: Vec<String> = data_fields.iter().map(|f| csv_escape(&f.label)).collect();
    lines.push(header.join(","));

    for record in records {
        let data = record.resolved_data();
        let row: Vec<String> = data_fields
            .iter()
            .map(|f| csv_escape(&csv_cell(data.get(&f.name))))
            .collect();
        lines.push(row.join(","));
    }

    let mut csv = lines.join("\r\n");
    csv.push_str("\r\n");
    csv
}

/// Coerce a cell value to its display-safe string form.
fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) => {
            // Multi-select values join with semicolons.
            let parts: Vec<String> = items.iter().map(|v| csv_cell(Some(v))).collect();
            parts.join(";")
        }
        Some(other) => other.to_string(),
    }
}

/// Escape a value for CSV: wrap in quotes if it contains comma, quote, or
/// newline.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{clean_name, FieldType};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

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

    fn sample_fields() -> Vec<FieldDefinition> {
        vec![
            def(1, "Your name", 1),
            def(2, "Your biography", 2),
            def(3, "Your choices", 3),
        ]
    }

    fn record(id: i64, year: i32, name: &str, bio: &str, choices: Option<&str>) -> SubmissionRecord {
        let mut form_data = Map::new();
        form_data.insert("your-name".into(), json!(name));
        form_data.insert("your-biography".into(), json!(bio));
        if let Some(c) = choices {
            form_data.insert("your-choices".into(), json!(c));
        }
        SubmissionRecord {
            id,
            created_at: Utc.with_ymd_and_hms(year, 1, 1, 12, 0, 0).unwrap(),
            username: None,
            form_data,
        }
    }

    #[test]
    fn base_data_fields_start_with_submission_date() {
        let fields = base_data_fields(&sample_fields());
        let labels: Vec<_> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Submission Date", "Your name", "Your biography", "Your choices"]
        );
        assert_eq!(fields[1].name, "your-name");
    }

    #[test]
    fn csv_header_matches_labels_exactly() {
        let records = [
            record(1, 2013, "Mikalai", "Airhead :)", Some("bar")),
            record(2, 2014, "John", "Genius", None),
        ];
        let csv = build_csv(&records, &base_data_fields(&sample_fields()));
        let lines: Vec<_> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "Submission Date,Your name,Your biography,Your choices");
        assert_eq!(lines[1], "2013-01-01 12:00:00+00:00,Mikalai,Airhead :),bar");
        assert_eq!(lines[2], "2014-01-01 12:00:00+00:00,John,Genius,None");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn csv_identity_column_goes_leftmost() {
        let mut rec = record(1, 2013, "Mikalai", "Airhead :)", Some("bar"));
        rec.username = Some("eventeditor".into());
        let mut fields = base_data_fields(&sample_fields());
        fields.insert(0, DataField::new(USERNAME_KEY, USERNAME_LABEL));

        let csv = build_csv(&[rec], &fields);
        let lines: Vec<_> = csv.split("\r\n").collect();
        assert_eq!(
            lines[0],
            "Username,Submission Date,Your name,Your biography,Your choices"
        );
        assert_eq!(
            lines[1],
            "eventeditor,2013-01-01 12:00:00+00:00,Mikalai,Airhead :),bar"
        );
    }

    #[test]
    fn csv_escapes_commas_quotes_newlines() {
        let mut rec = record(1, 2013, "Doe, John", "He said \"hi\"", None);
        rec.form_data
            .insert("your-choices".into(), json!("line\nbreak"));
        let csv = build_csv(&[rec], &base_data_fields(&sample_fields()));
        let row = csv.split("\r\n").nth(1).unwrap();
        assert!(row.contains("\"Doe, John\""));
        assert!(row.contains("\"He said \"\"hi\"\"\""));
        assert!(row.contains("\"line\nbreak\""));
    }

    #[test]
    fn csv_multi_select_joins_with_semicolons() {
        let mut rec = record(1, 2013, "Mikalai", "Airhead :)", None);
        rec.form_data
            .insert("your-choices".into(), json!(["foo", "baz"]));
        let csv = build_csv(&[rec], &base_data_fields(&sample_fields()));
        assert!(csv.contains("foo;baz"));
    }

    #[test]
    fn csv_keeps_unicode_intact() {
        let rec = record(1, 2014, "Unicode boy", "こんにちは、世界", None);
        let csv = build_csv(&[rec], &base_data_fields(&sample_fields()));
        assert!(csv.contains("こんにちは、世界"));
    }

    #[test]
    fn table_rows_use_null_for_missing_values() {
        let records = [record(7, 2014, "John", "Genius", None)];
        let rows = project_rows(&records, &base_data_fields(&sample_fields()));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 7);
        assert_eq!(rows[0].fields[1], json!("John"));
        // Missing "your-choices" is a blank slot here, not the string "None".
        assert_eq!(rows[0].fields[3], Value::Null);
    }

    #[test]
    fn rows_keep_keys_from_renamed_fields_missing() {
        // A field renamed after submissions exist: old keys no longer match.
        let records = [record(1, 2013, "Mikalai", "Airhead :)", Some("bar"))];
        let fields = vec![
            DataField::new(SUBMISSION_DATE_KEY, SUBMISSION_DATE_LABEL),
            DataField::new("your-full-name", "Your full name"),
        ];
        let rows = project_rows(&records, &fields);
        assert_eq!(rows[0].fields[1], Value::Null);
    }
}
