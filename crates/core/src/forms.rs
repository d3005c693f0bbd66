//! The form compiler: turns an ordered sequence of field definitions into a
//! validating form schema.
//!
//! Compilation is pure and deterministic -- the same definition sequence
//! always yields the same schema. Binding submitted JSON against a compiled
//! form either produces the cleaned value map or a list of per-field errors
//! keyed by clean name; nothing else happens at this layer.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{ValidateEmail, ValidateUrl};

use crate::fields::{parse_choices, parse_defaults, FieldDefinition, FieldType};

// ---------------------------------------------------------------------------
// Compiled schema
// ---------------------------------------------------------------------------

/// One named input descriptor in a compiled form.
#[derive(Debug, Clone, Serialize)]
pub struct CompiledField {
    /// Storage key: the definition's clean name.
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub help_text: String,
    /// Parsed option list (choice types only; empty otherwise).
    pub options: Vec<String>,
    /// Initial value for unbound rendering.
    pub default: Value,
}

/// A compiled, bindable form schema.
#[derive(Debug, Clone, Serialize)]
pub struct CompiledForm {
    pub fields: Vec<CompiledField>,
}

/// A single binding failure, keyed by the field's clean name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Compile field definitions into a form schema.
///
/// Fields are emitted in `sort_order` order (ties broken by id), regardless
/// of the order the slice arrives in.
pub fn compile(definitions: &[FieldDefinition]) -> CompiledForm {
    let mut ordered: Vec<&FieldDefinition> = definitions.iter().collect();
    ordered.sort_by_key(|d| (d.sort_order, d.id));

    let fields = ordered
        .into_iter()
        .map(|def| {
            let options = if def.field_type.is_choice() {
                parse_choices(&def.choices)
            } else {
                Vec::new()
            };
            CompiledField {
                name: def.clean_name.clone(),
                label: def.label.clone(),
                field_type: def.field_type,
                required: def.required,
                help_text: def.help_text.clone(),
                options,
                default: default_value(def),
            }
        })
        .collect();

    CompiledForm { fields }
}

/// Initial value derived from a definition's `default_value` string.
fn default_value(def: &FieldDefinition) -> Value {
    match def.field_type {
        FieldType::Checkbox => {
            let v = def.default_value.trim().to_ascii_lowercase();
            Value::Bool(matches!(v.as_str(), "on" | "true" | "yes" | "1"))
        }
        FieldType::Checkboxes => Value::Array(
            parse_defaults(&def.default_value)
                .into_iter()
                .map(Value::String)
                .collect(),
        ),
        FieldType::Dropdown | FieldType::Radio => parse_defaults(&def.default_value)
            .into_iter()
            .next()
            .map(Value::String)
            .unwrap_or(Value::Null),
        _ => {
            let v = def.default_value.trim();
            if v.is_empty() {
                Value::Null
            } else {
                Value::String(v.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Binding / validation
// ---------------------------------------------------------------------------

impl CompiledForm {
    /// Look up a compiled field by clean name.
    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Bind submitted data against this schema.
    ///
    /// Returns the cleaned value map (one entry per compiled field) when
    /// every required field has a non-empty, type-conformant value and every
    /// present optional value is type-conformant. Otherwise returns all
    /// binding failures, keyed by clean name. Submitted keys that match no
    /// field are ignored.
    pub fn validate(&self, data: &Map<String, Value>) -> Result<Map<String, Value>, Vec<FieldError>> {
        let mut cleaned = Map::new();
        let mut errors = Vec::new();

        for field in &self.fields {
            let raw = data.get(&field.name);
            match bind_field(field, raw) {
                Ok(value) => {
                    cleaned.insert(field.name.clone(), value);
                }
                Err(message) => errors.push(FieldError {
                    field: field.name.clone(),
                    message,
                }),
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(errors)
        }
    }
}

const REQUIRED_MESSAGE: &str = "This field is required.";

/// Bind one submitted value, returning the cleaned value or an error message.
fn bind_field(field: &CompiledField, raw: Option<&Value>) -> Result<Value, String> {
    if is_empty_value(raw) {
        return if field.required {
            Err(REQUIRED_MESSAGE.to_string())
        } else {
            Ok(empty_value(field.field_type))
        };
    }
    let value = raw.unwrap_or(&Value::Null);

    match field.field_type {
        FieldType::SingleLine | FieldType::MultiLine => as_text(value),
        FieldType::Email => {
            let text = as_string(value).ok_or("Enter a valid email address.")?;
            if text.validate_email() {
                Ok(Value::String(text))
            } else {
                Err("Enter a valid email address.".into())
            }
        }
        FieldType::Url => {
            let text = as_string(value).ok_or("Enter a valid URL.")?;
            if text.validate_url() {
                Ok(Value::String(text))
            } else {
                Err("Enter a valid URL.".into())
            }
        }
        FieldType::Number => bind_number(value),
        FieldType::Checkbox => match value {
            Value::Bool(true) => Ok(Value::Bool(true)),
            Value::Bool(false) => {
                if field.required {
                    Err(REQUIRED_MESSAGE.to_string())
                } else {
                    Ok(Value::Bool(false))
                }
            }
            _ => Err("Expected true or false.".into()),
        },
        FieldType::Checkboxes => bind_multi_choice(field, value),
        FieldType::Dropdown | FieldType::Radio => bind_choice(field, value),
        FieldType::Date => bind_date(value),
        FieldType::DateTime => bind_datetime(value),
    }
}

/// Whether a submitted value counts as "not provided".
fn is_empty_value(raw: Option<&Value>) -> bool {
    match raw {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(_) => false,
    }
}

/// The cleaned value an absent optional field contributes.
fn empty_value(field_type: FieldType) -> Value {
    match field_type {
        FieldType::SingleLine | FieldType::MultiLine => Value::String(String::new()),
        FieldType::Checkbox => Value::Bool(false),
        FieldType::Checkboxes => Value::Array(Vec::new()),
        _ => Value::Null,
    }
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_string())
}

fn as_text(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(s) => Ok(Value::String(s.clone())),
        _ => Err("Expected a text value.".into()),
    }
}

/// Numbers arrive as JSON numbers or as strings; strings may use a comma
/// decimal separator (locale input).
fn bind_number(value: &Value) -> Result<Value, String> {
    match value {
        Value::Number(n) => Ok(Value::Number(n.clone())),
        Value::String(s) => {
            let mut normalized = s.trim().to_string();
            if normalized.contains(',') && !normalized.contains('.') {
                normalized = normalized.replace(',', ".");
            }
            if let Ok(i) = normalized.parse::<i64>() {
                return Ok(Value::Number(i.into()));
            }
            normalized
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| "Enter a number.".to_string())
        }
        _ => Err("Enter a number.".into()),
    }
}

fn bind_choice(field: &CompiledField, value: &Value) -> Result<Value, String> {
    let text = as_string(value).ok_or_else(|| invalid_choice(field))?;
    if field.options.iter().any(|o| *o == text) {
        Ok(Value::String(text))
    } else {
        Err(invalid_choice(field))
    }
}

fn bind_multi_choice(field: &CompiledField, value: &Value) -> Result<Value, String> {
    let items = value.as_array().ok_or("Expected a list of choices.")?;
    let mut selected = Vec::with_capacity(items.len());
    for item in items {
        let text = as_string(item).ok_or_else(|| invalid_choice(field))?;
        if !field.options.iter().any(|o| *o == text) {
            return Err(invalid_choice(field));
        }
        selected.push(Value::String(text));
    }
    Ok(Value::Array(selected))
}

fn invalid_choice(field: &CompiledField) -> String {
    if field.options.is_empty() {
        "Select a valid choice. This field has no choices.".to_string()
    } else {
        format!(
            "Select a valid choice. Allowed: {}",
            field.options.join(", ")
        )
    }
}

fn bind_date(value: &Value) -> Result<Value, String> {
    let text = as_string(value).ok_or("Enter a valid date (YYYY-MM-DD).")?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
        .map_err(|_| "Enter a valid date (YYYY-MM-DD).".into())
}

fn bind_datetime(value: &Value) -> Result<Value, String> {
    let text = as_string(value).ok_or("Enter a valid date/time.")?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Ok(Value::String(dt.to_rfc3339()));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&text, format) {
            return Ok(Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()));
        }
    }
    Err("Enter a valid date/time.".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::clean_name;
    use serde_json::json;

    fn def(
        id: i64,
        label: &str,
        field_type: FieldType,
        required: bool,
        choices: &str,
        sort_order: i32,
    ) -> FieldDefinition {
        FieldDefinition {
            id,
            label: label.to_string(),
            clean_name: clean_name(label),
            field_type,
            required,
            choices: choices.to_string(),
            default_value: String::new(),
            help_text: String::new(),
            sort_order,
        }
    }

    fn sample_definitions() -> Vec<FieldDefinition> {
        vec![
            def(1, "Your name", FieldType::SingleLine, true, "", 1),
            def(2, "Your biography", FieldType::MultiLine, true, "", 2),
            def(3, "Your email", FieldType::Email, false, "", 3),
            def(4, "Your favourite number", FieldType::Number, false, "", 4),
            def(5, "Your homepage", FieldType::Url, false, "", 5),
            def(6, "Your choices", FieldType::Checkboxes, false, "foo,bar,baz", 6),
            def(7, "Your favourite Python IDE", FieldType::Radio, true, "PyCharm, vim ,nano", 7),
            def(8, "I agree to the Terms of Use", FieldType::Checkbox, true, "", 8),
            def(9, "Your birthday", FieldType::Date, false, "", 9),
            def(10, "Your birthtime :)", FieldType::DateTime, false, "", 10),
        ]
    }

    #[test]
    fn compile_is_deterministic() {
        let defs = sample_definitions();
        let a = compile(&defs);
        let b = compile(&defs);
        let names_a: Vec<_> = a.fields.iter().map(|f| (&f.name, f.required)).collect();
        let names_b: Vec<_> = b.fields.iter().map(|f| (&f.name, f.required)).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn compile_orders_by_sort_order_then_id() {
        let mut defs = sample_definitions();
        defs.reverse();
        defs[0].sort_order = 0; // "Your birthtime :)" jumps to the front
        let form = compile(&defs);
        assert_eq!(form.fields[0].name, "your-birthtime");
        assert_eq!(form.fields[1].name, "your-name");
    }

    #[test]
    fn compile_uses_clean_names() {
        let form = compile(&sample_definitions());
        let names: Vec<_> = form.fields.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"your-name"));
        assert!(names.contains(&"your-favourite-number"));
        assert!(names.contains(&"i-agree-to-the-terms-of-use"));
    }

    #[test]
    fn compile_parses_choices_with_whitespace() {
        let form = compile(&sample_definitions());
        let ide = form.field("your-favourite-python-ide").unwrap();
        assert_eq!(ide.options, vec!["PyCharm", "vim", "nano"]);
    }

    #[test]
    fn compile_defaults_split_per_type() {
        let mut defs = vec![
            def(1, "Colours", FieldType::Checkboxes, false, "red,green,blue", 1),
            def(2, "Colour", FieldType::Dropdown, false, "red,green,blue", 2),
        ];
        defs[0].default_value = "red, blue".into();
        defs[1].default_value = "green".into();
        let form = compile(&defs);
        assert_eq!(form.fields[0].default, json!(["red", "blue"]));
        assert_eq!(form.fields[1].default, json!("green"));
    }

    fn valid_submission() -> Map<String, Value> {
        json!({
            "your-name": "Mikalai",
            "your-biography": "Airhead :)",
            "your-favourite-python-ide": "vim",
            "i-agree-to-the-terms-of-use": true,
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn validate_accepts_valid_submission() {
        let form = compile(&sample_definitions());
        let cleaned = form.validate(&valid_submission()).unwrap();
        assert_eq!(cleaned["your-name"], json!("Mikalai"));
        // Optional absent fields still appear with their empty values.
        assert_eq!(cleaned["your-email"], Value::Null);
        assert_eq!(cleaned["your-choices"], json!([]));
    }

    #[test]
    fn validate_missing_required_field_collects_error() {
        let form = compile(&sample_definitions());
        let mut data = valid_submission();
        data.remove("your-name");
        let errors = form.validate(&data).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "your-name");
        assert_eq!(errors[0].message, REQUIRED_MESSAGE);
    }

    #[test]
    fn validate_collects_all_errors_not_first() {
        let form = compile(&sample_definitions());
        let data = Map::new();
        let errors = form.validate(&data).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"your-name"));
        assert!(fields.contains(&"your-biography"));
        assert!(fields.contains(&"your-favourite-python-ide"));
        assert!(fields.contains(&"i-agree-to-the-terms-of-use"));
    }

    #[test]
    fn validate_required_checkbox_must_be_true() {
        let form = compile(&sample_definitions());
        let mut data = valid_submission();
        data.insert("i-agree-to-the-terms-of-use".into(), json!(false));
        let errors = form.validate(&data).unwrap_err();
        assert_eq!(errors[0].field, "i-agree-to-the-terms-of-use");
    }

    #[test]
    fn validate_rejects_bad_email_and_url() {
        let form = compile(&sample_definitions());
        let mut data = valid_submission();
        data.insert("your-email".into(), json!("not-an-email"));
        data.insert("your-homepage".into(), json!("not a url"));
        let errors = form.validate(&data).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["your-email", "your-homepage"]);
    }

    #[test]
    fn validate_accepts_email_and_url() {
        let form = compile(&sample_definitions());
        let mut data = valid_submission();
        data.insert("your-email".into(), json!("mikalai@example.com"));
        data.insert("your-homepage".into(), json!("https://example.com/me"));
        let cleaned = form.validate(&data).unwrap();
        assert_eq!(cleaned["your-email"], json!("mikalai@example.com"));
    }

    #[test]
    fn validate_number_accepts_numbers_and_numeric_strings() {
        let form = compile(&sample_definitions());
        let mut data = valid_submission();
        data.insert("your-favourite-number".into(), json!(7));
        let cleaned = form.validate(&data).unwrap();
        assert_eq!(cleaned["your-favourite-number"], json!(7));

        let mut data = valid_submission();
        data.insert("your-favourite-number".into(), json!("3,5"));
        let cleaned = form.validate(&data).unwrap();
        assert_eq!(cleaned["your-favourite-number"], json!(3.5));

        let mut data = valid_submission();
        data.insert("your-favourite-number".into(), json!("seven"));
        assert!(form.validate(&data).is_err());
    }

    #[test]
    fn validate_choice_membership() {
        let form = compile(&sample_definitions());
        let mut data = valid_submission();
        data.insert("your-favourite-python-ide".into(), json!("emacs"));
        let errors = form.validate(&data).unwrap_err();
        assert!(errors[0].message.contains("PyCharm"));

        let mut data = valid_submission();
        data.insert("your-choices".into(), json!(["foo", "quux"]));
        assert!(form.validate(&data).is_err());

        let mut data = valid_submission();
        data.insert("your-choices".into(), json!(["foo", "baz"]));
        let cleaned = form.validate(&data).unwrap();
        assert_eq!(cleaned["your-choices"], json!(["foo", "baz"]));
    }

    #[test]
    fn validate_choice_field_with_no_options_rejects_everything() {
        let defs = vec![def(1, "Pick one", FieldType::Dropdown, true, "", 1)];
        let form = compile(&defs);
        let data = json!({ "pick-one": "anything" }).as_object().cloned().unwrap();
        let errors = form.validate(&data).unwrap_err();
        assert!(errors[0].message.contains("no choices"));
    }

    #[test]
    fn validate_dates_normalize() {
        let form = compile(&sample_definitions());
        let mut data = valid_submission();
        data.insert("your-birthday".into(), json!("1990-04-01"));
        data.insert("your-birthtime".into(), json!("1990-04-01 12:30:00"));
        let cleaned = form.validate(&data).unwrap();
        assert_eq!(cleaned["your-birthday"], json!("1990-04-01"));
        assert_eq!(cleaned["your-birthtime"], json!("1990-04-01T12:30:00"));

        let mut data = valid_submission();
        data.insert("your-birthday".into(), json!("01/04/1990"));
        assert!(form.validate(&data).is_err());
    }

    #[test]
    fn validate_ignores_unknown_keys() {
        let form = compile(&sample_definitions());
        let mut data = valid_submission();
        data.insert("smuggled".into(), json!("payload"));
        let cleaned = form.validate(&data).unwrap();
        assert!(!cleaned.contains_key("smuggled"));
    }
}
