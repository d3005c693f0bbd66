//! Editor-authored form field schema: field types, definitions, and the
//! clean-name derivation used as the storage key for submitted values.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Field types
// ---------------------------------------------------------------------------

/// The type of a form field, persisted as a short string code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    SingleLine,
    MultiLine,
    Email,
    Number,
    Url,
    Checkbox,
    Checkboxes,
    Dropdown,
    Radio,
    Date,
    DateTime,
}

/// All supported field types, in display order.
pub const ALL_FIELD_TYPES: &[FieldType] = &[
    FieldType::SingleLine,
    FieldType::MultiLine,
    FieldType::Email,
    FieldType::Number,
    FieldType::Url,
    FieldType::Checkbox,
    FieldType::Checkboxes,
    FieldType::Dropdown,
    FieldType::Radio,
    FieldType::Date,
    FieldType::DateTime,
];

impl FieldType {
    /// The persisted wire code for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleLine => "singleline",
            Self::MultiLine => "multiline",
            Self::Email => "email",
            Self::Number => "number",
            Self::Url => "url",
            Self::Checkbox => "checkbox",
            Self::Checkboxes => "checkboxes",
            Self::Dropdown => "dropdown",
            Self::Radio => "radio",
            Self::Date => "date",
            Self::DateTime => "datetime",
        }
    }

    /// Parse a persisted wire code.
    pub fn parse(code: &str) -> Option<Self> {
        ALL_FIELD_TYPES.iter().copied().find(|t| t.as_str() == code)
    }

    /// Human-readable label for editor UIs.
    pub fn label(self) -> &'static str {
        match self {
            Self::SingleLine => "Single line text",
            Self::MultiLine => "Multi-line text",
            Self::Email => "Email",
            Self::Number => "Number",
            Self::Url => "URL",
            Self::Checkbox => "Checkbox",
            Self::Checkboxes => "Checkboxes",
            Self::Dropdown => "Drop down",
            Self::Radio => "Radio buttons",
            Self::Date => "Date",
            Self::DateTime => "Date/time",
        }
    }

    /// Whether this type draws its values from an editor-supplied option list.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Checkboxes | Self::Dropdown | Self::Radio)
    }
}

// ---------------------------------------------------------------------------
// Field definition
// ---------------------------------------------------------------------------

/// One editor-authored field definition, as stored on a survey page.
///
/// `choices` and `default_value` are comma-separated in storage; use
/// [`parse_choices`] / [`parse_defaults`] to split them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: DbId,
    pub label: String,
    pub clean_name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub choices: String,
    pub default_value: String,
    pub help_text: String,
    pub sort_order: i32,
}

/// Split a comma-separated `choices` string into trimmed, non-empty options.
pub fn parse_choices(choices: &str) -> Vec<String> {
    choices
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Split a comma-separated `default_value` string (multi-valued types only).
pub fn parse_defaults(default_value: &str) -> Vec<String> {
    parse_choices(default_value)
}

/// Validate an editor-supplied field label (non-empty, <= 255 chars).
pub fn validate_label(label: &str) -> Result<(), CoreError> {
    if label.trim().is_empty() {
        return Err(CoreError::Validation("Label must not be empty".into()));
    }
    if label.len() > 255 {
        return Err(CoreError::Validation(
            "Label must be at most 255 characters".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Clean-name derivation
// ---------------------------------------------------------------------------

/// Derive the storage/lookup key for a field from its label.
///
/// Transliterates to ASCII, lowercases, replaces runs of non-alphanumerics
/// with single hyphens, and trims leading/trailing hyphens. Deterministic:
/// the same label always yields the same clean name.
pub fn clean_name(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        match ascii_fold(c) {
            Some(folded) => {
                for f in folded.chars() {
                    push_slug_char(&mut slug, f);
                }
            }
            None => push_slug_char(&mut slug, c),
        }
    }
    slug.trim_matches('-').to_string()
}

fn push_slug_char(slug: &mut String, c: char) {
    if c.is_ascii_alphanumeric() {
        slug.push(c.to_ascii_lowercase());
    } else if !slug.ends_with('-') {
        slug.push('-');
    }
}

/// Transliterate a single accented Latin character to its ASCII base form.
///
/// Covers the Latin-1 supplement and the common Latin Extended-A letters;
/// anything else falls through to the slug's hyphen replacement.
fn ascii_fold(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'æ' => "ae",
        'Æ' => "AE",
        'ç' | 'ć' | 'ĉ' | 'č' => "c",
        'Ç' | 'Ć' | 'Ĉ' | 'Č' => "C",
        'ď' | 'đ' | 'ð' => "d",
        'Ď' | 'Đ' | 'Ð' => "D",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => "G",
        'ĥ' | 'ħ' => "h",
        'Ĥ' | 'Ħ' => "H",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => "I",
        'ĵ' => "j",
        'Ĵ' => "J",
        'ķ' => "k",
        'Ķ' => "K",
        'ĺ' | 'ļ' | 'ľ' | 'ł' => "l",
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ł' => "L",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => "O",
        'œ' => "oe",
        'Œ' => "OE",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'Ŕ' | 'Ŗ' | 'Ř' => "R",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => "S",
        'ţ' | 'ť' | 'ŧ' | 'þ' => "t",
        'Ţ' | 'Ť' | 'Ŧ' | 'Þ' => "T",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ŵ' => "w",
        'Ŵ' => "W",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'Ý' | 'Ÿ' | 'Ŷ' => "Y",
        'ź' | 'ż' | 'ž' => "z",
        'Ź' | 'Ż' | 'Ž' => "Z",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_codes_round_trip() {
        for t in ALL_FIELD_TYPES {
            assert_eq!(FieldType::parse(t.as_str()), Some(*t));
        }
        assert_eq!(FieldType::parse("telepathy"), None);
    }

    #[test]
    fn field_type_serde_uses_wire_codes() {
        let json = serde_json::to_string(&FieldType::DateTime).unwrap();
        assert_eq!(json, "\"datetime\"");
        let parsed: FieldType = serde_json::from_str("\"singleline\"").unwrap();
        assert_eq!(parsed, FieldType::SingleLine);
    }

    #[test]
    fn clean_name_basic() {
        assert_eq!(clean_name("Your name"), "your-name");
        assert_eq!(clean_name("Your favourite number"), "your-favourite-number");
    }

    #[test]
    fn clean_name_strips_punctuation() {
        assert_eq!(clean_name("Your birthtime :)"), "your-birthtime");
        assert_eq!(clean_name("I agree to the Terms of Use"), "i-agree-to-the-terms-of-use");
    }

    #[test]
    fn clean_name_transliterates() {
        assert_eq!(clean_name("Café"), "cafe");
        assert_eq!(clean_name("Über Straße"), "uber-strasse");
        assert_eq!(clean_name("Señor's œuvre"), "senor-s-oeuvre");
    }

    #[test]
    fn clean_name_collides_for_equivalent_labels() {
        // The collision the save-time policy guards against.
        assert_eq!(clean_name("Café"), clean_name("Cafe"));
    }

    #[test]
    fn parse_choices_trims_and_drops_empties() {
        assert_eq!(parse_choices("foo, bar ,baz"), vec!["foo", "bar", "baz"]);
        assert_eq!(parse_choices(""), Vec::<String>::new());
        assert_eq!(parse_choices(" , ,"), Vec::<String>::new());
    }

    #[test]
    fn label_validation() {
        assert!(validate_label("Your name").is_ok());
        assert!(validate_label("   ").is_err());
        assert!(validate_label(&"x".repeat(256)).is_err());
    }
}
