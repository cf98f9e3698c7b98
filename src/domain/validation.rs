//! Form field validation.
//!
//! Checks a single input value against the rules for its field kind. This is
//! the check an `input` handler runs behind a debounce, so it has to be cheap:
//! patterns are compiled once and reused.

use regex::Regex;
use std::sync::OnceLock;

static RE_EMAIL: OnceLock<Regex> = OnceLock::new();
static RE_TEL: OnceLock<Regex> = OnceLock::new();

/// Kind of form field, derived from an HTML input `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `type="email"`
    Email,
    /// `type="tel"`
    Tel,
    /// Anything else, including textareas
    Text,
}

impl FieldKind {
    /// Map an input `type` attribute to a field kind.
    ///
    /// Matching is case-insensitive; unknown types are `Text`.
    pub fn from_input_type(input_type: &str) -> Self {
        if input_type.eq_ignore_ascii_case("email") {
            FieldKind::Email
        } else if input_type.eq_ignore_ascii_case("tel") {
            FieldKind::Tel
        } else {
            FieldKind::Text
        }
    }

    /// Value for the field's `autocomplete` attribute.
    pub fn autocomplete(&self) -> Option<&'static str> {
        match self {
            FieldKind::Email => Some("email"),
            FieldKind::Tel => Some("tel"),
            FieldKind::Text => None,
        }
    }

    /// Value for the field's `inputmode` attribute.
    pub fn input_mode(&self) -> Option<&'static str> {
        // Same hints as autocomplete for the kinds we know
        self.autocomplete()
    }
}

/// Outcome of validating one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValidity {
    /// Value is acceptable
    Valid,
    /// Field is required and the value is blank
    Missing,
    /// Value does not match the field's pattern
    Malformed,
}

impl FieldValidity {
    /// Check if the field is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldValidity::Valid)
    }
}

/// Validate a raw field value.
///
/// Surrounding whitespace is ignored. Email and tel patterns apply even to
/// blank optional fields, so a blank optional email is `Malformed`.
///
/// # Example
/// ```
/// use call_pacer::{validate_field, FieldKind, FieldValidity};
///
/// assert_eq!(validate_field(FieldKind::Email, " a@b.co ", true), FieldValidity::Valid);
/// assert_eq!(validate_field(FieldKind::Email, "", true), FieldValidity::Missing);
/// assert_eq!(validate_field(FieldKind::Tel, "0123", false), FieldValidity::Malformed);
/// ```
pub fn validate_field(kind: FieldKind, raw: &str, required: bool) -> FieldValidity {
    let value = raw.trim();

    if required && value.is_empty() {
        return FieldValidity::Missing;
    }

    let matches = match kind {
        FieldKind::Email => email_pattern().is_match(value),
        FieldKind::Tel => tel_pattern().is_match(value),
        FieldKind::Text => true,
    };

    if matches {
        FieldValidity::Valid
    } else {
        FieldValidity::Malformed
    }
}

fn email_pattern() -> &'static Regex {
    RE_EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid regex"))
}

fn tel_pattern() -> &'static Regex {
    RE_TEL.get_or_init(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("invalid regex"))
}
