//! Contact form field validation
//!
//! Pure functions: the same input always yields the same states, and
//! nothing here touches the view. The dispatcher applies markers.

use regex::Regex;
use std::sync::LazyLock;

use super::fields::{ContactForm, FieldName, FormFieldState, ValidFields};
use crate::error::ValidationError;

/// Whitespace as browsers define it for `\s` and `trim()`: Unicode
/// `White_Space` without U+0085, plus U+FEFF.
const BLANK_CLASS: &str =
    r"\t\n\x{0B}\x{0C}\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

/// Something without whitespace or '@', an '@', then a dotted domain.
///
/// Loose on purpose: it only catches obvious typos, the endpoint does
/// the real checking.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let part = format!("[^@{BLANK_CLASS}]+");
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern compiles")
});

fn is_blank_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' ' | '\u{A0}' | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}' | '\u{3000}' | '\u{FEFF}'
    )
}

fn is_blank(value: &str) -> bool {
    value.trim_matches(is_blank_char).is_empty()
}

pub fn is_valid_name(value: &str) -> bool {
    !is_blank(value)
}

/// The email is matched as typed, without trimming.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_message(value: &str) -> bool {
    !is_blank(value)
}

fn check(field: FieldName, value: &str) -> bool {
    match field {
        FieldName::Name => is_valid_name(value),
        FieldName::Email => is_valid_email(value),
        FieldName::Message => is_valid_message(value),
    }
}

/// Per-field states in form order.
pub fn field_states(form: &ContactForm) -> [FormFieldState; 3] {
    FieldName::ALL.map(|field| {
        let raw_value = form.value(field).to_string();
        FormFieldState {
            name: field,
            is_valid: check(field, &raw_value),
            raw_value,
        }
    })
}

/// Validate the whole form.
///
/// On failure the error lists exactly the failing fields, in form order.
pub fn validate(form: &ContactForm) -> Result<ValidFields, ValidationError> {
    let invalid: Vec<FieldName> = field_states(form)
        .iter()
        .filter(|state| !state.is_valid)
        .map(|state| state.name)
        .collect();

    if invalid.is_empty() {
        Ok(ValidFields::new(form.clone()))
    } else {
        Err(ValidationError { invalid })
    }
}
