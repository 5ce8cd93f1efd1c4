use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::{keys, Field, FieldValue, Params, ValidationErrors};

const SYMBOL: &str = "(?i)[^a-z0-9]";
const NUMBER: &str = "[0-9]";
const UPPER_CASE: &str = "[A-Z]";
const LOWER_CASE: &str = "[a-z]";
const PHONE: &str = r"^($|(\+|00)[0-9 ]+$)";

pub(super) fn compiled(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    // Patterns are crate constants; a compile failure is a programming error.
    cell.get_or_init(|| Regex::new(pattern).expect("built-in pattern compiles"))
}

/// Checks a non-empty value against `regex`, firing `localization_key` on mismatch.
///
/// Empty values always pass; pairing with
/// [`required_validator`](super::required_validator) enforces presence.
///
/// Lists are not stringified: an empty list is empty and passes, while a
/// non-empty list never matches a text pattern and fails, even when its
/// single entry would match on its own (`["1"]` fails the number check).
fn check(
    value: &FieldValue,
    regex: &Regex,
    localization_key: &str,
) -> Option<ValidationErrors> {
    if value.is_empty() {
        return None;
    }
    let matched = value.as_text().is_some_and(|text| regex.is_match(text));
    if matched {
        return None;
    }

    let mut params = Params::new();
    let pattern = Value::String(regex.as_str().to_string());
    params.insert("regexp".to_string(), pattern);
    Some(ValidationErrors::single(localization_key, Some(params)))
}

/// Requires at least one character that is neither a letter nor a digit.
pub fn contains_symbol_validator(field: &Field<'_>) -> Option<ValidationErrors> {
    static RE: OnceLock<Regex> = OnceLock::new();
    check(field.value(), compiled(&RE, SYMBOL), keys::SYMBOL_ERROR)
}

/// Requires at least one digit.
///
/// ```
/// use console_kit::validators::{contains_number_validator, Field, FieldValue};
///
/// let check = |v: &str| contains_number_validator(&Field::new(&FieldValue::from(v)));
/// assert!(check("").is_none());
/// assert!(check("abc").unwrap().contains("numbererror"));
/// assert!(check("abc1").is_none());
/// ```
pub fn contains_number_validator(field: &Field<'_>) -> Option<ValidationErrors> {
    static RE: OnceLock<Regex> = OnceLock::new();
    check(field.value(), compiled(&RE, NUMBER), keys::NUMBER_ERROR)
}

/// Requires at least one ASCII uppercase letter.
pub fn contains_upper_case_validator(field: &Field<'_>) -> Option<ValidationErrors> {
    static RE: OnceLock<Regex> = OnceLock::new();
    check(
        field.value(),
        compiled(&RE, UPPER_CASE),
        keys::UPPER_CASE_MISSING,
    )
}

/// Requires at least one ASCII lowercase letter.
pub fn contains_lower_case_validator(field: &Field<'_>) -> Option<ValidationErrors> {
    static RE: OnceLock<Regex> = OnceLock::new();
    check(
        field.value(),
        compiled(&RE, LOWER_CASE),
        keys::LOWER_CASE_MISSING,
    )
}

/// Accepts international numbers: `+` or `00`, then digits and spaces.
pub fn phone_validator(field: &Field<'_>) -> Option<ValidationErrors> {
    static RE: OnceLock<Regex> = OnceLock::new();
    check(field.value(), compiled(&RE, PHONE), keys::PHONE)
}
