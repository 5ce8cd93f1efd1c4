use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::pattern::compiled;
use super::{keys, Field, FieldValue, Params, ValidationErrors, Validator};

// HTML form email grammar: dot-atom local part, LDH domain labels.
const EMAIL: &str = r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";
const EMAIL_MAX_LEN: usize = 254;
const EMAIL_LOCAL_MAX_LEN: usize = 64;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, EMAIL)
}

fn is_email(text: &str) -> bool {
    if text.len() > EMAIL_MAX_LEN {
        return false;
    }
    match text.split_once('@') {
        Some((local, _)) if local.len() <= EMAIL_LOCAL_MAX_LEN => email_regex().is_match(text),
        _ => false,
    }
}

/// Re-labels a validator's failure with `localization_key` and `params`.
///
/// When `validator` fails, the result keeps its own failures and adds one
/// keyed by [`error_key`](super::error_key) of `localization_key`. On a key
/// clash the new label wins. When `validator` passes, so does the wrapper.
///
/// ```
/// use console_kit::validators::{i18n_validator, required_validator, Field, FieldValue};
///
/// let v = i18n_validator("USER.PROFILE.NICKNAME.REQUIRED", required_validator, None);
/// let errors = v(&Field::new(&FieldValue::Absent)).unwrap();
/// assert!(errors.contains("required"));
/// assert_eq!(
///     errors.get("required").unwrap().localization_key(),
///     "USER.PROFILE.NICKNAME.REQUIRED"
/// );
/// ```
pub fn i18n_validator<V: Validator>(
    localization_key: impl Into<String>,
    validator: V,
    params: Option<Params>,
) -> impl Fn(&Field<'_>) -> Option<ValidationErrors> + Send + Sync {
    let localization_key = localization_key.into();
    move |field: &Field<'_>| {
        let inner = validator.validate(field)?;
        let mut relabeled = ValidationErrors::single(localization_key.clone(), params.clone());
        relabeled.merge(inner);
        Some(relabeled)
    }
}

/// Fails when the value is absent, empty text or an empty list.
pub fn required_validator(field: &Field<'_>) -> Option<ValidationErrors> {
    field
        .value()
        .is_empty()
        .then(|| ValidationErrors::single(keys::REQUIRED, None))
}

/// Fails when a non-empty text value is not an email address.
pub fn email_validator(field: &Field<'_>) -> Option<ValidationErrors> {
    let value = field.value();
    if value.is_empty() {
        return None;
    }
    match value.as_text() {
        Some(text) if is_email(text) => None,
        _ => Some(ValidationErrors::single(keys::NOT_AN_EMAIL, None)),
    }
}

/// Fails when a non-empty value is shorter than `min_length`.
///
/// Text is measured in characters, lists in items. The failure carries
/// `requiredLength`.
///
/// ```
/// use console_kit::validators::{min_length_validator, Field, FieldValue};
///
/// let v = min_length_validator(8);
/// let errors = v(&Field::new(&FieldValue::from("short"))).unwrap();
/// assert_eq!(errors.get("minlength").unwrap().param("requiredLength"), Some(&8.into()));
/// assert!(v(&Field::new(&FieldValue::from("longenough"))).is_none());
/// ```
pub fn min_length_validator(
    min_length: usize,
) -> impl Fn(&Field<'_>) -> Option<ValidationErrors> + Send + Sync + Clone {
    move |field: &Field<'_>| {
        let value = field.value();
        if value.is_empty() || value.len() >= min_length {
            return None;
        }
        let mut params = Params::new();
        params.insert("requiredLength".to_string(), Value::from(min_length));
        Some(ValidationErrors::single(keys::MIN_LENGTH, Some(params)))
    }
}

/// Fails unless the value is a list of at least `min_items` non-blank entries.
///
/// An absent (or non-list) value fails, and so does any entry that is empty
/// after trimming.
pub fn min_array_length_validator(
    min_items: usize,
) -> impl Fn(&Field<'_>) -> Option<ValidationErrors> + Send + Sync + Clone {
    move |field: &Field<'_>| array_length(field.value(), min_items, keys::AT_LEAST_ONE)
}

fn array_length(
    value: &FieldValue,
    min_items: usize,
    localization_key: &str,
) -> Option<ValidationErrors> {
    let ok = value.as_list().is_some_and(|items| {
        items.len() >= min_items && items.iter().all(|item| !item.trim().is_empty())
    });
    if ok {
        None
    } else {
        Some(ValidationErrors::single(localization_key, None))
    }
}
