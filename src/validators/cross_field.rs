use super::{keys, Field, FieldValue, ValidationErrors};

/// Name of the sibling control [`password_confirm_validator`] compares against.
pub const DEFAULT_PASSWORD_FIELD: &str = "password";

/// Fails with `pwnotequal` when `confirmation` differs from `password`.
///
/// This is the explicit two-value form of the confirmation check; the
/// validator factories below only resolve the sibling value and delegate
/// here.
pub fn passwords_match(
    password: &FieldValue,
    confirmation: &FieldValue,
) -> Option<ValidationErrors> {
    if password == confirmation {
        None
    } else {
        Some(ValidationErrors::single(keys::PW_NOT_EQUAL, None))
    }
}

/// Compares the field with its `password` sibling.
///
/// Equivalent to `password_confirm_validator_for(DEFAULT_PASSWORD_FIELD)`.
pub fn password_confirm_validator(
) -> impl Fn(&Field<'_>) -> Option<ValidationErrors> + Send + Sync + Clone {
    password_confirm_validator_for(DEFAULT_PASSWORD_FIELD)
}

/// Compares the field with the sibling control named `password_field`.
///
/// Passes while the field has no parent form or the parent has no such
/// sibling yet, which happens while a form is still being assembled.
pub fn password_confirm_validator_for(
    password_field: impl Into<String>,
) -> impl Fn(&Field<'_>) -> Option<ValidationErrors> + Send + Sync + Clone {
    let password_field = password_field.into();
    move |field: &Field<'_>| {
        let password = field.parent()?.value(&password_field)?;
        passwords_match(password, field.value())
    }
}
