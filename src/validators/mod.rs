//! Composable field validators with localizable failures.
//!
//! Every validator maps a [`Field`] to `Option<ValidationErrors>`: `None`
//! means valid, `Some` carries one or more failures, each labeled with a
//! localization key the presentation layer renders.
//!
//! Pattern checks skip empty values, so presence is always enforced by
//! [`required_validator`] on its own. Pattern checks apply to text only: an
//! empty list passes like any empty value, a non-empty list always fails. Several validators on one field merge
//! into a single result whose keys are the union of each failure.
//!
//! # Examples
//!
//! ```
//! use console_kit::validators::{
//!     contains_number_validator, contains_upper_case_validator, Field, FieldValue, Validator,
//!     ValidatorSet,
//! };
//!
//! let password_rules = ValidatorSet::new()
//!     .with(contains_number_validator)
//!     .with(contains_upper_case_validator);
//!
//! let value = FieldValue::from("abc");
//! let errors = password_rules.validate(&Field::new(&value)).unwrap();
//!
//! assert!(errors.contains("numbererror"));
//! assert!(errors.contains("uppercasemissing"));
//! ```

mod builtin;
mod cross_field;
mod errors;
mod field;
mod pattern;

pub use builtin::{
    email_validator, i18n_validator, min_array_length_validator, min_length_validator,
    required_validator,
};
pub use cross_field::{
    password_confirm_validator, password_confirm_validator_for, passwords_match,
    DEFAULT_PASSWORD_FIELD,
};
pub use errors::{error_key, FieldError, Params, ValidationErrors};
pub use field::{Field, FieldValue, FormGroup};
pub use pattern::{
    contains_lower_case_validator, contains_number_validator, contains_symbol_validator,
    contains_upper_case_validator, phone_validator,
};

/// Localization keys of the built-in validators.
pub mod keys {
    /// Missing symbol.
    pub const SYMBOL_ERROR: &str = "ERRORS.SYMBOLERROR";
    /// Missing digit.
    pub const NUMBER_ERROR: &str = "ERRORS.NUMBERERROR";
    /// Missing uppercase letter.
    pub const UPPER_CASE_MISSING: &str = "ERRORS.UPPERCASEMISSING";
    /// Missing lowercase letter.
    pub const LOWER_CASE_MISSING: &str = "ERRORS.LOWERCASEMISSING";
    /// Malformed phone number.
    pub const PHONE: &str = "ERRORS.PHONE";
    /// Value required.
    pub const REQUIRED: &str = "ERRORS.REQUIRED";
    /// Not an email address.
    pub const NOT_AN_EMAIL: &str = "ERRORS.NOTANEMAIL";
    /// Too short.
    pub const MIN_LENGTH: &str = "ERRORS.MINLENGTH";
    /// List needs more (non-blank) entries.
    pub const AT_LEAST_ONE: &str = "ERRORS.ATLEASTONE";
    /// Password confirmation differs.
    pub const PW_NOT_EQUAL: &str = "ERRORS.PWNOTEQUAL";
}

/// A check applied to a field's current value.
///
/// Implemented for every `Fn(&Field<'_>) -> Option<ValidationErrors>`, so
/// plain functions and closures are validators.
///
/// # Invariants
///
/// Implementations MUST:
/// - Return `None` when the value is acceptable, never an empty result
/// - Label every failure with a localization key
/// - Not mutate anything; the same field validates the same way twice
pub trait Validator: Send + Sync {
    /// Validates `field`.
    fn validate(&self, field: &Field<'_>) -> Option<ValidationErrors>;
}

impl<F> Validator for F
where
    F: Fn(&Field<'_>) -> Option<ValidationErrors> + Send + Sync,
{
    fn validate(&self, field: &Field<'_>) -> Option<ValidationErrors> {
        self(field)
    }
}

/// Runs every validator on `field` and merges their failures.
pub fn compose(validators: &[&dyn Validator], field: &Field<'_>) -> Option<ValidationErrors> {
    validators.iter().fold(None, |acc, validator| {
        ValidationErrors::merge_results(acc, validator.validate(field))
    })
}

/// An ordered pipeline of validators for one field.
#[derive(Default)]
pub struct ValidatorSet {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorSet {
    /// An empty set; it accepts every value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validator.
    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Number of validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns `true` if the set has no validators.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl Validator for ValidatorSet {
    fn validate(&self, field: &Field<'_>) -> Option<ValidationErrors> {
        self.validators.iter().fold(None, |acc, validator| {
            ValidationErrors::merge_results(acc, validator.validate(field))
        })
    }
}

impl std::fmt::Debug for ValidatorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorSet")
            .field("len", &self.validators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composition_keeps_every_failure() {
        let value = FieldValue::from("abc");
        let field = Field::new(&value);

        let errors = compose(
            &[&contains_number_validator, &contains_upper_case_validator],
            &field,
        )
        .unwrap();

        assert_eq!(errors.len(), 2);
        assert!(errors.contains("numbererror"));
        assert!(errors.contains("uppercasemissing"));
        assert!(errors.invalid());
    }

    #[test]
    fn composition_of_passing_validators_is_none() {
        let value = FieldValue::from("Abc1!");
        let set = ValidatorSet::new()
            .with(contains_number_validator)
            .with(contains_upper_case_validator)
            .with(contains_lower_case_validator)
            .with(contains_symbol_validator)
            .with(min_length_validator(4));

        assert_eq!(set.len(), 5);
        assert!(set.validate(&Field::new(&value)).is_none());
    }

    #[test]
    fn empty_set_accepts_everything() {
        let set = ValidatorSet::new();
        assert!(set.is_empty());
        assert!(set.validate(&Field::new(&FieldValue::Absent)).is_none());
    }

    #[test]
    fn required_plus_pattern_on_empty_value() {
        let set = ValidatorSet::new()
            .with(required_validator)
            .with(contains_number_validator);

        let errors = set.validate(&Field::new(&FieldValue::from(""))).unwrap();
        let keys: Vec<&str> = errors.keys().collect();
        assert_eq!(keys, vec!["required"]);
    }

    #[test]
    fn closures_are_validators() {
        let no_admin = |field: &Field<'_>| {
            (field.value().as_text() == Some("admin"))
                .then(|| ValidationErrors::single("USER.NAME.RESERVED", None))
        };
        let set = ValidatorSet::new().with(no_admin).with(required_validator);

        let value = FieldValue::from("admin");
        let errors = set.validate(&Field::new(&value)).unwrap();
        assert!(errors.contains("reserved"));
    }

    mod proptests {
        use super::*;
        use crate::test_utils::arb_password;
        use proptest::prelude::*;

        proptest! {
            /// Property: a composed result holds exactly the union of the individual failures
            #[test]
            fn proptest_compose_is_union(input in arb_password()) {
                let value = FieldValue::from(input);
                let field = Field::new(&value);
                let validators: [&dyn Validator; 4] = [
                    &contains_number_validator,
                    &contains_upper_case_validator,
                    &contains_lower_case_validator,
                    &contains_symbol_validator,
                ];

                let mut expected: Vec<String> = validators
                    .iter()
                    .filter_map(|v| v.validate(&field))
                    .flat_map(|e| e.keys().map(str::to_string).collect::<Vec<_>>())
                    .collect();
                expected.sort();

                let composed: Vec<String> = compose(&validators, &field)
                    .map(|e| e.keys().map(str::to_string).collect())
                    .unwrap_or_default();

                prop_assert_eq!(composed, expected);
            }
        }
    }
}
