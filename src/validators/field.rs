use std::collections::BTreeMap;
use std::fmt;

use super::{ValidationErrors, Validator, ValidatorSet};

/// The current value of a form field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    /// No value has been entered.
    #[default]
    Absent,
    /// A single text value.
    Text(String),
    /// A list of text values (chips, multi-selects).
    List(Vec<String>),
}

impl FieldValue {
    /// `true` for an absent value, empty text or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The items, if this is a list value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Characters of a text value, or items of a list. Absent is 0.
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Absent => 0,
            FieldValue::Text(s) => s.chars().count(),
            FieldValue::List(items) => items.len(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Absent)
    }
}

/// A value under validation, plus the form it belongs to when there is one.
#[derive(Clone, Copy)]
pub struct Field<'a> {
    value: &'a FieldValue,
    parent: Option<&'a FormGroup>,
}

impl<'a> Field<'a> {
    /// A standalone field with no surrounding form.
    pub fn new(value: &'a FieldValue) -> Self {
        Self {
            value,
            parent: None,
        }
    }

    /// A field that belongs to `parent`.
    pub fn with_parent(value: &'a FieldValue, parent: &'a FormGroup) -> Self {
        Self {
            value,
            parent: Some(parent),
        }
    }

    /// The current value.
    pub fn value(&self) -> &'a FieldValue {
        self.value
    }

    /// The surrounding form, if the field is attached to one yet.
    pub fn parent(&self) -> Option<&'a FormGroup> {
        self.parent
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("value", self.value)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

struct Control {
    value: FieldValue,
    validators: ValidatorSet,
}

/// A set of named fields, each with its own validators.
///
/// Validators see the group as their field's parent, which is how
/// cross-field checks such as
/// [`password_confirm_validator`](super::password_confirm_validator) find
/// their sibling.
///
/// # Examples
///
/// ```
/// use console_kit::validators::{
///     min_length_validator, password_confirm_validator, required_validator, FormGroup,
///     ValidatorSet,
/// };
///
/// let mut form = FormGroup::new();
/// form.add_control(
///     "password",
///     "",
///     ValidatorSet::new().with(required_validator).with(min_length_validator(8)),
/// );
/// form.add_control(
///     "confirmPassword",
///     "",
///     ValidatorSet::new().with(password_confirm_validator()),
/// );
///
/// form.set_value("password", "correct horse");
/// form.set_value("confirmPassword", "correct hose");
///
/// let errors = form.validate();
/// assert!(errors["confirmPassword"].contains("pwnotequal"));
/// assert!(!errors.contains_key("password"));
/// ```
#[derive(Default)]
pub struct FormGroup {
    controls: BTreeMap<String, Control>,
}

impl FormGroup {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a control.
    pub fn add_control(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
        validators: ValidatorSet,
    ) {
        self.controls.insert(
            name.into(),
            Control {
                value: value.into(),
                validators,
            },
        );
    }

    /// Updates a control's value. Returns `false` if no such control exists.
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) -> bool {
        match self.controls.get_mut(name) {
            Some(control) => {
                control.value = value.into();
                true
            }
            None => false,
        }
    }

    /// The current value of a control.
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.controls.get(name).map(|c| &c.value)
    }

    /// Control names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.controls.keys().map(String::as_str)
    }

    /// Runs one control's validators. Unknown controls are valid.
    pub fn validate_field(&self, name: &str) -> Option<ValidationErrors> {
        let control = self.controls.get(name)?;
        control
            .validators
            .validate(&Field::with_parent(&control.value, self))
    }

    /// Failures of every invalid control, by control name.
    pub fn validate(&self) -> BTreeMap<String, ValidationErrors> {
        self.controls
            .keys()
            .filter_map(|name| {
                self.validate_field(name)
                    .map(|errors| (name.clone(), errors))
            })
            .collect()
    }

    /// `true` when no control fails.
    pub fn is_valid(&self) -> bool {
        self.controls
            .keys()
            .all(|name| self.validate_field(name).is_none())
    }
}

impl fmt::Debug for FormGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.controls.iter().map(|(k, c)| (k, &c.value)))
            .finish()
    }
}
