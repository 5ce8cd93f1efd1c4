use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Parameters a localized message is rendered with (e.g. `requiredLength`).
pub type Params = Map<String, Value>;

/// Derives the error key of a localization key.
///
/// The key is the last dot-separated segment, lowercased:
/// `ERRORS.NUMBERERROR` becomes `numbererror`.
///
/// ```
/// use console_kit::validators::error_key;
///
/// assert_eq!(error_key("ERRORS.PWNOTEQUAL"), "pwnotequal");
/// assert_eq!(error_key("CUSTOM"), "custom");
/// ```
pub fn error_key(localization_key: &str) -> String {
    localization_key
        .rsplit('.')
        .next()
        .unwrap_or(localization_key)
        .to_lowercase()
}

/// One localized validation failure.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    valid: bool,
    localization_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Params>,
}

impl FieldError {
    /// Creates a failure for `localization_key`.
    pub fn new(localization_key: impl Into<String>, params: Option<Params>) -> Self {
        Self {
            valid: false,
            localization_key: localization_key.into(),
            params,
        }
    }

    /// Always `false`; kept so the serialized shape carries it.
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Message template identifier for the presentation layer.
    pub fn localization_key(&self) -> &str {
        &self.localization_key
    }

    /// Template parameters, if any.
    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    /// Looks up a single template parameter.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref().and_then(|p| p.get(name))
    }
}

/// The failures of one field, keyed by error key.
///
/// A value of this type always holds at least one failure; "valid" is
/// expressed as `None` by every validator. Merging keeps the union of keys
/// and never overwrites an entry that is already present.
///
/// Serializes as `{"invalid": true, "<key>": {"valid": false, "localizationKey": …, "params": …}, …}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    entries: BTreeMap<String, FieldError>,
}

impl ValidationErrors {
    /// A single failure keyed by [`error_key`] of its localization key.
    pub fn single(localization_key: impl Into<String>, params: Option<Params>) -> Self {
        let error = FieldError::new(localization_key, params);
        let mut entries = BTreeMap::new();
        entries.insert(error_key(error.localization_key()), error);
        Self { entries }
    }

    /// Returns the failure for `key`.
    pub fn get(&self, key: &str) -> Option<&FieldError> {
        self.entries.get(key)
    }

    /// Returns `true` if a failure is recorded under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Error keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Failures by key, sorted.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct failures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The top-level invalid marker. Always `true`.
    pub fn invalid(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Adds every failure of `other` whose key is not present yet.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (key, error) in other.entries {
            self.entries.entry(key).or_insert(error);
        }
    }

    /// Merges two optional results.
    pub fn merge_results(
        first: Option<ValidationErrors>,
        second: Option<ValidationErrors>,
    ) -> Option<ValidationErrors> {
        match (first, second) {
            (Some(mut a), Some(b)) => {
                a.merge(b);
                Some(a)
            }
            (a, b) => a.or(b),
        }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len() + 1))?;
        map.serialize_entry("invalid", &true)?;
        for (key, error) in &self.entries {
            map.serialize_entry(key, error)?;
        }
        map.end()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid:")?;
        for (i, (key, error)) in self.entries.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{key} ({})", error.localization_key)?;
        }
        Ok(())
    }
}
