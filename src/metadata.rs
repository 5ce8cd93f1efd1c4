//! Outbound call metadata.
//!
//! Metadata is keyed by a closed set of header names instead of free-form
//! strings. Each outbound call owns its own [`Metadata`] instance, so no
//! synchronization is involved.

use std::collections::BTreeMap;
use std::fmt;

/// Prefix placed in front of the access token in the authorization entry.
pub const BEARER_PREFIX: &str = "Bearer ";

/// The metadata entries the console knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataKey {
    /// `Authorization`, carries the bearer credential.
    Authorization,
    /// `x-zitadel-orgid`, selects the organization a management call acts on.
    OrgId,
    /// `accept-language`, preferred language for server-side messages.
    AcceptLanguage,
}

impl MetadataKey {
    /// All known keys.
    pub const ALL: [MetadataKey; 3] = [
        MetadataKey::Authorization,
        MetadataKey::OrgId,
        MetadataKey::AcceptLanguage,
    ];

    /// Header name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            MetadataKey::Authorization => "Authorization",
            MetadataKey::OrgId => "x-zitadel-orgid",
            MetadataKey::AcceptLanguage => "accept-language",
        }
    }

    /// Resolves a wire header name (case-insensitive) to a known key.
    pub fn from_header_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to a single outbound call.
///
/// # Examples
///
/// ```
/// use console_kit::{Metadata, MetadataKey};
///
/// let mut md = Metadata::new();
/// assert!(md.authorization().is_none());
///
/// md.set_authorization("Bearer abc");
/// md.insert(MetadataKey::OrgId, "69629023906488334");
///
/// assert_eq!(md.authorization(), Some("Bearer abc"));
/// assert_eq!(md.get(MetadataKey::OrgId), Some("69629023906488334"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: BTreeMap<MetadataKey, String>,
}

impl Metadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: MetadataKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    /// Sets `key`, returning the previous value.
    pub fn insert(&mut self, key: MetadataKey, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key, value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: MetadataKey) -> Option<String> {
        self.entries.remove(&key)
    }

    /// Returns `true` if `key` has a value.
    pub fn contains(&self, key: MetadataKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// The authorization entry, if any.
    pub fn authorization(&self) -> Option<&str> {
        self.get(MetadataKey::Authorization)
    }

    /// Sets the authorization entry, replacing any previous value.
    pub fn set_authorization(&mut self, value: impl Into<String>) {
        self.insert(MetadataKey::Authorization, value);
    }

    /// Returns `true` if a non-empty authorization entry is present.
    ///
    /// An empty entry counts as no authorization at all.
    pub fn has_authorization(&self) -> bool {
        self.authorization().is_some_and(|value| !value.is_empty())
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataKey, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Authorization values are credentials and never show up in debug output.
impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.entries {
            match key {
                MetadataKey::Authorization => map.entry(&key.as_str(), &"[REDACTED]"),
                _ => map.entry(&key.as_str(), value),
            };
        }
        map.finish()
    }
}
