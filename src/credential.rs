//! Access credentials and the store they are read from.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;

/// Storage field the console writes the access token to at login.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// A bearer access token that cannot be accidentally printed.
///
/// `Debug` and `Display` both render `[REDACTED]`. The raw token is only
/// reachable through [`expose_secret`](Self::expose_secret).
///
/// # Examples
///
/// ```
/// use console_kit::AccessToken;
///
/// let token = AccessToken::new("eyJhbGciOi");
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// assert_eq!(token.expose_secret(), "eyJhbGciOi");
/// ```
// Do NOT derive Debug, Display or Default: redaction depends on the manual impls below.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    // Must stay private; all reads go through expose_secret().
    inner: String,
}

impl AccessToken {
    /// Wraps a raw token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Explicitly exposes the raw token.
    ///
    /// The verbose name is intentional. The returned value must not end up
    /// in logs or user-facing output.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// Returns `true` when the token holds no characters.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Key-value store the credential is persisted in.
///
/// The interceptor only ever reads from the store. Writing happens at login
/// and removal at logout, both owned by the authentication flow.
pub trait CredentialStore: Send + Sync {
    /// Looks up a stored credential by key.
    fn get(&self, key: &str) -> Option<AccessToken>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<AccessToken> {
        (**self).get(key)
    }
}

/// Process-local credential store.
///
/// Reads take a shared lock, so many in-flight requests can resolve the
/// token concurrently.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a credential under `key`, replacing any previous value.
    pub fn store(&self, key: impl Into<String>, token: AccessToken) {
        let key = key.into();
        tracing::debug!(key = %key, "credential stored");
        self.entries.write().insert(key, token.inner);
    }

    /// Removes the credential stored under `key`, returning it.
    pub fn remove(&self, key: &str) -> Option<AccessToken> {
        self.entries.write().remove(key).map(AccessToken::new)
    }

    /// Drops every stored credential.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns `true` if a credential is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<AccessToken> {
        self.entries.read().get(key).cloned().map(AccessToken::new)
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        f.debug_struct("MemoryStore").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_redacts_debug() {
        let token = AccessToken::new("hunter2");
        let debug_output = format!("{:?}", token);

        assert_eq!(debug_output, "[REDACTED]");
        assert!(!debug_output.contains("hunter2"));
        assert!(!debug_output.contains("String"));
    }

    #[test]
    fn token_redacts_display() {
        let token = AccessToken::new("sk-1234567890");
        let display_output = format!("{}", token);

        assert_eq!(display_output, "[REDACTED]");
        assert!(!display_output.contains("sk-"));
    }

    #[test]
    fn token_exposes_when_explicit() {
        let token = AccessToken::new("abc");
        assert_eq!(token.expose_secret(), "abc");
        assert!(!token.is_empty());
        assert!(AccessToken::new("").is_empty());
    }

    #[test]
    fn store_round_trip_and_logout() {
        let store = MemoryStore::new();
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());

        store.store(ACCESS_TOKEN_KEY, AccessToken::new("t1"));
        assert_eq!(
            store
                .get(ACCESS_TOKEN_KEY)
                .map(|t| t.expose_secret().to_string()),
            Some("t1".to_string())
        );

        store.store(ACCESS_TOKEN_KEY, AccessToken::new("t2"));
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().expose_secret(), "t2");

        let removed = store.remove(ACCESS_TOKEN_KEY).expect("was stored");
        assert_eq!(removed.expose_secret(), "t2");
        assert!(!store.contains(ACCESS_TOKEN_KEY));
    }

    #[test]
    fn clear_drops_everything() {
        let store = MemoryStore::new();
        store.store("a", AccessToken::new("1"));
        store.store("b", AccessToken::new("2"));

        store.clear();

        assert!(store.get("a").is_none());
        assert!(store.get("b").is_none());
    }

    #[test]
    fn store_debug_lists_keys_only() {
        let store = MemoryStore::new();
        store.store(ACCESS_TOKEN_KEY, AccessToken::new("very-secret"));

        let debug_output = format!("{:?}", store);
        assert!(debug_output.contains(ACCESS_TOKEN_KEY));
        assert!(!debug_output.contains("very-secret"));
    }
}
