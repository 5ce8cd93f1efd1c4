//! Interceptors that inspect or mutate outbound calls before they reach the
//! transport.
//!
//! # Integration Flow
//!
//! ```text
//! ServiceClient::call
//!   ↓
//! Chain::handle
//!   ↓
//! interceptor 1 → interceptor 2 → … (each receives `Next`)
//!   ↓
//! endpoint Handler (transport)
//! ```
//!
//! Interceptors run in registration order. Each one owns the call's
//! metadata for the duration of its stage and decides what to forward.

use std::sync::Arc;

use async_trait::async_trait;

use crate::credential::{CredentialStore, ACCESS_TOKEN_KEY};
use crate::metadata::{Metadata, BEARER_PREFIX};
use crate::rpc::{Handler, Request, Response, Status};

/// A pipeline stage in front of a [`Handler`].
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Processes one call and delegates to `next`.
    ///
    /// Implementations return whatever `next` returns unless they have a
    /// reason to short-circuit.
    async fn intercept(
        &self,
        request: Request,
        metadata: Metadata,
        next: Next<'_>,
    ) -> Result<Response, Status>;
}

/// The remainder of a chain, as seen by an interceptor.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    endpoint: &'a dyn Handler,
}

impl<'a> Next<'a> {
    /// Runs the rest of the chain.
    pub async fn run(self, request: Request, metadata: Metadata) -> Result<Response, Status> {
        match self.interceptors.split_first() {
            Some((first, rest)) => {
                let next = Next {
                    interceptors: rest,
                    endpoint: self.endpoint,
                };
                first.intercept(request, metadata, next).await
            }
            None => self.endpoint.handle(request, metadata).await,
        }
    }
}

/// An endpoint handler with interceptors stacked in front of it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use console_kit::{AuthInterceptor, Chain, MemoryStore};
/// # use console_kit::{Handler, Metadata, Request, Response, Status};
/// # struct Transport;
/// # #[async_trait::async_trait]
/// # impl Handler for Transport {
/// #     async fn handle(&self, _: Request, _: Metadata) -> Result<Response, Status> {
/// #         Ok(Response::new(serde_json::Value::Null))
/// #     }
/// # }
///
/// let store = Arc::new(MemoryStore::new());
/// let chain = Chain::new(Transport).with(AuthInterceptor::new(store));
/// assert_eq!(chain.len(), 1);
/// ```
pub struct Chain {
    interceptors: Vec<Arc<dyn Interceptor>>,
    endpoint: Arc<dyn Handler>,
}

impl Chain {
    /// Creates a chain that forwards straight to `endpoint`.
    pub fn new(endpoint: impl Handler + 'static) -> Self {
        Self {
            interceptors: Vec::new(),
            endpoint: Arc::new(endpoint),
        }
    }

    /// Appends an interceptor; it runs after the ones already registered.
    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Number of registered interceptors.
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Returns `true` if no interceptors are registered.
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

#[async_trait]
impl Handler for Chain {
    async fn handle(&self, request: Request, metadata: Metadata) -> Result<Response, Status> {
        let next = Next {
            interceptors: &self.interceptors,
            endpoint: self.endpoint.as_ref(),
        };
        next.run(request, metadata).await
    }
}

/// Attaches the stored bearer credential to calls that carry none.
///
/// An authorization entry set by the caller always wins. When the store has
/// no token the call goes out without one. Failures from downstream are
/// returned untouched: no retry, no refresh, no re-authentication.
pub struct AuthInterceptor<S> {
    store: S,
    token_key: String,
}

impl<S: CredentialStore> AuthInterceptor<S> {
    /// Reads the token from `store` under [`ACCESS_TOKEN_KEY`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            token_key: ACCESS_TOKEN_KEY.to_string(),
        }
    }

    /// Reads the token under a different storage key.
    pub fn with_token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
    }

    /// Storage key the token is read from.
    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    /// Applies the attachment rule to `metadata` without forwarding.
    ///
    /// An empty stored token is no token, and an empty authorization entry
    /// is replaced. Returns `true` if an authorization entry was added.
    pub fn attach(&self, metadata: &mut Metadata) -> bool {
        if metadata.has_authorization() {
            return false;
        }
        match self.store.get(&self.token_key) {
            Some(token) if !token.is_empty() => {
                let value = format!("{BEARER_PREFIX}{}", token.expose_secret());
                metadata.set_authorization(value);
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl<S: CredentialStore> Interceptor for AuthInterceptor<S> {
    async fn intercept(
        &self,
        request: Request,
        mut metadata: Metadata,
        next: Next<'_>,
    ) -> Result<Response, Status> {
        let attached = self.attach(&mut metadata);
        tracing::debug!(
            method = %request.method(),
            attached,
            authorized = metadata.has_authorization(),
            "auth interceptor"
        );

        next.run(request, metadata).await
    }
}
