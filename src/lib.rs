//! Client-side core of an identity and access management console.
//!
//! This crate provides the parts of the console that carry behavior rather
//! than layout:
//! - **Credential attachment**: an interceptor that adds the stored bearer
//!   token to outbound calls which carry no authorization yet
//! - **Validation**: small composable field validators whose failures are
//!   labeled with localization keys
//! - **Role and policy loading**: capability traits the console's dialogs
//!   and policy pages fetch through, one implementation per backend
//!
//! # Core Types
//!
//! - [`AuthInterceptor`]: attaches `Authorization: Bearer <token>` from a [`CredentialStore`]
//! - [`Chain`]: interceptors stacked in front of a transport [`Handler`]
//! - [`ServiceClient`]: typed calls to one backend [`Service`] through a chain
//! - [`validators`]: `Validator`, `ValidatorSet`, `FormGroup` and the built-in checks
//! - [`RoleSourceMap`] / [`MemberDialog`]: role options per [`CreationType`]
//! - [`PolicySource`] / [`PolicyEditor`]: organization IAM policy editing
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use console_kit::{
//!     AccessToken, AuthInterceptor, Chain, Handler, MemoryStore, Metadata, Request, Response,
//!     Status, ACCESS_TOKEN_KEY,
//! };
//!
//! struct Transport;
//!
//! #[async_trait::async_trait]
//! impl Handler for Transport {
//!     async fn handle(&self, _: Request, metadata: Metadata) -> Result<Response, Status> {
//!         Ok(Response::new(serde_json::json!({
//!             "authorization": metadata.authorization()
//!         })))
//!     }
//! }
//!
//! let store = Arc::new(MemoryStore::new());
//! store.store(ACCESS_TOKEN_KEY, AccessToken::new("abc"));
//!
//! let chain = Chain::new(Transport).with(AuthInterceptor::new(store));
//! let request = Request::new("/svc/Ping", serde_json::json!({}));
//! let response = block_on(chain.handle(request, Metadata::new())).unwrap();
//! assert_eq!(response.payload()["authorization"], "Bearer abc");
//! # fn block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod credential;
mod error;
mod interceptor;
pub mod logging;
mod metadata;
mod notify;
mod policy;
mod roles;
mod rpc;
pub mod validators;

#[cfg(test)]
mod test_utils;

pub use client::{Service, ServiceClient};
pub use config::ConsoleConfig;
pub use credential::{AccessToken, CredentialStore, MemoryStore, ACCESS_TOKEN_KEY};
pub use error::{Error, Result};
pub use interceptor::{AuthInterceptor, Chain, Interceptor, Next};
pub use metadata::{Metadata, MetadataKey, BEARER_PREFIX};
pub use notify::{Notification, NotificationQueue, Notifier, TracingNotifier};
pub use policy::{
    AdminPolicySource, ManagementPolicySource, OrgIamPolicy, PolicyEditor, PolicySource,
    POLICY_SAVED_KEY,
};
pub use roles::{
    CreationType, DialogOutcome, MemberDialog, MemberRoles, RoleSource, RoleSourceMap,
};
pub use rpc::{Code, Handler, Request, Response, Status};
