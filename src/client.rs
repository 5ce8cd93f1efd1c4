//! Typed calls to the console's backend services.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ConsoleConfig;
use crate::error::Result;
use crate::metadata::{Metadata, MetadataKey};
use crate::rpc::{Handler, Request};

/// The backend services the console talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Organization-scoped management API.
    Management,
    /// Instance-wide administration API.
    Admin,
    /// API acting on the logged-in user.
    Auth,
}

impl Service {
    /// Fully qualified service name.
    pub fn name(self) -> &'static str {
        match self {
            Service::Management => "caos.zitadel.management.api.v1.ManagementService",
            Service::Admin => "caos.zitadel.admin.api.v1.AdminService",
            Service::Auth => "caos.zitadel.auth.api.v1.AuthService",
        }
    }

    /// Method path for `method` on this service.
    pub fn path(self, method: &str) -> String {
        format!("/{}/{}", self.name(), method)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Client for one [`Service`], sending through a shared handler chain.
///
/// Every call starts from fresh [`Metadata`], pre-filled with the configured
/// organization and language; credentials are left to the chain.
#[derive(Clone)]
pub struct ServiceClient {
    service: Service,
    handler: Arc<dyn Handler>,
    org_id: Option<String>,
    language: Option<String>,
}

impl ServiceClient {
    /// Creates a client for `service` sending through `handler`.
    pub fn new(service: Service, handler: Arc<dyn Handler>) -> Self {
        Self {
            service,
            handler,
            org_id: None,
            language: None,
        }
    }

    /// Applies organization and language from `config`.
    pub fn configured(mut self, config: &ConsoleConfig) -> Self {
        self.org_id = config.org_id.clone();
        self.language = config.language.clone();
        self
    }

    /// Sets the organization sent with every call.
    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// Targets `service` instead, keeping the handler chain and metadata.
    pub fn with_service(mut self, service: Service) -> Self {
        self.service = service;
        self
    }

    /// The service this client targets.
    pub fn service(&self) -> Service {
        self.service
    }

    /// Metadata every call starts with.
    pub fn base_metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        if let Some(org_id) = &self.org_id {
            metadata.insert(MetadataKey::OrgId, org_id.clone());
        }
        if let Some(language) = &self.language {
            metadata.insert(MetadataKey::AcceptLanguage, language.clone());
        }
        metadata
    }

    /// Calls `method` with `request` and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rpc`](crate::Error::Rpc) with the chain's status
    /// unchanged, or [`Error::Decode`](crate::Error::Decode) if either
    /// payload does not match its type.
    pub async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let path = self.service.path(method);
        let payload = serde_json::to_value(request)?;

        tracing::debug!(method = %path, "calling service");
        let response = self
            .handler
            .handle(Request::new(path.clone(), payload), self.base_metadata())
            .await
            .map_err(|status| {
                tracing::debug!(method = %path, code = ?status.code(), "service call failed");
                status
            })?;

        Ok(serde_json::from_value(response.into_payload())?)
    }
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("org_id", &self.org_id)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::rpc::{Code, Response, Status};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde::Deserialize;
    use serde_json::{json, Value};

    struct Echo {
        last: Mutex<Option<(String, Metadata)>>,
        reply: std::result::Result<Value, Status>,
    }

    impl Echo {
        fn replying(reply: std::result::Result<Value, Status>) -> Arc<Self> {
            Arc::new(Self {
                last: Mutex::new(None),
                reply,
            })
        }
    }

    #[async_trait]
    impl Handler for Echo {
        async fn handle(
            &self,
            request: Request,
            metadata: Metadata,
        ) -> std::result::Result<Response, Status> {
            *self.last.lock() = Some((request.method().to_string(), metadata));
            self.reply.clone().map(Response::new)
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Roles {
        roles: Vec<String>,
    }

    #[test]
    fn service_paths() {
        assert_eq!(
            Service::Admin.path("GetIamMemberRoles"),
            "/caos.zitadel.admin.api.v1.AdminService/GetIamMemberRoles"
        );
        assert_eq!(
            Service::Auth.to_string(),
            "caos.zitadel.auth.api.v1.AuthService"
        );
    }

    #[tokio::test]
    async fn call_decodes_response() {
        let echo = Echo::replying(Ok(json!({"roles": ["PROJECT_OWNER"]})));
        let client = ServiceClient::new(Service::Management, echo.clone());

        let roles: Roles = client
            .call("GetProjectMemberRoles", &json!({}))
            .await
            .unwrap();

        assert_eq!(roles.roles, vec!["PROJECT_OWNER".to_string()]);
        let (method, metadata) = echo.last.lock().clone().unwrap();
        assert_eq!(
            method,
            "/caos.zitadel.management.api.v1.ManagementService/GetProjectMemberRoles"
        );
        assert!(metadata.is_empty());
    }

    #[tokio::test]
    async fn call_stamps_configured_metadata() {
        let echo = Echo::replying(Ok(json!({"roles": []})));
        let config = ConsoleConfig {
            org_id: Some("org-1".into()),
            language: Some("de".into()),
            ..ConsoleConfig::default()
        };
        let client = ServiceClient::new(Service::Management, echo.clone()).configured(&config);

        let _: Roles = client.call("GetOrgMemberRoles", &json!({})).await.unwrap();

        let (_, metadata) = echo.last.lock().clone().unwrap();
        assert_eq!(metadata.get(MetadataKey::OrgId), Some("org-1"));
        assert_eq!(metadata.get(MetadataKey::AcceptLanguage), Some("de"));
        assert!(!metadata.has_authorization());
    }

    #[tokio::test]
    async fn with_service_retargets_and_keeps_metadata() {
        let echo = Echo::replying(Ok(json!({"roles": []})));
        let client = ServiceClient::new(Service::Management, echo.clone())
            .with_org_id("org-2")
            .with_service(Service::Admin);

        let _: Roles = client.call("GetIamMemberRoles", &json!({})).await.unwrap();

        let (method, metadata) = echo.last.lock().clone().unwrap();
        assert_eq!(
            method,
            "/caos.zitadel.admin.api.v1.AdminService/GetIamMemberRoles"
        );
        assert_eq!(metadata.get(MetadataKey::OrgId), Some("org-2"));
    }

    #[tokio::test]
    async fn call_surfaces_status() {
        let echo = Echo::replying(Err(Status::new(Code::NotFound, "no project")));
        let client = ServiceClient::new(Service::Management, echo);

        let err = client
            .call::<_, Roles>("GetProjectMemberRoles", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.status().map(Status::code), Some(Code::NotFound));
    }

    #[tokio::test]
    async fn call_reports_decode_errors() {
        let echo = Echo::replying(Ok(json!({"unexpected": 1})));
        let client = ServiceClient::new(Service::Admin, echo);

        let err = client
            .call::<_, Roles>("GetIamMemberRoles", &json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Decode(_)));
    }
}
