//! End-to-end flows: credential store → interceptor chain → service client →
//! role and policy collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use console_kit::{
    AccessToken, AuthInterceptor, Chain, Code, ConsoleConfig, CreationType, DialogOutcome,
    Handler, ManagementPolicySource, MemberDialog, MemberRoles, MemoryStore, Metadata,
    MetadataKey, NotificationQueue, PolicyEditor, Request, Response, RoleSourceMap, Service,
    ServiceClient, Status,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// Fake gateway: answers role and policy methods, records what it saw.
#[derive(Default)]
struct Gateway {
    seen: Mutex<Vec<(String, Metadata)>>,
    reject_unauthenticated: bool,
}

#[async_trait]
impl Handler for Gateway {
    async fn handle(&self, request: Request, metadata: Metadata) -> Result<Response, Status> {
        self.seen
            .lock()
            .push((request.method().to_string(), metadata.clone()));

        if self.reject_unauthenticated && !metadata.has_authorization() {
            return Err(Status::new(Code::Unauthenticated, "missing token"));
        }

        let method = request.method().rsplit('/').next().unwrap_or_default();
        let payload: Value = match method {
            "GetProjectMemberRoles" => json!({"roles": ["PROJECT_OWNER", "PROJECT_VIEWER"]}),
            "GetProjectGrantMemberRoles" => json!({"rolesList": ["PROJECT_GRANT_OWNER"]}),
            "GetIamMemberRoles" => json!({"roles": ["IAM_OWNER"]}),
            "GetMyOrgIamPolicy" => {
                json!({"org_id": "org-1", "user_login_must_be_domain": true, "default": true})
            }
            _ => json!({}),
        };
        Ok(Response::new(payload))
    }
}

struct Console {
    gateway: Arc<Gateway>,
    store: Arc<MemoryStore>,
    management: ServiceClient,
    admin: ServiceClient,
}

fn console(gateway: Gateway) -> Console {
    let config = ConsoleConfig {
        org_id: Some("org-1".to_string()),
        ..ConsoleConfig::default()
    };
    let gateway = Arc::new(gateway);
    let store = Arc::new(MemoryStore::new());
    let key = config.access_token_key.clone();
    let auth = AuthInterceptor::new(store.clone()).with_token_key(key);
    let chain: Arc<dyn Handler> = Arc::new(Chain::new(gateway.clone()).with(auth));

    Console {
        management: ServiceClient::new(Service::Management, chain.clone()).configured(&config),
        admin: ServiceClient::new(Service::Admin, chain).configured(&config),
        gateway,
        store,
    }
}

#[tokio::test]
async fn member_dialog_loads_roles_with_credentials() {
    let console = console(Gateway::default());
    console
        .store
        .store(console_kit::ACCESS_TOKEN_KEY, AccessToken::new("token-1"));

    let management = console.management.clone();
    let owned = MemberRoles::project(management.clone());
    let granted = MemberRoles::project_grant(management);
    let sources = RoleSourceMap::new()
        .map(CreationType::ProjectOwned, owned)
        .map(CreationType::ProjectGranted, granted)
        .map(CreationType::Iam, MemberRoles::iam(console.admin.clone()));
    let queue = Arc::new(NotificationQueue::new());

    let mut dialog =
        MemberDialog::open(Some(CreationType::ProjectOwned), sources, queue.clone()).await;
    assert_eq!(
        dialog.role_options(),
        ["PROJECT_OWNER".to_string(), "PROJECT_VIEWER".to_string()]
    );

    dialog.select_creation_type(CreationType::ProjectGranted);
    assert!(dialog.load_roles().await);
    assert_eq!(dialog.role_options(), ["PROJECT_GRANT_OWNER".to_string()]);

    dialog.add_user("user-9");
    dialog.set_selected_roles(vec!["PROJECT_GRANT_OWNER".to_string()]);
    assert_eq!(
        dialog.confirm(),
        DialogOutcome::Confirmed {
            users: vec!["user-9".to_string()],
            roles: vec!["PROJECT_GRANT_OWNER".to_string()],
        }
    );

    let seen = console.gateway.seen.lock();
    assert_eq!(seen.len(), 2);
    for (_, metadata) in seen.iter() {
        assert_eq!(metadata.authorization(), Some("Bearer token-1"));
        assert_eq!(metadata.get(MetadataKey::OrgId), Some("org-1"));
    }
    assert!(queue.is_empty());
}

#[tokio::test]
async fn logout_stops_attaching_credentials() {
    let console = console(Gateway {
        reject_unauthenticated: true,
        ..Gateway::default()
    });
    console
        .store
        .store(console_kit::ACCESS_TOKEN_KEY, AccessToken::new("token-1"));
    let sources =
        RoleSourceMap::new().map(CreationType::Iam, MemberRoles::iam(console.admin.clone()));

    assert_eq!(
        sources.fetch(CreationType::Iam).await.unwrap(),
        vec!["IAM_OWNER".to_string()]
    );

    console.store.clear();
    let err = sources.fetch(CreationType::Iam).await.unwrap_err();
    assert_eq!(err.status().map(Status::code), Some(Code::Unauthenticated));

    let seen = console.gateway.seen.lock();
    assert!(seen[0].1.has_authorization());
    assert!(!seen[1].1.has_authorization());
}

#[tokio::test]
async fn rejected_role_load_surfaces_as_notification() {
    let console = console(Gateway {
        reject_unauthenticated: true,
        ..Gateway::default()
    });
    let sources =
        RoleSourceMap::new().map(CreationType::Iam, MemberRoles::iam(console.admin.clone()));
    let queue = Arc::new(NotificationQueue::new());

    let dialog = MemberDialog::open(Some(CreationType::Iam), sources, queue.clone()).await;

    assert!(dialog.role_options().is_empty());
    let notes = queue.drain();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].to_string().contains("missing token"));
    assert_eq!(console.gateway.seen.lock().len(), 1);
}

#[tokio::test]
async fn management_policy_round_trip() {
    let console = console(Gateway::default());
    console
        .store
        .store(console_kit::ACCESS_TOKEN_KEY, AccessToken::new("token-2"));
    let queue = Arc::new(NotificationQueue::new());
    let mut editor = PolicyEditor::new(
        ManagementPolicySource::new(
            console.management.clone(),
            console.admin.clone(),
            Some("org-1".to_string()),
        ),
        queue.clone(),
    );

    assert!(editor.load().await);
    assert!(editor.is_default());
    editor.set_user_login_must_be_domain(false).unwrap();
    assert!(editor.save().await);

    let methods: Vec<String> = console
        .gateway
        .seen
        .lock()
        .iter()
        .map(|(m, _)| m.clone())
        .collect();
    assert_eq!(
        methods,
        vec![
            "/caos.zitadel.management.api.v1.ManagementService/GetMyOrgIamPolicy".to_string(),
            "/caos.zitadel.admin.api.v1.AdminService/CreateOrgIamPolicy".to_string(),
        ]
    );
    assert_eq!(queue.drain().len(), 1);
}

#[test]
fn credentials_never_leak_through_debug() {
    let token = AccessToken::new("sk-secret123");
    assert_eq!(format!("{:?}", token), "[REDACTED]");
    assert_eq!(format!("{}", token), "[REDACTED]");

    let mut metadata = Metadata::new();
    metadata.set_authorization(format!("Bearer {}", token.expose_secret()));
    assert!(!format!("{:?}", metadata).contains("sk-secret123"));

    let store = MemoryStore::new();
    store.store("access_token", token);
    assert!(!format!("{:?}", store).contains("sk-secret123"));
}
