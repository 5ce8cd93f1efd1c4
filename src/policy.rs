//! Organization IAM policy: whether user login names must carry the
//! organization's domain.
//!
//! The policy can be edited from two places. Management reads the policy of
//! the current organization and, when it is still the instance default,
//! creates an organization-specific one on save. Admin reads and updates the
//! policy of an explicitly selected organization. Each is one
//! [`PolicySource`]; the [`PolicyEditor`] is built with the one it needs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::ServiceClient;
use crate::error::{Error, Result};
use crate::notify::Notifier;

/// Localization key shown after a successful save.
pub const POLICY_SAVED_KEY: &str = "ORG.POLICY.TOAST.SET";

/// Organization IAM policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgIamPolicy {
    /// Organization the policy belongs to.
    #[serde(default)]
    pub org_id: String,
    /// Login names must be suffixed with the organization domain.
    #[serde(default)]
    pub user_login_must_be_domain: bool,
    /// `true` while the organization inherits the instance default.
    #[serde(default, rename = "default")]
    pub is_default: bool,
}

/// Reads and writes the organization IAM policy through one backend.
#[async_trait]
pub trait PolicySource: Send + Sync {
    /// Loads the current policy.
    async fn fetch_policy(&self) -> Result<OrgIamPolicy>;

    /// Persists `policy`.
    async fn save_policy(&self, policy: &OrgIamPolicy) -> Result<()>;
}

#[derive(Serialize)]
struct PolicyChange<'a> {
    org_id: &'a str,
    user_login_must_be_domain: bool,
}

/// Policy of the current organization, as seen by the management service.
#[derive(Debug, Clone)]
pub struct ManagementPolicySource {
    management: ServiceClient,
    admin: ServiceClient,
    org_id: Option<String>,
}

impl ManagementPolicySource {
    /// Reads through `management`; saves through `admin` for `org_id`.
    pub fn new(management: ServiceClient, admin: ServiceClient, org_id: Option<String>) -> Self {
        Self {
            management,
            admin,
            org_id,
        }
    }
}

#[async_trait]
impl PolicySource for ManagementPolicySource {
    async fn fetch_policy(&self) -> Result<OrgIamPolicy> {
        self.management.call("GetMyOrgIamPolicy", &json!({})).await
    }

    async fn save_policy(&self, policy: &OrgIamPolicy) -> Result<()> {
        let org_id = self.org_id.as_deref().ok_or(Error::MissingOrganization)?;
        let change = PolicyChange {
            org_id,
            user_login_must_be_domain: policy.user_login_must_be_domain,
        };
        // A default policy is inherited; the organization needs its own first.
        let method = if policy.is_default {
            "CreateOrgIamPolicy"
        } else {
            "UpdateOrgIamPolicy"
        };
        let _: serde_json::Value = self.admin.call(method, &change).await?;
        Ok(())
    }
}

/// Policy of a selected organization, as seen by the admin service.
#[derive(Debug, Clone)]
pub struct AdminPolicySource {
    admin: ServiceClient,
    org_id: Option<String>,
}

impl AdminPolicySource {
    /// Reads and updates the policy of `org_id` through `admin`.
    pub fn new(admin: ServiceClient, org_id: Option<String>) -> Self {
        Self { admin, org_id }
    }

    fn org_id(&self) -> Result<&str> {
        self.org_id.as_deref().ok_or(Error::MissingOrganization)
    }
}

#[async_trait]
impl PolicySource for AdminPolicySource {
    async fn fetch_policy(&self) -> Result<OrgIamPolicy> {
        let org_id = self.org_id()?;
        let request = json!({ "id": org_id });
        self.admin.call("GetOrgIamPolicy", &request).await
    }

    async fn save_policy(&self, policy: &OrgIamPolicy) -> Result<()> {
        let change = PolicyChange {
            org_id: self.org_id()?,
            user_login_must_be_domain: policy.user_login_must_be_domain,
        };
        let _: serde_json::Value = self.admin.call("UpdateOrgIamPolicy", &change).await?;
        Ok(())
    }
}

/// Loads, edits and saves the policy through the source chosen at construction.
pub struct PolicyEditor<N> {
    source: Box<dyn PolicySource>,
    notifier: N,
    policy: Option<OrgIamPolicy>,
}

impl<N: Notifier> PolicyEditor<N> {
    /// Creates an editor; nothing is loaded yet.
    pub fn new(source: impl PolicySource + 'static, notifier: N) -> Self {
        Self {
            source: Box::new(source),
            notifier,
            policy: None,
        }
    }

    /// Loads the policy. Failures are notified and leave the editor as it was.
    pub async fn load(&mut self) -> bool {
        match self.source.fetch_policy().await {
            Ok(policy) => {
                tracing::debug!(
                    org_id = %policy.org_id,
                    is_default = policy.is_default,
                    "policy loaded"
                );
                self.policy = Some(policy);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "loading policy failed");
                self.notifier.error(&err);
                false
            }
        }
    }

    /// The loaded policy.
    pub fn policy(&self) -> Option<&OrgIamPolicy> {
        self.policy.as_ref()
    }

    /// `true` if the loaded policy is still the inherited default.
    pub fn is_default(&self) -> bool {
        self.policy.as_ref().is_some_and(|p| p.is_default)
    }

    /// Edits the loaded policy.
    ///
    /// # Errors
    ///
    /// [`Error::PolicyNotLoaded`] before a successful [`load`](Self::load).
    pub fn set_user_login_must_be_domain(&mut self, value: bool) -> Result<()> {
        let policy = self.policy.as_mut().ok_or(Error::PolicyNotLoaded)?;
        policy.user_login_must_be_domain = value;
        Ok(())
    }

    /// Saves the loaded policy, notifying success or failure.
    ///
    /// After creating an organization policy from a default one, the local
    /// copy is no longer marked default.
    pub async fn save(&mut self) -> bool {
        let result = match &self.policy {
            Some(policy) => self.source.save_policy(policy).await,
            None => Err(Error::PolicyNotLoaded),
        };

        match result {
            Ok(()) => {
                if let Some(policy) = self.policy.as_mut() {
                    policy.is_default = false;
                }
                self.notifier.info(POLICY_SAVED_KEY);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "saving policy failed");
                self.notifier.error(&err);
                false
            }
        }
    }
}
