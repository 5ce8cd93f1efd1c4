//! Member role loading for the "add member" dialog.
//!
//! Which service lists the assignable roles depends on what the member is
//! being created for ([`CreationType`]). The mapping from creation type to
//! [`RoleSource`] is always supplied by the caller through
//! [`RoleSourceMap`]; nothing is mapped implicitly.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{Service, ServiceClient};
use crate::error::{Error, Result};
use crate::notify::Notifier;

/// What a new member is being added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationType {
    /// A project owned by the current organization.
    ProjectOwned,
    /// A project granted to the current organization.
    ProjectGranted,
    /// The organization itself.
    Org,
    /// The whole instance.
    Iam,
}

impl CreationType {
    /// Every creation type, in display order.
    pub const ALL: [CreationType; 4] = [
        CreationType::ProjectOwned,
        CreationType::ProjectGranted,
        CreationType::Org,
        CreationType::Iam,
    ];

    /// Stable identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            CreationType::ProjectOwned => "project_owned",
            CreationType::ProjectGranted => "project_granted",
            CreationType::Org => "org",
            CreationType::Iam => "iam",
        }
    }

    /// Localization key of the type's display label.
    pub fn label_key(self) -> &'static str {
        match self {
            CreationType::ProjectOwned => "MEMBER.CREATIONTYPE.PROJECT_OWNED",
            CreationType::ProjectGranted => "MEMBER.CREATIONTYPE.PROJECT_GRANTED",
            CreationType::Org => "MEMBER.CREATIONTYPE.ORG",
            CreationType::Iam => "MEMBER.CREATIONTYPE.IAM",
        }
    }
}

impl fmt::Display for CreationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lists the role names a member can be given.
#[async_trait]
pub trait RoleSource: Send + Sync {
    /// Fetches the assignable role names.
    async fn fetch_roles(&self) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct RolesResponse {
    #[serde(default, alias = "rolesList")]
    roles: Vec<String>,
}

/// Member roles listed by one backend method.
#[derive(Debug, Clone)]
pub struct MemberRoles {
    client: ServiceClient,
    method: &'static str,
}

impl MemberRoles {
    /// Roles for members of an owned project (management service).
    pub fn project(client: ServiceClient) -> Self {
        Self::with_method(client, Service::Management, "GetProjectMemberRoles")
    }

    /// Roles for members of a granted project (management service).
    pub fn project_grant(client: ServiceClient) -> Self {
        Self::with_method(client, Service::Management, "GetProjectGrantMemberRoles")
    }

    /// Roles for organization members (management service).
    pub fn org(client: ServiceClient) -> Self {
        Self::with_method(client, Service::Management, "GetOrgMemberRoles")
    }

    /// Roles for instance members (admin service).
    pub fn iam(client: ServiceClient) -> Self {
        Self::with_method(client, Service::Admin, "GetIamMemberRoles")
    }

    // The method only exists on `service`, whatever the client was built for.
    fn with_method(client: ServiceClient, service: Service, method: &'static str) -> Self {
        Self {
            client: client.with_service(service),
            method,
        }
    }

    /// The backend method this source calls.
    pub fn method(&self) -> &'static str {
        self.method
    }
}

#[async_trait]
impl RoleSource for MemberRoles {
    async fn fetch_roles(&self) -> Result<Vec<String>> {
        let response: RolesResponse = self.client.call(self.method, &json!({})).await?;
        Ok(response.roles)
    }
}

/// Explicit mapping from creation type to the source listing its roles.
#[derive(Default, Clone)]
pub struct RoleSourceMap {
    sources: HashMap<CreationType, Arc<dyn RoleSource>>,
}

impl RoleSourceMap {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `creation_type` to `source`, replacing any previous mapping.
    pub fn map(mut self, creation_type: CreationType, source: impl RoleSource + 'static) -> Self {
        self.sources.insert(creation_type, Arc::new(source));
        self
    }

    /// Returns `true` if `creation_type` has a source.
    pub fn is_mapped(&self, creation_type: CreationType) -> bool {
        self.sources.contains_key(&creation_type)
    }

    /// Creation types that have a source, in display order.
    pub fn mapped_types(&self) -> Vec<CreationType> {
        CreationType::ALL
            .into_iter()
            .filter(|t| self.is_mapped(*t))
            .collect()
    }

    /// Fetches the roles for `creation_type`.
    ///
    /// # Errors
    ///
    /// [`Error::UnmappedCreationType`] when no source is mapped, otherwise
    /// whatever the source returns.
    pub async fn fetch(&self, creation_type: CreationType) -> Result<Vec<String>> {
        let source = self
            .sources
            .get(&creation_type)
            .ok_or(Error::UnmappedCreationType(creation_type))?;
        source.fetch_roles().await
    }
}

impl fmt::Debug for RoleSourceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleSourceMap")
            .field("mapped", &self.mapped_types())
            .finish()
    }
}

/// How the member dialog was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Closed without adding anyone.
    Cancelled,
    /// Confirmed with the selected users and roles.
    Confirmed {
        /// Selected user ids.
        users: Vec<String>,
        /// Selected role names.
        roles: Vec<String>,
    },
}

/// State of the "add member" dialog.
///
/// Opened with a creation type, it loads the role options right away.
/// Opened without one, it shows the creation-type selector first.
pub struct MemberDialog<N> {
    creation_type: Option<CreationType>,
    sources: RoleSourceMap,
    notifier: N,
    role_options: Vec<String>,
    users: Vec<String>,
    roles: Vec<String>,
}

impl<N: Notifier> MemberDialog<N> {
    /// Creates the dialog without loading anything.
    pub fn new(creation_type: Option<CreationType>, sources: RoleSourceMap, notifier: N) -> Self {
        Self {
            creation_type,
            sources,
            notifier,
            role_options: Vec::new(),
            users: Vec::new(),
            roles: Vec::new(),
        }
    }

    /// Creates the dialog and loads the role options if the type is known.
    pub async fn open(
        creation_type: Option<CreationType>,
        sources: RoleSourceMap,
        notifier: N,
    ) -> Self {
        let mut dialog = Self::new(creation_type, sources, notifier);
        if dialog.creation_type.is_some() {
            dialog.load_roles().await;
        }
        dialog
    }

    /// The selected creation type.
    pub fn creation_type(&self) -> Option<CreationType> {
        self.creation_type
    }

    /// `true` while the user still has to choose a creation type.
    pub fn shows_type_selector(&self) -> bool {
        self.creation_type.is_none()
    }

    /// Chooses a creation type. Previously loaded options are discarded.
    pub fn select_creation_type(&mut self, creation_type: CreationType) {
        self.creation_type = Some(creation_type);
        self.role_options.clear();
    }

    /// Loads the role options for the selected creation type.
    ///
    /// Returns `true` on success. A failure, including an unmapped type, is
    /// reported through the notifier once and leaves the options untouched.
    pub async fn load_roles(&mut self) -> bool {
        let Some(creation_type) = self.creation_type else {
            return false;
        };

        match self.sources.fetch(creation_type).await {
            Ok(roles) => {
                tracing::debug!(%creation_type, count = roles.len(), "member roles loaded");
                self.role_options = roles;
                true
            }
            Err(err) => {
                tracing::warn!(%creation_type, error = %err, "loading member roles failed");
                self.notifier.error(&err);
                false
            }
        }
    }

    /// Role names the user can choose from.
    pub fn role_options(&self) -> &[String] {
        &self.role_options
    }

    /// Adds a user to the selection (ignoring duplicates).
    pub fn add_user(&mut self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        if !self.users.contains(&user_id) {
            self.users.push(user_id);
        }
    }

    /// Selected user ids.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Replaces the selected roles.
    pub fn set_selected_roles(&mut self, roles: Vec<String>) {
        self.roles = roles;
    }

    /// Selected role names.
    pub fn selected_roles(&self) -> &[String] {
        &self.roles
    }

    /// Closes without adding anyone.
    pub fn close(self) -> DialogOutcome {
        DialogOutcome::Cancelled
    }

    /// Closes with the current selection.
    pub fn confirm(self) -> DialogOutcome {
        DialogOutcome::Confirmed {
            users: self.users,
            roles: self.roles,
        }
    }
}

impl<N> fmt::Debug for MemberDialog<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDialog")
            .field("creation_type", &self.creation_type)
            .field("role_options", &self.role_options)
            .field("users", &self.users)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}
