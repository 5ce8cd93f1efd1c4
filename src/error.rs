use thiserror::Error;

use crate::roles::CreationType;
use crate::rpc::Status;

/// Result type used by the console collaborators.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the service-facing parts of the crate.
///
/// Validation failures are not represented here: they are ordinary return
/// values (see [`ValidationErrors`](crate::validators::ValidationErrors)).
#[derive(Debug, Error)]
pub enum Error {
    /// The downstream handler chain returned a failure status.
    #[error("rpc failed: {0}")]
    Rpc(#[from] Status),

    /// A response payload could not be decoded into the expected shape.
    #[error("malformed response payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// No role source has been mapped for the requested creation type.
    #[error("no role source mapped for creation type '{0}'")]
    UnmappedCreationType(CreationType),

    /// An operation needed an organization context that was not available.
    #[error("no organization selected")]
    MissingOrganization,

    /// A policy was edited or saved before it was loaded.
    #[error("policy has not been loaded")]
    PolicyNotLoaded,

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Returns the RPC status when this error came from the handler chain.
    pub fn status(&self) -> Option<&Status> {
        match self {
            Error::Rpc(status) => Some(status),
            _ => None,
        }
    }
}
