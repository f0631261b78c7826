use super::{ApiError, StoreError};
use crate::domain_model::Identity;

/// Where the session stands.
///
/// Starts `Unresolved` until the first `resolve` settles; afterwards it moves
/// between `Authenticated` and `Anonymous` for the rest of the process.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum SessionState {
    #[default]
    Unresolved,
    Authenticated(Identity),
    Anonymous,
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, SessionState::Unresolved)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("session is not authenticated")]
    NotAuthenticated,
}
