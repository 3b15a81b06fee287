//! Domain-level error types.
//!
//! Stores pass remote failures through untouched; the inbound adapter turns
//! them into notifications.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fields::ValidationError;
use super::ports::UsersRemoteError;
use super::user::UserId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The users endpoint could not be reached.
    Network,
    /// The users endpoint rejected the request.
    Remote,
    /// The users endpoint answered with an unexpected payload.
    Decode,
    /// Form input failed validation.
    Validation,
    /// The targeted user is not in the collection.
    UnknownUser,
}

/// Failure of a store operation.
///
/// # Examples
/// ```
/// use dashboard::domain::{Error, ErrorCode, UserId};
///
/// let err = Error::UnknownUser { id: UserId::Number(9) };
/// assert_eq!(err.code(), ErrorCode::UnknownUser);
/// assert_eq!(err.to_string(), "user 9 is not in the collection");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The remote call failed.
    #[error(transparent)]
    Remote(#[from] UsersRemoteError),
    /// An update targeted an id the collection does not hold.
    #[error("user {id} is not in the collection")]
    UnknownUser {
        /// The requested identifier.
        id: UserId,
    },
    /// Input failed form validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Remote(UsersRemoteError::Network { .. }) => ErrorCode::Network,
            Self::Remote(UsersRemoteError::Remote { .. }) => ErrorCode::Remote,
            Self::Remote(UsersRemoteError::Decode { .. }) => ErrorCode::Decode,
            Self::UnknownUser { .. } => ErrorCode::UnknownUser,
            Self::Validation(_) => ErrorCode::Validation,
        }
    }

    /// Message supplied by the server, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Remote(remote) => remote.server_message(),
            Self::UnknownUser { .. } | Self::Validation(_) => None,
        }
    }
}
