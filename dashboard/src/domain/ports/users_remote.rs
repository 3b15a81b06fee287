//! Driven port for the remote users endpoint.
//!
//! One call maps to one HTTP request. Adapters surface failures as they
//! happen; retrying and user-facing wording are decided further up.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{User, UserDraft, UserFields, UserId};

/// Errors surfaced while calling the users endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsersRemoteError {
    /// The request never produced a response.
    #[error("users service unreachable: {message}")]
    Network {
        /// Transport failure description.
        message: String,
    },
    /// The service answered with a non-success status.
    #[error("users service returned status {status}{}", describe_server_message(.message.as_deref()))]
    Remote {
        /// HTTP status code.
        status: u16,
        /// `message` field of a JSON error body, when the server sent one.
        message: Option<String>,
    },
    /// A success response did not carry the expected user payload.
    #[error("users service response decode failed: {message}")]
    Decode {
        /// Decoder failure description.
        message: String,
    },
}

fn describe_server_message(message: Option<&str>) -> String {
    message.map_or_else(String::new, |text| format!(": {text}"))
}

impl UsersRemoteError {
    /// Build a [`UsersRemoteError::Network`].
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Build a [`UsersRemoteError::Remote`].
    pub fn remote(status: u16, message: Option<String>) -> Self {
        Self::Remote { status, message }
    }

    /// Build a [`UsersRemoteError::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Remote { message, .. } => message.as_deref(),
            Self::Network { .. } | Self::Decode { .. } => None,
        }
    }

    /// HTTP status for [`UsersRemoteError::Remote`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Network { .. } | Self::Decode { .. } => None,
        }
    }
}

/// Port for the `users` collection resource.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersRemote: Send + Sync {
    /// Fetch every user, in server order.
    async fn list(&self) -> Result<Vec<User>, UsersRemoteError>;

    /// Create a user and return the stored record, including its new id.
    async fn create(&self, draft: &UserDraft) -> Result<User, UsersRemoteError>;

    /// Replace the fields of `id` and return the stored record.
    async fn update(&self, id: &UserId, fields: &UserFields) -> Result<User, UsersRemoteError>;

    /// Delete `id`. Any success response counts; its body is ignored.
    async fn delete(&self, id: &UserId) -> Result<(), UsersRemoteError>;
}
