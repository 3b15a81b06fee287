//! Driving port shared by the collection store and the query cache.

use async_trait::async_trait;

use crate::domain::{CollectionSnapshot, Error, User, UserDraft, UserId, UserPatch};

/// Store-facing operations the inbound adapter drives.
///
/// Both engines honour the same contract: remote failures come back
/// unchanged as [`Error::Remote`], and a failure never discards the records
/// already held.
#[async_trait]
pub trait UsersStore: Send + Sync {
    /// Current snapshot without touching the network.
    fn snapshot(&self) -> CollectionSnapshot;

    /// Bring the collection up to date with the server.
    async fn load(&self) -> Result<(), Error>;

    /// Create a user from `draft`.
    async fn create(&self, draft: &UserDraft) -> Result<User, Error>;

    /// Apply `patch` to the user `id`.
    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<User, Error>;

    /// Delete the user `id`.
    async fn delete(&self, id: &UserId) -> Result<(), Error>;

    /// Snapshot once every completed mutation is reflected.
    async fn settled(&self) -> Result<CollectionSnapshot, Error>;
}
