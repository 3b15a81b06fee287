//! Manually synchronised collection store.
//!
//! Each mutation waits for the server and then threads the response into the
//! owned list: create appends, update replaces in place, delete removes.
//! Readers get immutable [`CollectionSnapshot`]s through a watch channel.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::ports::{UsersRemote, UsersStore};
use crate::domain::{
    CollectionSnapshot, Error, User, UserDraft, UserId, UserPatch, UsersOperation,
};

/// Single-writer store holding the full users collection.
pub struct CollectionStore<R: ?Sized> {
    remote: Arc<R>,
    state: watch::Sender<CollectionSnapshot>,
}

impl<R: ?Sized> CollectionStore<R> {
    /// Create an empty, idle store over `remote`.
    pub fn new(remote: Arc<R>) -> Self {
        let (state, _) = watch::channel(CollectionSnapshot::default());
        Self { remote, state }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> CollectionSnapshot {
        self.state.borrow().clone()
    }

    /// Receive a new snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<CollectionSnapshot> {
        self.state.subscribe()
    }

    fn record_failure(&self, operation: UsersOperation, error: Error) -> Error {
        warn!(%operation, code = ?error.code(), error = %error, "users store operation failed");
        let message = error.to_string();
        self.state.send_modify(|snapshot| snapshot.fail(message));
        error
    }
}

impl<R> CollectionStore<R>
where
    R: UsersRemote + ?Sized,
{
    /// Replace the collection with the server's list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] when the list call fails; records are kept.
    pub async fn load(&self) -> Result<(), Error> {
        self.state.send_modify(CollectionSnapshot::begin_load);
        match self.remote.list().await {
            Ok(records) => {
                debug!(count = records.len(), "users collection loaded");
                self.state
                    .send_modify(|snapshot| snapshot.replace_records(Arc::new(records)));
                Ok(())
            }
            Err(error) => Err(self.record_failure(UsersOperation::Load, error.into())),
        }
    }

    /// Create a user and append the server's record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] when the create call fails; records are kept.
    pub async fn create(&self, draft: &UserDraft) -> Result<User, Error> {
        match self.remote.create(draft).await {
            Ok(created) => {
                debug!(id = %created.id, "user created");
                let appended = created.clone();
                self.state.send_modify(|snapshot| {
                    snapshot.records_mut().push(appended);
                    snapshot.succeed();
                });
                Ok(created)
            }
            Err(error) => Err(self.record_failure(UsersOperation::Create, error.into())),
        }
    }

    /// Merge `patch` onto the stored user `id`, send the merged fields, and
    /// replace the record in place with the server's response.
    ///
    /// The response is matched by its own id, falling back to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownUser`] without calling the server when `id` is
    /// not in the collection, or when the target vanished before the
    /// response arrived. Returns [`Error::Remote`] when the update call fails.
    pub async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<User, Error> {
        let existing = self.state.borrow().find(id).cloned();
        let Some(existing) = existing else {
            return Err(self.record_failure(
                UsersOperation::Update,
                Error::UnknownUser { id: id.clone() },
            ));
        };

        let merged = existing.merged_with(patch);
        let updated = match self.remote.update(id, &merged).await {
            Ok(updated) => updated,
            Err(error) => return Err(self.record_failure(UsersOperation::Update, error.into())),
        };

        let replacement = updated.clone();
        let applied = self.state.send_if_modified(|snapshot| {
            let position = snapshot
                .records()
                .iter()
                .position(|user| user.id == replacement.id)
                .or_else(|| snapshot.records().iter().position(|user| &user.id == id));
            let Some(index) = position else {
                return false;
            };
            let Some(slot) = snapshot.records_mut().get_mut(index) else {
                return false;
            };
            *slot = replacement;
            snapshot.succeed();
            true
        });

        if applied {
            debug!(id = %updated.id, "user updated");
            Ok(updated)
        } else {
            Err(self.record_failure(
                UsersOperation::Update,
                Error::UnknownUser { id: id.clone() },
            ))
        }
    }

    /// Delete `id` on the server, then drop the first matching record.
    ///
    /// Removing an id that is already gone locally is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] when the delete call fails; records are kept.
    pub async fn delete(&self, id: &UserId) -> Result<(), Error> {
        if let Err(error) = self.remote.delete(id).await {
            return Err(self.record_failure(UsersOperation::Delete, error.into()));
        }

        self.state.send_modify(|snapshot| {
            let position = snapshot.records().iter().position(|user| &user.id == id);
            if let Some(index) = position {
                snapshot.records_mut().remove(index);
            }
            snapshot.succeed();
        });
        debug!(%id, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> UsersStore for CollectionStore<R>
where
    R: UsersRemote + ?Sized,
{
    fn snapshot(&self) -> CollectionSnapshot {
        Self::snapshot(self)
    }

    async fn load(&self) -> Result<(), Error> {
        Self::load(self).await
    }

    async fn create(&self, draft: &UserDraft) -> Result<User, Error> {
        Self::create(self, draft).await
    }

    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<User, Error> {
        Self::update(self, id, patch).await
    }

    async fn delete(&self, id: &UserId) -> Result<(), Error> {
        Self::delete(self, id).await
    }

    async fn settled(&self) -> Result<CollectionSnapshot, Error> {
        Ok(Self::snapshot(self))
    }
}

#[cfg(test)]
#[path = "collection_store_tests.rs"]
mod tests;
