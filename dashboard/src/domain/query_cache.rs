//! Tag-invalidated query cache for the users collection.
//!
//! The cache keeps one query, keyed by the `Users` tag. Each tag carries a
//! generation counter: every successful mutation bumps it, which marks the
//! cached list stale. With active subscribers a refetch starts at once;
//! otherwise the next read refetches.
//!
//! ## Invariants
//! - At most one `list()` call is in flight; concurrent readers share it.
//! - Results are never applied over data from a newer generation.
//! - A reader that waits settles on data whose generation is at least that
//!   of the last completed mutation.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::ports::{UsersRemote, UsersRemoteError, UsersStore};
use crate::domain::{
    CollectionSnapshot, Error, User, UserDraft, UserId, UserPatch, UsersOperation,
};

/// Invalidation tags known to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    /// The users collection.
    Users,
}

/// Cached collection plus the generation its data was fetched for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySnapshot {
    collection: CollectionSnapshot,
    data_generation: u64,
}

impl QuerySnapshot {
    /// The cached collection.
    pub fn collection(&self) -> &CollectionSnapshot {
        &self.collection
    }

    /// Tag generation the cached data reflects; `0` before the first fetch.
    pub fn data_generation(&self) -> u64 {
        self.data_generation
    }
}

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<Vec<User>>, UsersRemoteError>>>;

struct InFlight {
    ticket: u64,
    generation: u64,
    future: SharedFetch,
}

struct CacheInner<R: ?Sized> {
    remote: Arc<R>,
    generation: AtomicU64,
    tickets: AtomicU64,
    subscribers: Arc<AtomicUsize>,
    in_flight: Mutex<Option<InFlight>>,
    state: watch::Sender<QuerySnapshot>,
}

/// Query cache engine. Clones share the same cache.
pub struct UsersQueryCache<R: ?Sized> {
    inner: Arc<CacheInner<R>>,
}

impl<R: ?Sized> Clone for UsersQueryCache<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Registration of an active reader. Dropping it unregisters the reader.
pub struct UsersSubscription {
    receiver: watch::Receiver<QuerySnapshot>,
    subscribers: Arc<AtomicUsize>,
}

impl UsersSubscription {
    /// Latest cached state.
    pub fn snapshot(&self) -> QuerySnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. Returns `None` once the cache is gone.
    pub async fn changed(&mut self) -> Option<QuerySnapshot> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Wait until the cached data reflects at least `generation`.
    pub async fn wait_for_generation(&mut self, generation: u64) -> Option<QuerySnapshot> {
        self.receiver
            .wait_for(|snapshot| snapshot.data_generation >= generation)
            .await
            .ok()
            .map(|snapshot| snapshot.clone())
    }
}

impl Drop for UsersSubscription {
    fn drop(&mut self) {
        self.subscribers.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lock(slot: &Mutex<Option<InFlight>>) -> MutexGuard<'_, Option<InFlight>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<R: ?Sized> UsersQueryCache<R> {
    /// Create an empty cache over `remote`. The data starts stale.
    pub fn new(remote: Arc<R>) -> Self {
        let (state, _) = watch::channel(QuerySnapshot::default());
        Self {
            inner: Arc::new(CacheInner {
                remote,
                generation: AtomicU64::new(1),
                tickets: AtomicU64::new(0),
                subscribers: Arc::new(AtomicUsize::new(0)),
                in_flight: Mutex::new(None),
                state,
            }),
        }
    }

    /// Current cached state.
    pub fn snapshot(&self) -> QuerySnapshot {
        self.inner.state.borrow().clone()
    }

    /// Current generation of the `Users` tag.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// Whether the cached data predates the current generation.
    pub fn is_stale(&self) -> bool {
        self.inner.state.borrow().data_generation < self.generation()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.load(Ordering::SeqCst)
    }

    /// Register an active reader of the `Users` tag.
    ///
    /// Registering does not fetch; pair it with [`Self::ensure_fresh`].
    pub fn subscribe(&self) -> UsersSubscription {
        self.inner.subscribers.fetch_add(1, Ordering::SeqCst);
        UsersSubscription {
            receiver: self.inner.state.subscribe(),
            subscribers: Arc::clone(&self.inner.subscribers),
        }
    }
}

impl<R> UsersQueryCache<R>
where
    R: UsersRemote + ?Sized + 'static,
{
    /// Return fresh data, fetching only when the cache is stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] when a required fetch fails.
    pub async fn ensure_fresh(&self) -> Result<QuerySnapshot, Error> {
        if self.is_stale() {
            self.fetch().await
        } else {
            Ok(self.snapshot())
        }
    }

    /// Fetch until the cached data is current, joining any in-flight fetch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] when the list call fails; cached data is kept.
    /// A failure from a fetch older than the cached data is ignored.
    pub async fn fetch(&self) -> Result<QuerySnapshot, Error> {
        loop {
            let (ticket, generation, future) = self.join_or_start();
            let result = future.await;
            self.finish(ticket);
            let snapshot = self.apply(generation, result)?;
            if snapshot.data_generation >= self.generation() {
                return Ok(snapshot);
            }
        }
    }

    /// Mark `tag` stale and refetch in the background when anyone is reading.
    pub fn invalidate(&self, tag: CacheTag) {
        let CacheTag::Users = tag;
        let generation = self
            .inner
            .generation
            .fetch_add(1, Ordering::SeqCst)
            .saturating_add(1);
        let subscribers = self.subscriber_count();
        debug!(generation, subscribers, "users tag invalidated");
        if subscribers == 0 {
            return;
        }
        let Ok(runtime) = Handle::try_current() else {
            return;
        };
        let cache = self.clone();
        runtime.spawn(async move {
            if let Err(error) = cache.fetch().await {
                warn!(error = %error, "background users refetch failed");
            }
        });
    }

    fn join_or_start(&self) -> (u64, u64, SharedFetch) {
        let mut slot = lock(&self.inner.in_flight);
        if let Some(in_flight) = slot.as_ref() {
            return (
                in_flight.ticket,
                in_flight.generation,
                in_flight.future.clone(),
            );
        }

        // Read under the lock so a concurrent invalidation is either seen
        // here or triggers a later fetch.
        let generation = self.generation();
        let ticket = self.inner.tickets.fetch_add(1, Ordering::SeqCst);
        let remote = Arc::clone(&self.inner.remote);
        let future = async move { remote.list().await.map(Arc::new) }
            .boxed()
            .shared();
        *slot = Some(InFlight {
            ticket,
            generation,
            future: future.clone(),
        });
        drop(slot);

        debug!(generation, "users fetch started");
        self.inner.state.send_modify(|snapshot| snapshot.collection.begin_load());
        (ticket, generation, future)
    }

    fn finish(&self, ticket: u64) {
        let mut slot = lock(&self.inner.in_flight);
        if slot.as_ref().is_some_and(|in_flight| in_flight.ticket == ticket) {
            *slot = None;
        }
    }

    fn apply(
        &self,
        generation: u64,
        result: Result<Arc<Vec<User>>, UsersRemoteError>,
    ) -> Result<QuerySnapshot, Error> {
        match result {
            Ok(records) => {
                self.inner.state.send_if_modified(|snapshot| {
                    if generation < snapshot.data_generation {
                        return false;
                    }
                    if generation == snapshot.data_generation
                        && snapshot.collection.shares_records(&records)
                    {
                        return false;
                    }
                    snapshot.collection.replace_records(records);
                    snapshot.data_generation = generation;
                    true
                });
                Ok(self.snapshot())
            }
            Err(error) => {
                warn!(%error, "users fetch failed");
                let message = error.to_string();
                let superseded = !self.inner.state.send_if_modified(|snapshot| {
                    if generation < snapshot.data_generation {
                        return false;
                    }
                    snapshot.collection.fail(message);
                    true
                });
                if superseded {
                    debug!(generation, "failed fetch superseded by newer data");
                    return Ok(self.snapshot());
                }
                Err(error.into())
            }
        }
    }

    /// The merge base for an update. A stale cache is refreshed first so
    /// earlier mutations are never reverted.
    async fn cached_user(&self, id: &UserId) -> Result<User, Error> {
        self.ensure_fresh()
            .await?
            .collection
            .find(id)
            .cloned()
            .ok_or_else(|| Error::UnknownUser { id: id.clone() })
    }

    fn mutation_failed(operation: UsersOperation, error: Error) -> Error {
        warn!(%operation, code = ?error.code(), error = %error, "users mutation failed");
        error
    }

    /// Create a user, then invalidate the `Users` tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] when the create call fails.
    pub async fn create(&self, draft: &UserDraft) -> Result<User, Error> {
        let created = self
            .inner
            .remote
            .create(draft)
            .await
            .map_err(|e| Self::mutation_failed(UsersOperation::Create, e.into()))?;
        self.invalidate(CacheTag::Users);
        Ok(created)
    }

    /// Merge `patch` onto the current user `id`, send it, then invalidate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownUser`] when `id` is not in fresh data, or
    /// [`Error::Remote`] when a call fails.
    pub async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<User, Error> {
        let existing = self
            .cached_user(id)
            .await
            .map_err(|e| Self::mutation_failed(UsersOperation::Update, e))?;
        let merged = existing.merged_with(patch);
        let updated = self
            .inner
            .remote
            .update(id, &merged)
            .await
            .map_err(|e| Self::mutation_failed(UsersOperation::Update, e.into()))?;
        self.invalidate(CacheTag::Users);
        Ok(updated)
    }

    /// Delete `id`, then invalidate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] when the delete call fails.
    pub async fn delete(&self, id: &UserId) -> Result<(), Error> {
        self.inner
            .remote
            .delete(id)
            .await
            .map_err(|e| Self::mutation_failed(UsersOperation::Delete, e.into()))?;
        self.invalidate(CacheTag::Users);
        Ok(())
    }
}

#[async_trait]
impl<R> UsersStore for UsersQueryCache<R>
where
    R: UsersRemote + ?Sized + 'static,
{
    fn snapshot(&self) -> CollectionSnapshot {
        Self::snapshot(self).collection
    }

    async fn load(&self) -> Result<(), Error> {
        self.ensure_fresh().await.map(drop)
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
        self.ensure_fresh().await.map(|snapshot| snapshot.collection)
    }
}

#[cfg(test)]
#[path = "query_cache_tests.rs"]
mod tests;
