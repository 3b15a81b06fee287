//! Command handlers shared by every store engine.

use std::io::Write;
use std::sync::Arc;

use tracing::{info, warn};

use super::form::{FieldAssignment, fields_from};
use super::notifications::Notification;
use super::render::Renderer;
use super::{CliError, Engine, Outcome};
use crate::domain::ports::{UsersRemote, UsersStore};
use crate::domain::{
    CollectionStore, Error, PageController, USER_FIELDS, UserFields, UserId, UsersOperation,
    UsersQueryCache, UsersSubscription, validate_fields,
};
use crate::outbound::location::UrlPageLocation;

/// One command session: a store engine, the page location, and output
/// formatting.
pub struct Dashboard {
    store: Arc<dyn UsersStore>,
    // Held so the query cache refetches as soon as a mutation invalidates it.
    _subscription: Option<UsersSubscription>,
    location: UrlPageLocation,
    controller: PageController,
    renderer: Renderer,
}

impl Dashboard {
    /// Wire `remote` into the selected engine.
    pub fn new(
        engine: Engine,
        remote: Arc<dyn UsersRemote>,
        location: UrlPageLocation,
        controller: PageController,
        renderer: Renderer,
    ) -> Self {
        let (store, subscription): (Arc<dyn UsersStore>, Option<UsersSubscription>) =
            match engine {
                Engine::Collection => {
                    let store: Arc<dyn UsersStore> = Arc::new(CollectionStore::new(remote));
                    (store, None)
                }
                Engine::QueryCache => {
                    let cache = UsersQueryCache::new(remote);
                    let subscription = cache.subscribe();
                    let store: Arc<dyn UsersStore> = Arc::new(cache);
                    (store, Some(subscription))
                }
            };
        Self {
            store,
            _subscription: subscription,
            location,
            controller,
            renderer,
        }
    }

    /// The page location after the last command.
    pub fn location(&self) -> &UrlPageLocation {
        &self.location
    }

    fn fail<W: Write + ?Sized>(
        &self,
        out: &mut W,
        operation: UsersOperation,
        error: &Error,
    ) -> Result<Outcome, CliError> {
        warn!(%operation, code = ?error.code(), error = %error, "command failed");
        self.renderer
            .notification(out, &Notification::failure(operation, error))?;
        Ok(Outcome::Failure)
    }

    fn succeed<W: Write + ?Sized>(
        &self,
        out: &mut W,
        operation: UsersOperation,
    ) -> Result<(), CliError> {
        if let Some(notice) = Notification::success(operation) {
            self.renderer.notification(out, &notice)?;
        }
        Ok(())
    }

    /// Load the collection; `Ok(false)` once a failure has been reported.
    async fn load<W: Write + ?Sized>(&self, out: &mut W) -> Result<bool, CliError> {
        match self.store.load().await {
            Ok(()) => Ok(true),
            Err(error) => self
                .fail(out, UsersOperation::Load, &error)
                .map(|_| false),
        }
    }

    async fn show_page<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<Outcome, CliError> {
        let snapshot = match self.store.settled().await {
            Ok(snapshot) => snapshot,
            Err(error) => return self.fail(out, UsersOperation::Load, &error),
        };
        let before = self.location.current().clone();
        let view = self.controller.view(&mut self.location, snapshot.records());
        let corrected = (self.location.current() != &before).then(|| self.location.current());
        self.renderer.page(out, &view, corrected)?;
        Ok(Outcome::Success)
    }

    fn resolve_id(&self, raw: &str) -> UserId {
        let snapshot = self.store.snapshot();
        snapshot.find_by_display(raw).map_or_else(
            || raw.parse::<UserId>().unwrap_or_else(|never| match never {}),
            |user| user.id.clone(),
        )
    }

    /// `list [--page N]`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] when writing fails.
    pub async fn list<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        page: Option<usize>,
    ) -> Result<Outcome, CliError> {
        if !self.load(out).await? {
            return Ok(Outcome::Failure);
        }
        if let Some(page) = page {
            self.controller.go_to(&mut self.location, page);
        }
        self.show_page(out).await
    }

    /// `create --set field=value ...`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] when writing fails.
    pub async fn create<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        assignments: &[FieldAssignment],
    ) -> Result<Outcome, CliError> {
        if !self.load(out).await? {
            return Ok(Outcome::Failure);
        }
        let draft = fields_from(assignments);
        if let Err(invalid) = validate_fields(&draft) {
            return self.fail(out, UsersOperation::Create, &invalid.into());
        }
        match self.store.create(&draft).await {
            Ok(created) => info!(id = %created.id, "user created"),
            Err(error) => return self.fail(out, UsersOperation::Create, &error),
        }
        self.succeed(out, UsersOperation::Create)?;
        self.show_page(out).await
    }

    /// `update <id> --set field=value ...`.
    ///
    /// The merged record is validated before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] when writing fails.
    pub async fn update<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        raw_id: &str,
        assignments: &[FieldAssignment],
    ) -> Result<Outcome, CliError> {
        if !self.load(out).await? {
            return Ok(Outcome::Failure);
        }
        let id = self.resolve_id(raw_id);
        let patch = fields_from(assignments);
        if let Some(existing) = self.store.snapshot().find(&id) {
            if let Err(invalid) = validate_fields(&existing.merged_with(&patch)) {
                return self.fail(out, UsersOperation::Update, &invalid.into());
            }
        }
        if let Err(error) = self.store.update(&id, &patch).await {
            return self.fail(out, UsersOperation::Update, &error);
        }
        self.succeed(out, UsersOperation::Update)?;
        self.show_page(out).await
    }

    /// `delete <id>`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] when writing fails.
    pub async fn delete<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        raw_id: &str,
    ) -> Result<Outcome, CliError> {
        if !self.load(out).await? {
            return Ok(Outcome::Failure);
        }
        let id = self.resolve_id(raw_id);
        if let Err(error) = self.store.delete(&id).await {
            return self.fail(out, UsersOperation::Delete, &error);
        }
        self.succeed(out, UsersOperation::Delete)?;
        self.show_page(out).await
    }

    /// `fields`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] when writing fails.
    pub fn fields<W: Write + ?Sized>(&self, out: &mut W) -> Result<Outcome, CliError> {
        self.renderer.fields(out, USER_FIELDS)?;
        Ok(Outcome::Success)
    }

    /// `seed`: create every draft in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] when writing fails.
    pub async fn seed<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        seed_name: &str,
        drafts: Vec<UserFields>,
    ) -> Result<Outcome, CliError> {
        if !self.load(out).await? {
            return Ok(Outcome::Failure);
        }
        let mut created = 0_usize;
        for draft in drafts {
            if let Err(error) = self.store.create(&draft).await {
                warn!(seed_key = seed_name, created, "example data seeding stopped");
                return self.fail(out, UsersOperation::Create, &error);
            }
            created += 1;
        }
        info!(seed_key = seed_name, user_count = created, "example data seeding applied");
        self.renderer.seeded(out, seed_name, created)?;
        self.show_page(out).await
    }
}
