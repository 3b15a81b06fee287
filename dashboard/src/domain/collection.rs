//! Collection state shared by both store engines.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::user::{User, UserId};

/// Lifecycle of the collection as last observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStatus {
    /// Nothing in progress and the last operation succeeded.
    #[default]
    Idle,
    /// A load is in progress.
    Loading,
    /// The last operation failed; see [`CollectionSnapshot::last_error`].
    Error,
}

/// Immutable view of the collection handed to readers.
///
/// Cloning is cheap: records sit behind an [`Arc`].
///
/// ## Invariants
/// - `records` keeps server order and holds each id at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionSnapshot {
    records: Arc<Vec<User>>,
    status: CollectionStatus,
    last_error: Option<String>,
}

impl CollectionSnapshot {
    /// Users in server order.
    pub fn records(&self) -> &[User] {
        &self.records
    }

    /// Current status.
    pub fn status(&self) -> CollectionStatus {
        self.status
    }

    /// Message of the most recent failure, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Find a record by id.
    pub fn find(&self, id: &UserId) -> Option<&User> {
        self.records.iter().find(|user| &user.id == id)
    }

    /// Find a record whose id renders as `raw`, as typed on a command line.
    pub fn find_by_display(&self, raw: &str) -> Option<&User> {
        self.records.iter().find(|user| user.id.to_string() == raw)
    }

    pub(crate) fn begin_load(&mut self) {
        self.status = CollectionStatus::Loading;
        self.last_error = None;
    }

    pub(crate) fn replace_records(&mut self, records: Arc<Vec<User>>) {
        self.records = records;
        self.succeed();
    }

    pub(crate) fn shares_records(&self, records: &Arc<Vec<User>>) -> bool {
        Arc::ptr_eq(&self.records, records)
    }

    pub(crate) fn records_mut(&mut self) -> &mut Vec<User> {
        Arc::make_mut(&mut self.records)
    }

    pub(crate) fn succeed(&mut self) {
        self.status = CollectionStatus::Idle;
        self.last_error = None;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.status = CollectionStatus::Error;
        self.last_error = Some(message);
    }
}

/// The four logical operations, used to pick notification wording and to
/// target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsersOperation {
    /// List all users.
    Load,
    /// Create one user.
    Create,
    /// Update one user.
    Update,
    /// Delete one user.
    Delete,
}

impl fmt::Display for UsersOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}
