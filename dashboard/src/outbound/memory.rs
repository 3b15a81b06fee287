//! In-memory users remote for demo runs and tests.
//!
//! Behaves like a well-mannered REST backend: numeric ids are assigned on
//! create, unknown ids answer 404, and failures can be scripted per
//! operation.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{UsersRemote, UsersRemoteError};
use crate::domain::{User, UserDraft, UserFields, UserId, UsersOperation};

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<User>,
    next_id: i64,
    failures: HashMap<UsersOperation, VecDeque<UsersRemoteError>>,
    calls: HashMap<UsersOperation, usize>,
}

impl MemoryState {
    fn record(&mut self, operation: UsersOperation) -> Result<(), UsersRemoteError> {
        *self.calls.entry(operation).or_default() += 1;
        match self
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn position(&self, id: &UserId) -> Result<usize, UsersRemoteError> {
        self.users
            .iter()
            .position(|user| &user.id == id)
            .ok_or_else(|| UsersRemoteError::remote(404, Some("User not found".to_owned())))
    }
}

/// Users remote backed by a process-local list.
#[derive(Debug, Default)]
pub struct InMemoryUsersRemote {
    state: Mutex<MemoryState>,
}

impl InMemoryUsersRemote {
    /// Remote preloaded with `users`; new ids continue after the largest
    /// numeric id.
    #[must_use]
    pub fn with_users(users: Vec<User>) -> Self {
        let highest = users
            .iter()
            .filter_map(|user| match user.id {
                UserId::Number(value) => Some(value),
                UserId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        Self {
            state: Mutex::new(MemoryState {
                users,
                next_id: highest.saturating_add(1),
                ..MemoryState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next call of `operation` fail with `error`. Queued failures
    /// are consumed in order.
    pub fn fail_next(&self, operation: UsersOperation, error: UsersRemoteError) {
        self.lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Number of calls made for `operation`, failed ones included.
    pub fn calls(&self, operation: UsersOperation) -> usize {
        self.lock().calls.get(&operation).copied().unwrap_or(0)
    }

    /// Current server-side records.
    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }
}

#[async_trait]
impl UsersRemote for InMemoryUsersRemote {
    async fn list(&self) -> Result<Vec<User>, UsersRemoteError> {
        let mut state = self.lock();
        state.record(UsersOperation::Load)?;
        Ok(state.users.clone())
    }

    async fn create(&self, draft: &UserDraft) -> Result<User, UsersRemoteError> {
        let mut state = self.lock();
        state.record(UsersOperation::Create)?;
        let id = state.next_id.max(1);
        state.next_id = id.saturating_add(1);
        let user = User::new(UserId::Number(id), draft.clone());
        state.users.push(user.clone());
        debug!(%user.id, "in-memory user created");
        Ok(user)
    }

    async fn update(&self, id: &UserId, fields: &UserFields) -> Result<User, UsersRemoteError> {
        let mut state = self.lock();
        state.record(UsersOperation::Update)?;
        let index = state.position(id)?;
        let user = User::new(id.clone(), fields.clone());
        if let Some(slot) = state.users.get_mut(index) {
            *slot = user.clone();
        }
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UsersRemoteError> {
        let mut state = self.lock();
        state.record(UsersOperation::Delete)?;
        let index = state.position(id)?;
        state.users.remove(index);
        Ok(())
    }
}
