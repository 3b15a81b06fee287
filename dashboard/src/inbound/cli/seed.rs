//! Example data for the `seed` command and `--in-memory` runs.

use std::collections::BTreeMap;
use std::path::Path;

use example_data::{
    ExampleUserDraft, GenerationError, RegistryError, SeedRegistry, generate_example_users,
};
use thiserror::Error;
use tracing::debug;

use crate::domain::{User, UserFields, UserId};

/// Errors raised while preparing example users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    /// Seed name must not be empty.
    #[error("seed name must not be empty")]
    EmptySeedName,
    /// Registry loading or lookup failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// User generation failed.
    #[error("example data generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Map a generated draft onto dashboard create fields.
#[must_use]
pub fn draft_fields(draft: ExampleUserDraft) -> UserFields {
    UserFields {
        name: Some(draft.name),
        username: Some(draft.username),
        email: Some(draft.email),
        phone: Some(draft.phone),
        website: draft.website,
        extra: BTreeMap::new(),
    }
}

/// Generate the drafts for `seed_name` from the registry at `path`.
///
/// `count` overrides the seed's configured user count.
///
/// # Errors
///
/// Returns [`SeedError`] when the name is blank, the registry cannot be
/// read, the seed is unknown, or generation fails.
pub fn load_drafts(
    path: &Path,
    seed_name: &str,
    count: Option<usize>,
) -> Result<Vec<UserFields>, SeedError> {
    let seed_name = seed_name.trim();
    if seed_name.is_empty() {
        return Err(SeedError::EmptySeedName);
    }
    let registry = SeedRegistry::from_file(path)?;
    let definition = registry.find_seed(seed_name)?;
    let definition = count.map_or_else(
        || definition.clone(),
        |count| definition.with_user_count(count),
    );
    let drafts = generate_example_users(&registry, &definition)?;
    debug!(
        seed_key = seed_name,
        user_count = drafts.len(),
        path = %path.display(),
        "example users generated"
    );
    Ok(drafts.into_iter().map(draft_fields).collect())
}

/// Users for the in-memory remote, numbered from 1 in generation order.
///
/// # Errors
///
/// Returns [`SeedError`] under the same conditions as [`load_drafts`].
pub fn in_memory_users(path: &Path, seed_name: &str) -> Result<Vec<User>, SeedError> {
    Ok(load_drafts(path, seed_name, None)?
        .into_iter()
        .zip(1_i64..)
        .map(|(fields, id)| User::new(UserId::Number(id), fields))
        .collect())
}
