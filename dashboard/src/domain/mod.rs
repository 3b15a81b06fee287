//! Users domain: record model, form fields, and the two store engines.
//!
//! Purpose: Keep a client-side copy of the remote users collection in sync
//! with the server and expose immutable snapshots to the inbound adapter.
//!
//! Public surface:
//! - User, UserId, UserFields: record model with an `extra` side map.
//! - USER_FIELDS, validate_fields: declarative form configuration.
//! - CollectionStore: manual synchronisation engine.
//! - UsersQueryCache: tag-invalidated cache engine.
//! - PageController: page clamp feedback loop.
//! - Error (alias to `error::Error`): store failure taxonomy.

pub mod collection;
pub mod collection_store;
pub mod error;
pub mod fields;
pub mod page_controller;
pub mod ports;
pub mod query_cache;
pub mod user;

pub use self::collection::{CollectionSnapshot, CollectionStatus, UsersOperation};
pub use self::collection_store::CollectionStore;
pub use self::error::{Error, ErrorCode};
pub use self::fields::{
    FieldConfig, FieldIssue, FieldKind, USER_FIELDS, ValidationError,
    validate_against, validate_fields,
};
pub use self::page_controller::PageController;
pub use self::query_cache::{CacheTag, QuerySnapshot, UsersQueryCache, UsersSubscription};
pub use self::user::{User, UserDraft, UserFields, UserId, UserPatch};
