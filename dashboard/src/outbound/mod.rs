//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed users endpoint client
//! - **memory**: in-memory users endpoint for demo runs and tests
//! - **location**: URL-backed page location with push/replace history
//!
//! Adapters are thin translators between domain types and transport
//! representations. They contain no business logic.

pub mod http;
pub mod location;
pub mod memory;
