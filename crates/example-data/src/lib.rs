//! Reproducible example users for seeding a users endpoint.
//!
//! A JSON [`SeedRegistry`] names seeds and the email and website domains
//! generated contact details use. [`generate_example_users`] turns one seed
//! into [`ExampleUserDraft`] values; callers map them onto their own create
//! payloads, so this crate has no dependency on the dashboard.
//!
//! ```
//! use example_data::{SeedRegistry, generate_example_users, is_valid_email};
//!
//! let registry = SeedRegistry::from_json(
//!     r#"{"version": 1, "emailDomains": ["example.org"],
//!         "seeds": [{"name": "mossy-owl", "seed": 2026, "userCount": 3}]}"#,
//! )
//! .expect("valid registry");
//! let seed = registry.find_seed("mossy-owl").expect("seed exists");
//!
//! let drafts = generate_example_users(&registry, seed).expect("generated");
//! assert_eq!(drafts.len(), 3);
//! assert!(drafts.iter().all(|draft| is_valid_email(&draft.email)));
//! ```

mod error;
mod generator;
mod registry;
mod seed;
mod validation;

pub use error::{DomainList, GenerationError, RegistryError};
pub use generator::generate_example_users;
pub use registry::{SeedDefinition, SeedRegistry};
pub use seed::ExampleUserDraft;
pub use validation::{USERNAME_MAX, USERNAME_MIN, is_valid_email, is_valid_username};
