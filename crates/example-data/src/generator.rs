//! Seeded draft generation.
//!
//! A ChaCha8 stream seeded from the definition drives every choice, so a
//! registry and seed name always reproduce the same drafts in the same
//! order.

use std::collections::HashSet;

use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GenerationError;
use crate::registry::{SeedDefinition, SeedRegistry};
use crate::seed::ExampleUserDraft;
use crate::validation::{USERNAME_MAX, is_valid_username, slugify};

/// Name pairs tried per draft before giving up on a unique username.
const USERNAME_ATTEMPTS: usize = 64;

/// Seven in ten drafts get a website when website domains exist.
const WEBSITE_ODDS: (u32, u32) = (7, 10);

struct DraftSource<'a> {
    rng: ChaCha8Rng,
    registry: &'a SeedRegistry,
    usernames: HashSet<String>,
}

impl DraftSource<'_> {
    fn next_draft(&mut self) -> Result<ExampleUserDraft, GenerationError> {
        let (first, last, username) = self.identity()?;
        let email_domain = self
            .registry
            .email_domains()
            .choose(&mut self.rng)
            .ok_or(GenerationError::NoEmailDomains)?;
        let phone = format!(
            "{:03}-{:03}-{:04}",
            self.rng.random_range(200_u16..1000),
            self.rng.random_range(200_u16..1000),
            self.rng.random_range(0_u16..10_000),
        );
        let (numerator, denominator) = WEBSITE_ODDS;
        let website = if self.rng.random_ratio(numerator, denominator) {
            self.registry
                .website_domains()
                .choose(&mut self.rng)
                .map(|host| format!("{}.{host}", slugify(&last)))
        } else {
            None
        };

        Ok(ExampleUserDraft {
            name: format!("{first} {last}"),
            email: format!("{username}@{email_domain}"),
            username,
            phone,
            website,
        })
    }

    /// First and last name plus a username not used earlier in this run.
    fn identity(&mut self) -> Result<(String, String, String), GenerationError> {
        for attempt in 0..USERNAME_ATTEMPTS {
            let first: String = FirstName(EN).fake_with_rng(&mut self.rng);
            let last: String = LastName(EN).fake_with_rng(&mut self.rng);
            let stem = format!("{}.{}", slugify(&first), slugify(&last));
            let username: String = match attempt {
                0 => stem,
                n => format!("{stem}{n}"),
            }
            .chars()
            .take(USERNAME_MAX)
            .collect();

            if is_valid_username(&username) && self.usernames.insert(username.clone()) {
                return Ok((first, last, username));
            }
        }
        Err(GenerationError::UsernamesExhausted {
            attempts: USERNAME_ATTEMPTS,
        })
    }
}

/// Generate `definition.user_count()` drafts.
///
/// Each draft has an English full name, a username unique within the run,
/// an email address on one of the registry's email domains, a
/// `NNN-NNN-NNNN` phone number, and for most drafts a website on one of the
/// registry's website domains.
///
/// # Errors
///
/// Returns [`GenerationError::NoEmailDomains`] when the registry has no email
/// domains and [`GenerationError::UsernamesExhausted`] when no unused
/// username turns up.
///
/// # Example
///
/// ```
/// use example_data::{SeedRegistry, generate_example_users};
///
/// let registry = SeedRegistry::from_json(
///     r#"{"version": 1, "emailDomains": ["example.org"],
///         "seeds": [{"name": "pair", "seed": 5, "userCount": 2}]}"#,
/// )
/// .expect("valid registry");
/// let pair = registry.find_seed("pair").expect("seed exists");
///
/// let drafts = generate_example_users(&registry, pair).expect("generated");
/// assert_eq!(drafts.len(), 2);
/// assert_eq!(drafts, generate_example_users(&registry, pair).expect("generated"));
/// ```
pub fn generate_example_users(
    registry: &SeedRegistry,
    definition: &SeedDefinition,
) -> Result<Vec<ExampleUserDraft>, GenerationError> {
    if registry.email_domains().is_empty() {
        return Err(GenerationError::NoEmailDomains);
    }
    let mut source = DraftSource {
        rng: ChaCha8Rng::seed_from_u64(definition.seed()),
        registry,
        usernames: HashSet::with_capacity(definition.user_count()),
    };
    (0..definition.user_count())
        .map(|_| source.next_draft())
        .collect()
}
