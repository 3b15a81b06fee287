//! Seed registry: named seeds plus the domain pools generated contact
//! details are built on.
//!
//! The on-disk format is camelCase JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "emailDomains": ["example.org"],
//!   "websiteDomains": ["example.dev"],
//!   "seeds": [{"name": "mossy-owl", "seed": 2026, "userCount": 12}]
//! }
//! ```
//!
//! `websiteDomains` may be omitted, in which case no generated user has a
//! website.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DomainList, RegistryError};

const SUPPORTED_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryFile {
    version: u32,
    email_domains: Vec<String>,
    #[serde(default)]
    website_domains: Vec<String>,
    seeds: Vec<SeedEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedEntry {
    name: String,
    seed: u64,
    user_count: usize,
}

/// Validated seed registry.
///
/// # Example
///
/// ```
/// use example_data::SeedRegistry;
///
/// let registry = SeedRegistry::from_json(
///     r#"{"version": 1, "emailDomains": ["Example.ORG"],
///         "seeds": [{"name": "tiny", "seed": 7, "userCount": 2}]}"#,
/// )
/// .expect("valid registry");
///
/// assert_eq!(registry.email_domains(), ["example.org"]);
/// assert!(registry.website_domains().is_empty());
/// assert_eq!(registry.seed_names().collect::<Vec<_>>(), ["tiny"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRegistry {
    email_domains: Vec<String>,
    website_domains: Vec<String>,
    seeds: Vec<SeedDefinition>,
}

impl SeedRegistry {
    /// Parse and validate a registry document.
    ///
    /// Domains are trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Parse`] for malformed JSON, and the other
    /// [`RegistryError`] variants when the version, a domain entry or the
    /// seed list is unusable.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile =
            serde_json::from_str(json).map_err(|error| RegistryError::Parse {
                message: error.to_string(),
            })?;
        Self::validated(file)
    }

    /// Read and validate the registry at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Read`] when the file cannot be read, or any
    /// error of [`Self::from_json`].
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let json = fs::read_to_string(path).map_err(|error| RegistryError::Read {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        Self::from_json(&json)
    }

    fn validated(file: RegistryFile) -> Result<Self, RegistryError> {
        if file.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                supported: SUPPORTED_VERSION,
                found: file.version,
            });
        }
        let email_domains = normalise_domains(DomainList::Email, file.email_domains)?;
        if email_domains.is_empty() {
            return Err(RegistryError::NoEmailDomains);
        }
        Ok(Self {
            email_domains,
            website_domains: normalise_domains(DomainList::Website, file.website_domains)?,
            seeds: unique_seeds(file.seeds)?,
        })
    }

    /// Domains email addresses are generated on.
    #[must_use]
    pub fn email_domains(&self) -> &[String] {
        &self.email_domains
    }

    /// Domains websites are generated on; may be empty.
    #[must_use]
    pub fn website_domains(&self) -> &[String] {
        &self.website_domains
    }

    /// Seeds in registry order.
    #[must_use]
    pub fn seeds(&self) -> &[SeedDefinition] {
        &self.seeds
    }

    /// Seed names in registry order.
    pub fn seed_names(&self) -> impl Iterator<Item = &str> {
        self.seeds.iter().map(SeedDefinition::name)
    }

    /// Look up a seed by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownSeed`] when no seed has that name.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|definition| definition.name == name)
            .ok_or_else(|| RegistryError::UnknownSeed {
                name: name.to_owned(),
            })
    }
}

/// A named RNG seed and how many users it yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    name: String,
    seed: u64,
    user_count: usize,
}

impl SeedDefinition {
    /// Seed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Users generated from this seed.
    #[must_use]
    pub const fn user_count(&self) -> usize {
        self.user_count
    }

    /// Same seed, generating `user_count` users instead.
    ///
    /// The first users generated are identical whatever the count.
    #[must_use]
    pub fn with_user_count(&self, user_count: usize) -> Self {
        Self {
            user_count,
            ..self.clone()
        }
    }
}

fn normalise_domains(list: DomainList, raw: Vec<String>) -> Result<Vec<String>, RegistryError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            let host = value.trim().to_ascii_lowercase();
            if is_dotted_host(&host) {
                Ok(host)
            } else {
                Err(RegistryError::InvalidDomain { list, index, value })
            }
        })
        .collect()
}

fn unique_seeds(entries: Vec<SeedEntry>) -> Result<Vec<SeedDefinition>, RegistryError> {
    if entries.is_empty() {
        return Err(RegistryError::NoSeeds);
    }
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .map(|entry| {
            if seen.insert(entry.name.clone()) {
                Ok(SeedDefinition {
                    name: entry.name,
                    seed: entry.seed,
                    user_count: entry.user_count,
                })
            } else {
                Err(RegistryError::DuplicateSeed { name: entry.name })
            }
        })
        .collect()
}

fn is_dotted_host(host: &str) -> bool {
    let label_ok = |label: &str| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    };
    host.contains('.') && host.split('.').all(label_ok)
}
