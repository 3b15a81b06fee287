//! Error types for registry loading and user generation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which domain list of the registry an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainList {
    /// `emailDomains`.
    Email,
    /// `websiteDomains`.
    Website,
}

impl fmt::Display for DomainList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Email => "emailDomains",
            Self::Website => "websiteDomains",
        })
    }
}

/// Seed registry could not be loaded or queried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read seed registry '{path}': {message}")]
    Read {
        /// Registry location.
        path: PathBuf,
        /// I/O failure description.
        message: String,
    },
    /// The registry is not valid JSON or lacks a required key.
    #[error("seed registry is not valid JSON: {message}")]
    Parse {
        /// Decoder message.
        message: String,
    },
    /// The registry declares a format version this crate cannot read.
    #[error("seed registry version {found} is not supported (expected {supported})")]
    UnsupportedVersion {
        /// Version this crate reads.
        supported: u32,
        /// Version found in the file.
        found: u32,
    },
    /// A domain entry is not a dotted host name.
    #[error("{list}[{index}] is not a dotted host name: {value}")]
    InvalidDomain {
        /// List holding the entry.
        list: DomainList,
        /// Position in the list.
        index: usize,
        /// Entry as written.
        value: String,
    },
    /// `emailDomains` is empty.
    #[error("seed registry lists no email domains")]
    NoEmailDomains,
    /// `seeds` is empty.
    #[error("seed registry defines no seeds")]
    NoSeeds,
    /// Two seeds share a name.
    #[error("seed '{name}' is defined more than once")]
    DuplicateSeed {
        /// Repeated name.
        name: String,
    },
    /// No seed carries the requested name.
    #[error("seed '{name}' is not defined in the registry")]
    UnknownSeed {
        /// Requested name.
        name: String,
    },
}

/// User generation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Every username candidate was invalid or already used.
    #[error("no unused username found after {attempts} attempts")]
    UsernamesExhausted {
        /// Candidates tried.
        attempts: usize,
    },
    /// There is no domain to build email addresses on.
    #[error("seed registry has no email domains to draw from")]
    NoEmailDomains,
}
