//! Dashboard configuration loaded via OrthoConfig.
//!
//! Every value is optional in the environment; accessors apply the defaults
//! and validate the raw strings.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_PAGE_SIZE, PageSize};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
const DEFAULT_LOCATION: &str = "http://localhost/users";
const DEFAULT_SEED_NAME: &str = "mossy-owl";

fn default_registry_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("example-data")
        .join("seeds.json")
}

/// Invalid configuration detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A URL setting could not be parsed.
    #[error("{setting} is not a valid URL ({value}): {message}")]
    InvalidUrl {
        /// Setting name.
        setting: &'static str,
        /// Raw configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// A URL setting uses a scheme other than http or https.
    #[error("{setting} must use http or https, not {scheme}")]
    UnsupportedScheme {
        /// Setting name.
        setting: &'static str,
        /// Offending scheme.
        scheme: String,
    },
    /// `page_size` was zero.
    #[error("page_size must be at least 1")]
    ZeroPageSize,
    /// `request_timeout_secs` was zero.
    #[error("request_timeout_secs must be at least 1")]
    ZeroTimeout,
}

/// Configuration values for the users dashboard.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DASHBOARD")]
pub struct DashboardSettings {
    /// Base URL of the users service; `/users` is appended.
    pub api_base_url: Option<String>,
    /// Records per page.
    pub page_size: Option<usize>,
    /// Per-request timeout in seconds; transport default when unset.
    pub request_timeout_secs: Option<u64>,
    /// Example data registry path override.
    pub registry_path: Option<PathBuf>,
    /// Default seed for the `seed` command.
    pub seed_name: Option<String>,
    /// Initial page location, such as `https://dash.example/users?page=2`.
    pub location: Option<String>,
    /// Emit logs as JSON.
    #[ortho_config(default = false)]
    pub log_json: bool,
}

fn parse_http_url(setting: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|error| ConfigError::InvalidUrl {
        setting,
        value: raw.to_owned(),
        message: error.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme {
            setting,
            scheme: other.to_owned(),
        }),
    }
}

impl DashboardSettings {
    /// Return the users service base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a malformed or non-HTTP URL.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        parse_http_url(
            "api_base_url",
            self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL),
        )
    }

    /// Return the page size, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPageSize`] when configured as zero.
    pub fn page_size(&self) -> Result<PageSize, ConfigError> {
        self.page_size.map_or(Ok(DEFAULT_PAGE_SIZE), |size| {
            PageSize::new(size).ok_or(ConfigError::ZeroPageSize)
        })
    }

    /// Return the request timeout, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] when configured as zero.
    pub fn request_timeout(&self) -> Result<Option<Duration>, ConfigError> {
        match self.request_timeout_secs {
            Some(0) => Err(ConfigError::ZeroTimeout),
            Some(secs) => Ok(Some(Duration::from_secs(secs))),
            None => Ok(None),
        }
    }

    /// Return the configured registry path, falling back to the bundled
    /// fixture.
    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(default_registry_path)
    }

    /// Return the configured seed name, falling back to the default.
    pub fn seed_name(&self) -> &str {
        self.seed_name.as_deref().unwrap_or(DEFAULT_SEED_NAME)
    }

    /// Return the initial page location, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a malformed or non-HTTP URL.
    pub fn location(&self) -> Result<Url, ConfigError> {
        parse_http_url(
            "location",
            self.location.as_deref().unwrap_or(DEFAULT_LOCATION),
        )
    }

    /// Check every setting at once.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_base_url()?;
        self.page_size()?;
        self.request_timeout()?;
        self.location()?;
        Ok(())
    }
}
