//! `users-dashboard` command-line surface.
//!
//! The binary parses [`Cli`] and hands it to [`run`] together with the loaded
//! settings and an output sink, so every command can be driven from tests
//! without spawning a process.

mod commands;
mod form;
mod notifications;
mod render;
#[cfg(feature = "example-data")]
mod seed;

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

pub use self::commands::Dashboard;
pub use self::form::{FieldAssignment, fields_from, parse_assignment};
pub use self::notifications::{Notification, NotificationKind};
pub use self::render::Renderer;
#[cfg(feature = "example-data")]
pub use self::seed::SeedError;

use crate::config::{ConfigError, DashboardSettings};
use crate::domain::PageController;
use crate::domain::ports::UsersRemote;
use crate::outbound::http::HttpUsersRemote;
use crate::outbound::location::UrlPageLocation;
use crate::outbound::memory::InMemoryUsersRemote;

/// Store engine backing the commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Engine {
    /// Manually synchronised collection store.
    #[default]
    Collection,
    /// Tag-invalidated query cache.
    QueryCache,
}

/// `users-dashboard` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "users-dashboard",
    about = "Browse and edit users held by a REST users service",
    version
)]
pub struct Cli {
    /// Store engine to run commands through.
    #[arg(long, value_enum, global = true, default_value_t = Engine::Collection)]
    pub engine: Engine,
    /// Run against an in-memory users service preloaded with example data,
    /// for demos and trials. Nothing is persisted.
    #[arg(long = "in-memory", global = true)]
    pub in_memory: bool,
    /// Initial page location, such as `http://localhost/users?page=2`.
    #[arg(long, value_name = "url", global = true)]
    pub location: Option<String>,
    /// Write results as JSON lines.
    #[arg(long, global = true)]
    pub json: bool,
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show one page of users.
    List {
        /// Navigate to this page before rendering.
        #[arg(long, value_name = "N")]
        page: Option<usize>,
    },
    /// Create a user.
    Create {
        /// Field value as `field=value`; repeatable.
        #[arg(long = "set", value_name = "field=value", value_parser = parse_assignment)]
        set: Vec<FieldAssignment>,
    },
    /// Update fields of an existing user.
    Update {
        /// Identifier of the user.
        id: String,
        /// Field value as `field=value`; repeatable.
        #[arg(long = "set", value_name = "field=value", value_parser = parse_assignment)]
        set: Vec<FieldAssignment>,
    },
    /// Delete a user.
    Delete {
        /// Identifier of the user.
        id: String,
    },
    /// Show the form field configuration.
    Fields,
    /// Create example users from the seed registry.
    #[cfg(feature = "example-data")]
    Seed {
        /// Seed name; defaults to the configured seed.
        #[arg(long = "seed-name", value_name = "name")]
        seed_name: Option<String>,
        /// Registry path; defaults to the configured registry.
        #[arg(long = "registry", value_name = "path")]
        registry: Option<std::path::PathBuf>,
        /// Number of users to create instead of the seed's count.
        #[arg(long, value_name = "N")]
        count: Option<usize>,
    },
}

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command completed.
    Success,
    /// The command reported a failure notification.
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Self::SUCCESS,
            Outcome::Failure => Self::FAILURE,
        }
    }
}

/// Errors that stop a command before it can report a notification.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    /// Example data could not be prepared.
    #[cfg(feature = "example-data")]
    #[error(transparent)]
    Seed(#[from] SeedError),
}

/// Run `cli` against `settings`, writing results to `out`.
///
/// Operation failures are rendered as notifications and reported as
/// [`Outcome::Failure`].
///
/// # Errors
///
/// Returns [`CliError`] for invalid configuration, unusable example data, or
/// output failures.
pub async fn run<W>(cli: Cli, settings: &DashboardSettings, out: &mut W) -> Result<Outcome, CliError>
where
    W: Write + ?Sized,
{
    let mut settings = settings.clone();
    if let Some(location) = cli.location {
        settings.location = Some(location);
    }
    settings.validate()?;

    let remote = build_remote(&settings, cli.in_memory)?;
    let mut dashboard = Dashboard::new(
        cli.engine,
        remote,
        UrlPageLocation::new(settings.location()?),
        PageController::new(settings.page_size()?),
        Renderer::new(cli.json),
    );

    match cli.command {
        Command::List { page } => dashboard.list(out, page).await,
        Command::Create { set } => dashboard.create(out, &set).await,
        Command::Update { id, set } => dashboard.update(out, &id, &set).await,
        Command::Delete { id } => dashboard.delete(out, &id).await,
        Command::Fields => dashboard.fields(out),
        #[cfg(feature = "example-data")]
        Command::Seed {
            seed_name,
            registry,
            count,
        } => {
            let seed_name = seed_name.unwrap_or_else(|| settings.seed_name().to_owned());
            let registry = registry.unwrap_or_else(|| settings.registry_path());
            let drafts = seed::load_drafts(&registry, &seed_name, count)?;
            dashboard.seed(out, &seed_name, drafts).await
        }
    }
}

fn build_remote(
    settings: &DashboardSettings,
    in_memory: bool,
) -> Result<Arc<dyn UsersRemote>, CliError> {
    if in_memory {
        return Ok(Arc::new(InMemoryUsersRemote::with_users(in_memory_users(
            settings,
        )?)));
    }
    Ok(Arc::new(HttpUsersRemote::new(
        settings.api_base_url()?,
        settings.request_timeout()?,
    )?))
}

#[cfg(feature = "example-data")]
fn in_memory_users(settings: &DashboardSettings) -> Result<Vec<crate::domain::User>, CliError> {
    Ok(seed::in_memory_users(
        &settings.registry_path(),
        settings.seed_name(),
    )?)
}

#[cfg(not(feature = "example-data"))]
fn in_memory_users(_settings: &DashboardSettings) -> Result<Vec<crate::domain::User>, CliError> {
    Ok(Vec::new())
}
