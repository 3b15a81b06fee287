//! `users-dashboard` entry-point: loads settings, installs tracing, and runs
//! one command.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use dashboard::DashboardSettings;
use dashboard::inbound::cli::{Cli, run};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn report(message: impl std::fmt::Display) {
    if let Err(write_err) = writeln!(io::stderr().lock(), "{message}") {
        drop(write_err);
    }
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match DashboardSettings::load_from_iter([OsString::from("users-dashboard")]) {
        Ok(settings) => settings,
        Err(error) => {
            report(format_args!("failed to load configuration: {error}"));
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.json || settings.log_json);

    let mut stdout = io::stdout().lock();
    match run(cli, &settings, &mut stdout).await {
        Ok(outcome) => outcome.into(),
        Err(error) => {
            report(error);
            ExitCode::FAILURE
        }
    }
}
