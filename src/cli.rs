//! CLI wiring: argument parsing and error-to-exit-code mapping.
//!
//! Migration scripts are compiled into the caller's crate, so this module is
//! a library entry point rather than a standalone binary: build a
//! [ScriptSet], hand it to [run] from your `main`, and exit with the code it
//! returns.
//!
//! ```no_run
//! use tomb_migrate::{cli, script_set};
//!
//! fn main() -> std::process::ExitCode {
//!     let scripts = script_set! {
//!         // 1 => CreateUsers,
//!     };
//!     cli::run(cli::CliArgs::parse_args(), scripts)
//! }
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use crate::config::Settings;
use crate::error::Error;
use crate::executor::Executor;
use crate::provider::VersionState;
use crate::registry::ProviderRegistry;
use crate::script::ScriptSet;

#[derive(Parser, Debug)]
#[command(name = "tomb", about = "Schema migration orchestrator", version)]
pub struct CliArgs {
    /// Path to the settings file
    #[arg(short, long, default_value = "tomb.yaml")]
    pub config: PathBuf,

    /// Migration directory, overriding the settings file
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upgrade every configured database
    Upgrade {
        /// Start from this revision version (inclusive)
        #[arg(long)]
        version: Option<u32>,
    },
    /// Downgrade every configured database
    Downgrade {
        /// Walk back to this revision version (inclusive)
        #[arg(long)]
        version: Option<u32>,
    },
    /// Create the version marker on every configured database
    Init,
    /// Scaffold the next numbered migration file
    Revision {
        /// Human-readable description, slugified into the file name
        message: String,
    },
    /// Show each database's current marker state
    Status,
}

/// Load settings, resolve and connect providers, dispatch the subcommand,
/// and map the outcome to a process exit code.
pub fn run(args: CliArgs, scripts: ScriptSet) -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match dispatch(args, scripts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::NoMigrationsFound(directory)) => {
            error!(
                "No migrations found in {}. Generate one first: tomb revision \"<message>\"",
                directory.display()
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(args: CliArgs, scripts: ScriptSet) -> Result<(), Error> {
    // the revision command needs no settings file when --path is given
    if let (Command::Revision { message }, Some(path)) = (&args.command, &args.path) {
        let created = crate::scaffold::create(path, message)?;
        println!("{}", created.display());
        return Ok(());
    }

    let settings = Settings::from_file(&args.config)?;
    let directory = args.path.unwrap_or_else(|| settings.migrations_dir());
    let providers = ProviderRegistry::with_defaults().resolve(&settings.databases)?;
    let mut executor = Executor::new(directory, scripts, providers);

    match args.command {
        Command::Revision { message } => {
            let created = executor.revision(&message)?;
            println!("{}", created.display());
            Ok(())
        }
        Command::Upgrade { version } => {
            executor.connect_all()?;
            executor.upgrade(version)
        }
        Command::Downgrade { version } => {
            executor.connect_all()?;
            executor.downgrade(version)
        }
        Command::Init => {
            executor.connect_all()?;
            executor.init()
        }
        Command::Status => {
            executor.connect_all()?;
            for (label, state) in executor.status()? {
                match state {
                    VersionState::NotInitialized => println!("{}: not initialized", label),
                    VersionState::Version(v) => println!("{}: version {}", label, v),
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upgrade_with_version_bound() {
        let args =
            CliArgs::try_parse_from(["tomb", "-c", "app.yaml", "upgrade", "--version", "3"])
                .unwrap();
        assert_eq!(args.config, PathBuf::from("app.yaml"));
        assert!(matches!(args.command, Command::Upgrade { version: Some(3) }));
    }

    #[test]
    fn parses_revision_message() {
        let args = CliArgs::try_parse_from(["tomb", "revision", "add users"]).unwrap();
        assert!(matches!(args.command, Command::Revision { message } if message == "add users"));
    }

    #[test]
    fn config_defaults_to_tomb_yaml() {
        let args = CliArgs::try_parse_from(["tomb", "init"]).unwrap();
        assert_eq!(args.config, PathBuf::from("tomb.yaml"));
        assert!(args.path.is_none());
    }
}
