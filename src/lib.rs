#![cfg_attr(docsrs, feature(doc_cfg))]
//! `tomb-migrate` is a schema migration orchestrator: it discovers ordered,
//! numbered migration files on disk, compares them against a version marker
//! persisted inside each target database, and applies the missing steps
//! forward or backward across one or more databases in a single run.
//!
//! # Core concepts
//!
//! - A **revision** is one migration step: a file named
//!   `<digits>_<description>.<ext>` whose version number keys a pair of
//!   upgrade/downgrade operations. The operations themselves are ordinary
//!   Rust types implementing [Script], registered at build time in a
//!   [ScriptSet] and resolved by version when a revision is applied.
//! - A **provider** is the backend-specific implementation
//!   ([DatabaseProvider]) that owns one database's native connection and its
//!   persisted version marker. Providers are built from configuration
//!   through a [ProviderRegistry] keyed by backend type string.
//! - The [Executor] walks the computed migration path revision by revision,
//!   database by database, skipping every (revision, database) pair the
//!   marker says is already applied. Databases at different versions
//!   converge in one run, and re-running after an interruption resumes
//!   where each database left off.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use tomb_migrate::{script_set, DatabaseProvider, Error, Executor, Script};
//! use tomb_migrate::sqlite::SqliteProvider;
//!
//! struct CreateUsers;
//! impl Script for CreateUsers {
//!     fn sqlite_upgrade(&self, conn: &mut rusqlite::Connection) -> Result<(), Error> {
//!         conn.execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)", [])?;
//!         Ok(())
//!     }
//!     fn sqlite_downgrade(&self, conn: &mut rusqlite::Connection) -> Result<(), Error> {
//!         conn.execute("DROP TABLE users", [])?;
//!         Ok(())
//!     }
//! }
//!
//! // one migration file on disk, one script registered under its version
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::File::create(dir.path().join("0001_create_users.rs")).unwrap();
//! let scripts = script_set! { 1 => CreateUsers };
//!
//! let provider = SqliteProvider::with_connection(
//!     "main",
//!     rusqlite::Connection::open_in_memory().unwrap(),
//! );
//! let mut providers: BTreeMap<String, Box<dyn DatabaseProvider>> = BTreeMap::new();
//! providers.insert("main".into(), Box::new(provider));
//!
//! let mut executor = Executor::new(dir.path(), scripts, providers);
//! executor.init().unwrap();
//! executor.upgrade(None).unwrap();
//! ```
//!
//! # Database support
//!
//! - SQLite - feature `sqlite` (default), via `rusqlite`.
//! - PostgreSQL - feature `postgres`, via `postgres`.
//! - MongoDB - feature `mongodb`, via `mongodb`'s blocking API.
//!
//! Additional backends implement [DatabaseProvider] and register a
//! constructor under their own type string.
//!
//! # Caveats
//!
//! The executor is deliberately single-threaded and sequential, with no
//! cross-database transactionality and no locking against concurrent runs:
//! one operator invocation at a time is assumed to be exclusive.

mod error;
pub use error::Error;

mod revision;
pub use revision::Revision;

mod script;
pub use script::{Script, ScriptSet};

#[macro_use]
mod macros;

mod scan;
pub use scan::{downgrade_path, scan, upgrade_path};

mod scaffold;
pub use scaffold::create as create_revision;

mod provider;
pub use provider::{
    DatabaseProvider, Direction, InitOutcome, VersionState, MARKER_TABLE_NAME,
};

mod registry;
pub use registry::{ProviderConstructor, ProviderRegistry};

mod config;
pub use config::{DatabaseSettings, Settings};

mod executor;
pub use executor::Executor;

#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub mod sqlite;

#[cfg(feature = "postgres")]
#[cfg_attr(docsrs, doc(cfg(feature = "postgres")))]
pub mod postgres;

#[cfg(feature = "mongodb")]
#[cfg_attr(docsrs, doc(cfg(feature = "mongodb")))]
pub mod mongo;

#[cfg(feature = "cli")]
#[cfg_attr(docsrs, doc(cfg(feature = "cli")))]
pub mod cli;
