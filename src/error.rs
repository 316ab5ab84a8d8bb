use std::path::PathBuf;

/// Error type for the tomb-migrate crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A directory entry does not match the `<digits>_<description>.<ext>`
    /// naming convention. Aborts the entire scan.
    #[error("{0} is not a valid migration file")]
    InvalidMigrationFileName(String),

    /// Scanning produced zero revisions.
    #[error("no migrations found in {}", .0.display())]
    NoMigrationsFound(PathBuf),

    /// Two migration files share a version number.
    #[error("duplicate revision version {version}: {first} and {second}")]
    DuplicateVersion {
        version: u32,
        first: String,
        second: String,
    },

    /// A revision discovered on disk has no script registered for its version.
    #[error("no script registered for revision {0}")]
    MissingScript(u32),

    /// A configured backend type has no registered provider constructor.
    #[error("unknown database type '{0}'")]
    UnknownDatabaseType(String),

    /// The version marker table/collection does not exist. Run `init` first.
    #[error("database {0} is not initialized, run init first")]
    NotInitialized(String),

    /// A provider operation ran before `connect`.
    #[error("database {0} is not connected")]
    NotConnected(String),

    /// The scaffolder's target file already exists.
    #[error("migration file {} already exists", .0.display())]
    RevisionFileExists(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[cfg(feature = "sqlite")]
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error("{0}")]
    Postgres(#[from] postgres::Error),

    #[cfg(feature = "mongodb")]
    #[error("{0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("{0}")]
    Generic(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self::Generic(value)
    }
}
