use std::collections::BTreeMap;

/// The operations a migration script contributes, one pair per backend.
///
/// Where the original file-based tools load `upgrade(connection)` /
/// `downgrade(connection)` entry points out of each script at runtime, here
/// every script is an ordinary type registered at build time and keyed by its
/// revision's version number in a [ScriptSet]. The executor resolves the
/// version discovered on disk to the registered script when it is about to
/// apply it.
///
/// Each backend pair takes that backend's native connection handle. Implement
/// the pairs for the backends your deployment targets; the default
/// implementations panic with a descriptive message, so a script applied
/// against a backend it was never written for fails loudly rather than
/// silently succeeding.
pub trait Script: Send + Sync {
    #[cfg(feature = "sqlite")]
    /// Forward migration logic against a SQLite connection.
    fn sqlite_upgrade(&self, _conn: &mut rusqlite::Connection) -> Result<(), crate::Error> {
        panic!("script does not implement sqlite_upgrade()");
    }

    #[cfg(feature = "sqlite")]
    /// Backward migration logic against a SQLite connection.
    fn sqlite_downgrade(&self, _conn: &mut rusqlite::Connection) -> Result<(), crate::Error> {
        panic!("script does not implement sqlite_downgrade()");
    }

    #[cfg(feature = "postgres")]
    /// Forward migration logic against a PostgreSQL client.
    fn postgres_upgrade(&self, _client: &mut postgres::Client) -> Result<(), crate::Error> {
        panic!("script does not implement postgres_upgrade()");
    }

    #[cfg(feature = "postgres")]
    /// Backward migration logic against a PostgreSQL client.
    fn postgres_downgrade(&self, _client: &mut postgres::Client) -> Result<(), crate::Error> {
        panic!("script does not implement postgres_downgrade()");
    }

    #[cfg(feature = "mongodb")]
    /// Forward migration logic against a MongoDB database handle.
    fn mongo_upgrade(&self, _db: &mongodb::sync::Database) -> Result<(), crate::Error> {
        panic!("script does not implement mongo_upgrade()");
    }

    #[cfg(feature = "mongodb")]
    /// Backward migration logic against a MongoDB database handle.
    fn mongo_downgrade(&self, _db: &mongodb::sync::Database) -> Result<(), crate::Error> {
        panic!("script does not implement mongo_downgrade()");
    }
}

/// Build-time registry of migration scripts, keyed by revision version.
///
/// See the [script_set!](crate::script_set) macro for a terse way to build one.
#[derive(Default)]
pub struct ScriptSet {
    scripts: BTreeMap<u32, Box<dyn Script>>,
}

impl ScriptSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script under a version number. A later registration for the
    /// same version replaces the earlier one.
    pub fn register(&mut self, version: u32, script: impl Script + 'static) -> &mut Self {
        self.scripts.insert(version, Box::new(script));
        self
    }

    /// Look up the script registered for a version.
    pub fn get(&self, version: u32) -> Option<&dyn Script> {
        self.scripts.get(&version).map(|s| s.as_ref())
    }

    /// Versions with a registered script, ascending.
    pub fn versions(&self) -> impl Iterator<Item = u32> + '_ {
        self.scripts.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl std::fmt::Debug for ScriptSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptSet")
            .field("versions", &self.scripts.keys().collect::<Vec<_>>())
            .finish()
    }
}
