use std::collections::BTreeMap;

use crate::config::DatabaseSettings;
use crate::error::Error;
use crate::provider::DatabaseProvider;

/// Constructor for a backend provider: configuration key + settings in,
/// unconnected provider out. Construction never touches the network; the
/// executor's connect phase does.
pub type ProviderConstructor = fn(&str, &DatabaseSettings) -> Box<dyn DatabaseProvider>;

/// Statically compiled lookup table from backend type string to provider
/// constructor.
///
/// [with_defaults](Self::with_defaults) registers every backend compiled into
/// the crate; additional backends can be registered under new type strings
/// with [register](Self::register).
pub struct ProviderRegistry {
    entries: BTreeMap<&'static str, ProviderConstructor>,
}

impl ProviderRegistry {
    /// An empty registry with no backends.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// A registry with every compiled-in backend registered under its
    /// conventional type string.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "sqlite")]
        registry.register("sqlite", |name, settings| {
            Box::new(crate::sqlite::SqliteProvider::from_settings(name, settings))
        });
        #[cfg(feature = "postgres")]
        registry.register("postgres", |name, settings| {
            Box::new(crate::postgres::PostgresProvider::from_settings(
                name, settings,
            ))
        });
        #[cfg(feature = "mongodb")]
        registry.register("mongodb", |name, settings| {
            Box::new(crate::mongo::MongoProvider::from_settings(name, settings))
        });
        registry
    }

    /// Register a constructor under a backend type string, replacing any
    /// existing entry for that string.
    pub fn register(&mut self, kind: &'static str, constructor: ProviderConstructor) -> &mut Self {
        self.entries.insert(kind, constructor);
        self
    }

    /// Build the full provider set from configuration.
    ///
    /// Fails fast with [Error::UnknownDatabaseType] on the first unrecognized
    /// type; no partial provider set is returned.
    pub fn resolve(
        &self,
        databases: &BTreeMap<String, DatabaseSettings>,
    ) -> Result<BTreeMap<String, Box<dyn DatabaseProvider>>, Error> {
        let mut providers = BTreeMap::new();
        for (name, settings) in databases {
            let constructor = self
                .entries
                .get(settings.kind.as_str())
                .ok_or_else(|| Error::UnknownDatabaseType(settings.kind.clone()))?;
            providers.insert(name.clone(), constructor(name, settings));
        }
        Ok(providers)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(kind: &str) -> DatabaseSettings {
        DatabaseSettings {
            kind: kind.to_string(),
            host: "localhost".to_string(),
            database: ":memory:".to_string(),
            port: None,
            username: None,
            password: None,
        }
    }

    #[test]
    fn unknown_type_fails_the_whole_set() {
        let mut databases = BTreeMap::new();
        databases.insert("main".to_string(), settings("sqlite"));
        databases.insert("weird".to_string(), settings("rethinkdb"));

        let err = ProviderRegistry::with_defaults()
            .resolve(&databases)
            .err()
            .unwrap();
        assert!(matches!(err, Error::UnknownDatabaseType(kind) if kind == "rethinkdb"));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn resolves_configured_databases_by_type() {
        let mut databases = BTreeMap::new();
        databases.insert("main".to_string(), settings("sqlite"));
        databases.insert("reporting".to_string(), settings("sqlite"));

        let providers = ProviderRegistry::with_defaults()
            .resolve(&databases)
            .unwrap();
        assert_eq!(
            providers.keys().collect::<Vec<_>>(),
            vec!["main", "reporting"]
        );
        assert_eq!(providers["main"].label(), "main (localhost)");
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn custom_backends_can_be_registered() {
        let mut registry = ProviderRegistry::new();
        registry.register("relational", |name, settings| {
            Box::new(crate::sqlite::SqliteProvider::from_settings(name, settings))
        });

        let mut databases = BTreeMap::new();
        databases.insert("main".to_string(), settings("relational"));
        assert!(registry.resolve(&databases).is_ok());
    }
}
