//! MongoDB document-store provider, built on the
//! [`mongodb`](https://crates.io/crates/mongodb) crate's blocking `sync` API.
//!
//! The marker is a single document in a collection named by
//! [MARKER_TABLE_NAME](crate::MARKER_TABLE_NAME); a missing collection is the
//! "not initialized" state, mirroring the relational providers' missing
//! marker table.

use chrono::Utc;
use mongodb::bson::doc;
use mongodb::options::UpdateOptions;
use mongodb::sync::{Client, Database};

use crate::config::DatabaseSettings;
use crate::error::Error;
use crate::provider::{DatabaseProvider, Direction, InitOutcome, VersionState, MARKER_TABLE_NAME};
use crate::script::Script;

/// [DatabaseProvider] implementation for MongoDB databases.
pub struct MongoProvider {
    name: String,
    settings: DatabaseSettings,
    db: Option<Database>,
}

impl MongoProvider {
    /// Build an unconnected provider from configuration.
    pub fn from_settings(name: &str, settings: &DatabaseSettings) -> Self {
        Self {
            name: name.to_string(),
            settings: settings.clone(),
            db: None,
        }
    }

    /// Build a provider around an existing database handle.
    pub fn with_database(name: &str, host: &str, db: Database) -> Self {
        Self {
            name: name.to_string(),
            settings: DatabaseSettings {
                kind: "mongodb".to_string(),
                host: host.to_string(),
                database: db.name().to_string(),
                port: None,
                username: None,
                password: None,
            },
            db: Some(db),
        }
    }

    fn db(&mut self) -> Result<&Database, Error> {
        let name = self.name.clone();
        self.db.as_ref().ok_or(Error::NotConnected(name))
    }

    fn marker_collection_exists(db: &Database) -> Result<bool, Error> {
        let names = db.list_collection_names(None)?;
        Ok(names.iter().any(|n| n == MARKER_TABLE_NAME))
    }
}

impl DatabaseProvider for MongoProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.settings.host)
    }

    fn connect(&mut self) -> Result<(), Error> {
        if self.db.is_some() {
            return Ok(());
        }
        let port = self.settings.port.unwrap_or(27017);
        let uri = match (&self.settings.username, &self.settings.password) {
            (Some(username), Some(password)) => format!(
                "mongodb://{}:{}@{}:{}",
                username, password, self.settings.host, port
            ),
            _ => format!("mongodb://{}:{}", self.settings.host, port),
        };
        let client = Client::with_uri_str(&uri)?;
        self.db = Some(client.database(&self.settings.database));
        Ok(())
    }

    fn init(&mut self) -> Result<InitOutcome, Error> {
        let db = self.db()?;
        let marker = db.collection::<mongodb::bson::Document>(MARKER_TABLE_NAME);
        if Self::marker_collection_exists(db)? && marker.find_one(None, None)?.is_some() {
            return Ok(InitOutcome::AlreadyInitialized);
        }
        marker.insert_one(
            doc! { "version": 0i64, "date_updated": Utc::now().to_rfc3339() },
            None,
        )?;
        Ok(InitOutcome::Created)
    }

    fn current_version(&mut self) -> Result<VersionState, Error> {
        let db = self.db()?;
        if !Self::marker_collection_exists(db)? {
            return Ok(VersionState::NotInitialized);
        }
        let marker = db.collection::<mongodb::bson::Document>(MARKER_TABLE_NAME);
        let version = match marker.find_one(None, None)? {
            Some(document) => document
                .get_i64("version")
                .map_err(|e| Error::Generic(format!("malformed version marker: {}", e)))?
                as u32,
            // marker collection present but empty reads as version 0
            None => 0,
        };
        Ok(VersionState::Version(version))
    }

    fn update(&mut self, version: u32) -> Result<(), Error> {
        let name = self.name.clone();
        let db = self.db()?;
        if !Self::marker_collection_exists(db)? {
            return Err(Error::NotInitialized(name));
        }
        let marker = db.collection::<mongodb::bson::Document>(MARKER_TABLE_NAME);
        marker.update_one(
            doc! {},
            doc! { "$set": {
                "version": version as i64,
                "date_updated": Utc::now().to_rfc3339(),
            } },
            UpdateOptions::builder().upsert(true).build(),
        )?;
        Ok(())
    }

    fn apply(&mut self, script: &dyn Script, direction: Direction) -> Result<(), Error> {
        let db = self.db()?;
        match direction {
            Direction::Up => script.mongo_upgrade(db),
            Direction::Down => script.mongo_downgrade(db),
        }
    }
}
