//! PostgreSQL provider, built on the [`postgres`](https://crates.io/crates/postgres)
//! crate's blocking client.
//!
//! Marker-table existence is checked through `information_schema`, so a
//! database that has never seen `init` is cleanly distinguished from one
//! sitting at version 0.

use chrono::Utc;
use postgres::{Client, NoTls};

use crate::config::DatabaseSettings;
use crate::error::Error;
use crate::provider::{DatabaseProvider, Direction, InitOutcome, VersionState, MARKER_TABLE_NAME};
use crate::script::Script;

/// [DatabaseProvider] implementation for PostgreSQL databases.
pub struct PostgresProvider {
    name: String,
    settings: DatabaseSettings,
    client: Option<Client>,
}

impl PostgresProvider {
    /// Build an unconnected provider from configuration.
    pub fn from_settings(name: &str, settings: &DatabaseSettings) -> Self {
        Self {
            name: name.to_string(),
            settings: settings.clone(),
            client: None,
        }
    }

    /// Build a provider around an existing client.
    pub fn with_client(name: &str, host: &str, client: Client) -> Self {
        Self {
            name: name.to_string(),
            settings: DatabaseSettings {
                kind: "postgres".to_string(),
                host: host.to_string(),
                database: String::new(),
                port: None,
                username: None,
                password: None,
            },
            client: Some(client),
        }
    }

    fn client(&mut self) -> Result<&mut Client, Error> {
        let name = self.name.clone();
        self.client.as_mut().ok_or(Error::NotConnected(name))
    }

    fn marker_table_exists(client: &mut Client) -> Result<bool, Error> {
        let exists: bool = client
            .query_one(
                "SELECT EXISTS (SELECT FROM information_schema.tables \
                 WHERE table_schema = 'public' AND table_name = $1)",
                &[&MARKER_TABLE_NAME],
            )?
            .get(0);
        Ok(exists)
    }
}

impl DatabaseProvider for PostgresProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.settings.host)
    }

    fn connect(&mut self) -> Result<(), Error> {
        if self.client.is_some() {
            return Ok(());
        }
        let mut config = postgres::Config::new();
        config
            .host(&self.settings.host)
            .dbname(&self.settings.database);
        if let Some(port) = self.settings.port {
            config.port(port);
        }
        if let Some(username) = &self.settings.username {
            config.user(username);
        }
        if let Some(password) = &self.settings.password {
            config.password(password);
        }
        self.client = Some(config.connect(NoTls)?);
        Ok(())
    }

    fn init(&mut self) -> Result<InitOutcome, Error> {
        let client = self.client()?;
        if Self::marker_table_exists(client)? {
            let rows = client.query(&format!("SELECT version FROM {}", MARKER_TABLE_NAME), &[])?;
            if !rows.is_empty() {
                return Ok(InitOutcome::AlreadyInitialized);
            }
        } else {
            client.execute(
                &format!(
                    "CREATE TABLE {} (version INTEGER NOT NULL, date_updated TEXT NOT NULL)",
                    MARKER_TABLE_NAME
                ),
                &[],
            )?;
        }
        client.execute(
            &format!(
                "INSERT INTO {} (version, date_updated) VALUES ($1, $2)",
                MARKER_TABLE_NAME
            ),
            &[&0i32, &Utc::now().to_rfc3339()],
        )?;
        Ok(InitOutcome::Created)
    }

    fn current_version(&mut self) -> Result<VersionState, Error> {
        let client = self.client()?;
        if !Self::marker_table_exists(client)? {
            return Ok(VersionState::NotInitialized);
        }
        let rows = client.query(&format!("SELECT version FROM {}", MARKER_TABLE_NAME), &[])?;
        let version = match rows.first() {
            Some(row) => row.get::<_, i32>(0) as u32,
            // marker table present but empty reads as version 0
            None => 0,
        };
        Ok(VersionState::Version(version))
    }

    fn update(&mut self, version: u32) -> Result<(), Error> {
        let name = self.name.clone();
        let client = self.client()?;
        if !Self::marker_table_exists(client)? {
            return Err(Error::NotInitialized(name));
        }
        let changed = client.execute(
            &format!(
                "UPDATE {} SET version = $1, date_updated = $2",
                MARKER_TABLE_NAME
            ),
            &[&(version as i32), &Utc::now().to_rfc3339()],
        )?;
        if changed == 0 {
            client.execute(
                &format!(
                    "INSERT INTO {} (version, date_updated) VALUES ($1, $2)",
                    MARKER_TABLE_NAME
                ),
                &[&(version as i32), &Utc::now().to_rfc3339()],
            )?;
        }
        Ok(())
    }

    fn apply(&mut self, script: &dyn Script, direction: Direction) -> Result<(), Error> {
        let client = self.client()?;
        match direction {
            Direction::Up => script.postgres_upgrade(client),
            Direction::Down => script.postgres_downgrade(client),
        }
    }
}
