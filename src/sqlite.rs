//! SQLite provider, built on the [`rusqlite`](https://crates.io/crates/rusqlite) crate.
//!
//! The `database` setting is the database file path (`:memory:` works for
//! throwaway databases). The marker lives in a one-row table named by
//! [MARKER_TABLE_NAME](crate::MARKER_TABLE_NAME).

use chrono::Utc;
use rusqlite::{params, Connection};

use crate::config::DatabaseSettings;
use crate::error::Error;
use crate::provider::{DatabaseProvider, Direction, InitOutcome, VersionState, MARKER_TABLE_NAME};
use crate::script::Script;

/// [DatabaseProvider] implementation for SQLite databases.
pub struct SqliteProvider {
    name: String,
    host: String,
    database: String,
    conn: Option<Connection>,
}

impl SqliteProvider {
    /// Build an unconnected provider from configuration.
    pub fn from_settings(name: &str, settings: &DatabaseSettings) -> Self {
        Self {
            name: name.to_string(),
            host: settings.host.clone(),
            database: settings.database.clone(),
            conn: None,
        }
    }

    /// Build a provider around an existing connection. Useful for tests and
    /// for embedding the executor in an application that already owns its
    /// connection.
    pub fn with_connection(name: &str, conn: Connection) -> Self {
        Self {
            name: name.to_string(),
            host: "local".to_string(),
            database: String::new(),
            conn: Some(conn),
        }
    }

    fn conn(&mut self) -> Result<&mut Connection, Error> {
        let name = self.name.clone();
        self.conn.as_mut().ok_or(Error::NotConnected(name))
    }

    fn marker_table_exists(conn: &Connection) -> Result<bool, Error> {
        let mut stmt =
            conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
        let exists = stmt.query([MARKER_TABLE_NAME])?.next()?.is_some();
        Ok(exists)
    }
}

impl DatabaseProvider for SqliteProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.host)
    }

    fn connect(&mut self) -> Result<(), Error> {
        if self.conn.is_none() {
            self.conn = Some(Connection::open(&self.database)?);
        }
        Ok(())
    }

    fn init(&mut self) -> Result<InitOutcome, Error> {
        let conn = self.conn()?;
        if Self::marker_table_exists(conn)? {
            let mut stmt = conn.prepare(&format!("SELECT version FROM {}", MARKER_TABLE_NAME))?;
            if stmt.query([])?.next()?.is_some() {
                return Ok(InitOutcome::AlreadyInitialized);
            }
        } else {
            conn.execute(
                &format!(
                    "CREATE TABLE {} (version INTEGER NOT NULL, date_updated TEXT NOT NULL)",
                    MARKER_TABLE_NAME
                ),
                [],
            )?;
        }
        conn.execute(
            &format!(
                "INSERT INTO {} (version, date_updated) VALUES (?1, ?2)",
                MARKER_TABLE_NAME
            ),
            params![0u32, Utc::now().to_rfc3339()],
        )?;
        Ok(InitOutcome::Created)
    }

    fn current_version(&mut self) -> Result<VersionState, Error> {
        let conn = self.conn()?;
        if !Self::marker_table_exists(conn)? {
            return Ok(VersionState::NotInitialized);
        }
        let mut stmt = conn.prepare(&format!("SELECT version FROM {}", MARKER_TABLE_NAME))?;
        let mut rows = stmt.query([])?;
        let version = match rows.next()? {
            Some(row) => row.get::<_, u32>(0)?,
            // marker table present but empty reads as version 0
            None => 0,
        };
        Ok(VersionState::Version(version))
    }

    fn update(&mut self, version: u32) -> Result<(), Error> {
        let name = self.name.clone();
        let conn = self.conn()?;
        if !Self::marker_table_exists(conn)? {
            return Err(Error::NotInitialized(name));
        }
        let changed = conn.execute(
            &format!(
                "UPDATE {} SET version = ?1, date_updated = ?2",
                MARKER_TABLE_NAME
            ),
            params![version, Utc::now().to_rfc3339()],
        )?;
        if changed == 0 {
            conn.execute(
                &format!(
                    "INSERT INTO {} (version, date_updated) VALUES (?1, ?2)",
                    MARKER_TABLE_NAME
                ),
                params![version, Utc::now().to_rfc3339()],
            )?;
        }
        Ok(())
    }

    fn apply(&mut self, script: &dyn Script, direction: Direction) -> Result<(), Error> {
        let conn = self.conn()?;
        match direction {
            Direction::Up => script.sqlite_upgrade(conn),
            Direction::Down => script.sqlite_downgrade(conn),
        }
    }
}
