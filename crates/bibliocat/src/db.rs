//! Connection handling for the catalog database.

use crate::config::Config;
use crate::{Error, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tracing::{debug, info};

/// The single open connection to the catalog.
///
/// Created once at startup and handed to every operation by reference.
/// Dropping it closes the connection.
pub struct Catalog {
    pub(crate) conn: Connection,
}

impl Catalog {
    /// Open the database described by `config`.
    ///
    /// Any failure here is a [`Error::Connection`]: the caller cannot proceed.
    pub fn connect(config: &Config) -> Result<Self> {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if config.create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }

        let conn = Connection::open_with_flags(&config.database, flags)
            .map_err(|e| connection_error(&config.database, e))?;
        let catalog = Self::from_connection(conn)
            .map_err(|e| connection_error(&config.database, e))?;

        info!(database = %config.database.display(), "connected to catalog");
        Ok(catalog)
    }

    /// An empty in-memory catalog, mostly useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn)?)
    }

    fn from_connection(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        // Opening is lazy; touch the schema so a corrupt or non-database file fails here.
        let tables: i64 =
            conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get(0))?;
        debug!(tables, "connection check succeeded");
        Ok(Self { conn })
    }

    /// Raw access to the connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, reporting any error the engine raises on close.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Sql(e))?;
        info!("catalog connection closed");
        Ok(())
    }
}

fn connection_error(path: &Path, err: rusqlite::Error) -> Error {
    Error::Connection {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
