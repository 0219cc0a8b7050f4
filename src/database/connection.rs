//! SQLite database connection management for the bookmarks service.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and automatically runs schema migrations on open.

use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;
use std::path::Path;

use super::migrations;

/// Storage handle shared by every request.
///
/// The connection sits behind a mutex so concurrent handlers take turns on
/// it; row-level atomicity comes from SQLite itself.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// The database is discarded when the `Database` is dropped.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Locks and returns the underlying connection.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    /// Health probe: touches the `bookmarks` table, so a missing or unreadable
    /// schema fails here instead of on the next request.
    pub fn ping(&self) -> Result<(), rusqlite::Error> {
        self.connection()
            .query_row("SELECT EXISTS (SELECT 1 FROM bookmarks)", [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|_| ())
    }
}
