//! App core for the bookmarks service.
//!
//! Central struct shared by every request handler.

use std::path::Path;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::database::connection::Database;

/// State shared by all handlers.
///
/// `BookmarkManager` is created on demand from `db.connection()` because it
/// borrows the connection with a lifetime parameter.
pub struct App {
    pub db: Arc<Database>,
    pub api_token: Option<String>,
}

impl App {
    /// Opens the database at `db_path`, running migrations.
    pub fn new<P: AsRef<Path>>(db_path: P, api_token: Option<String>) -> Result<Self, rusqlite::Error> {
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self { db, api_token })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, rusqlite::Error> {
        Self::new(&config.db_path, config.api_token.clone())
    }

    /// App over a throwaway in-memory database.
    pub fn in_memory(api_token: Option<String>) -> Result<Self, rusqlite::Error> {
        let db = Arc::new(Database::open_in_memory()?);
        Ok(Self { db, api_token })
    }
}
