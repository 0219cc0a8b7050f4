//! Bookmark storage.
//!
//! A single SQLite file (or in-memory database in tests) holding the
//! `bookmarks` table. [`Database`] owns the connection behind a mutex and
//! runs [`migrations`] on open; queries go through
//! [`BookmarkManager`](crate::managers::bookmark_manager::BookmarkManager),
//! which borrows the locked connection.
//!
//! ```no_run
//! use bookmarks_api::database::Database;
//! use bookmarks_api::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
//!
//! let db = Database::open("bookmarks.db").expect("open bookmarks.db");
//! let conn = db.connection();
//! let count = BookmarkManager::new(&conn)
//!     .list_bookmarks()
//!     .expect("list")
//!     .len();
//! println!("{count} bookmarks stored");
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
