// Bookmarks state managers.
// Managers own all reads and writes against the database.

pub mod bookmark_manager;
