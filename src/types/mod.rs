// Bookmarks API shared type definitions.

pub mod bookmark;
pub mod errors;
