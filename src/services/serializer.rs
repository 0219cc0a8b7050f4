//! Outbound bookmark serialization.

use crate::services::xss_filter::filter_xss;
use crate::types::bookmark::{Bookmark, SerializedBookmark};

/// Sanitizes a stored bookmark for a response body.
///
/// `title` and `description` go through the XSS filter; `id`, `url` and
/// `rating` pass through as stored.
pub fn serialize_bookmark(bookmark: &Bookmark) -> SerializedBookmark {
    SerializedBookmark {
        id: bookmark.id,
        title: filter_xss(&bookmark.title),
        url: bookmark.url.clone(),
        rating: bookmark.rating,
        description: filter_xss(&bookmark.description),
    }
}

pub fn serialize_bookmarks(bookmarks: &[Bookmark]) -> Vec<SerializedBookmark> {
    bookmarks.iter().map(serialize_bookmark).collect()
}
