use serde::{Deserialize, Serialize};

/// A stored bookmark, exactly as the `bookmarks` table holds it.
///
/// Never sent over the wire directly; see [`SerializedBookmark`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub rating: i64,
    pub description: String,
}

/// Fields for a bookmark that has not been stored yet. Storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub rating: i64,
    pub description: String,
}

/// A partial update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub rating: Option<i64>,
    pub description: Option<String>,
}

impl BookmarkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.rating.is_none()
            && self.description.is_none()
    }
}

/// Outbound representation of a bookmark after sanitization.
///
/// `Deserialize` lets clients and tests read responses back into the typed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedBookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub rating: i64,
    pub description: String,
}
