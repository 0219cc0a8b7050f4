//! Bookmark Manager.
//!
//! Implements `BookmarkManagerTrait`, the data access layer for the single
//! `bookmarks` table, backed by SQLite via `rusqlite`. Every operation is one
//! statement; storage errors are handed back untouched.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::types::bookmark::{Bookmark, BookmarkPatch, NewBookmark};
use crate::types::errors::BookmarkError;

const SELECT_COLUMNS: &str = "id, title, url, rating, description";

/// Trait defining the bookmark storage operations.
pub trait BookmarkManagerTrait {
    /// All bookmarks, in id order.
    fn list_bookmarks(&self) -> Result<Vec<Bookmark>, BookmarkError>;
    /// `Ok(None)` when no bookmark has this id.
    fn get_bookmark(&self, id: i64) -> Result<Option<Bookmark>, BookmarkError>;
    /// Stores the draft and returns the row as written, id included.
    fn insert_bookmark(&mut self, new: &NewBookmark) -> Result<Bookmark, BookmarkError>;
    /// Applies the present fields of `patch`. Returns the affected row count.
    fn update_bookmark(&mut self, id: i64, patch: &BookmarkPatch) -> Result<usize, BookmarkError>;
    /// Returns the affected row count; deleting a missing id yields 0.
    fn delete_bookmark(&mut self, id: i64) -> Result<usize, BookmarkError>;
}

/// Bookmark manager backed by a SQLite connection.
pub struct BookmarkManager<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkManager<'a> {
    /// Creates a new `BookmarkManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Reads a single `Bookmark` row into a struct.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            rating: row.get(3)?,
            description: row.get(4)?,
        })
    }
}

impl<'a> BookmarkManagerTrait for BookmarkManager<'a> {
    fn list_bookmarks(&self) -> Result<Vec<Bookmark>, BookmarkError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM bookmarks ORDER BY id"))?;

        let rows = stmt.query_map([], Self::row_to_bookmark)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn get_bookmark(&self, id: i64) -> Result<Option<Bookmark>, BookmarkError> {
        let bookmark = self
            .conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM bookmarks WHERE id = ?1"),
                params![id],
                Self::row_to_bookmark,
            )
            .optional()?;
        Ok(bookmark)
    }

    fn insert_bookmark(&mut self, new: &NewBookmark) -> Result<Bookmark, BookmarkError> {
        let bookmark = self.conn.query_row(
            &format!(
                "INSERT INTO bookmarks (title, url, rating, description) \
                 VALUES (?1, ?2, ?3, ?4) RETURNING {SELECT_COLUMNS}"
            ),
            params![new.title, new.url, new.rating, new.description],
            Self::row_to_bookmark,
        )?;
        Ok(bookmark)
    }

    fn update_bookmark(&mut self, id: i64, patch: &BookmarkPatch) -> Result<usize, BookmarkError> {
        let mut assignments = Vec::with_capacity(4);
        let mut values: Vec<Value> = Vec::with_capacity(5);

        if let Some(title) = &patch.title {
            assignments.push("title = ?");
            values.push(Value::Text(title.clone()));
        }
        if let Some(url) = &patch.url {
            assignments.push("url = ?");
            values.push(Value::Text(url.clone()));
        }
        if let Some(rating) = patch.rating {
            assignments.push("rating = ?");
            values.push(Value::Integer(rating));
        }
        if let Some(description) = &patch.description {
            assignments.push("description = ?");
            values.push(Value::Text(description.clone()));
        }

        // Nothing to write; the handler rejects this case before we get here.
        if assignments.is_empty() {
            return Ok(0);
        }

        values.push(Value::Integer(id));
        let sql = format!(
            "UPDATE bookmarks SET {} WHERE id = ?",
            assignments.join(", ")
        );
        let affected = self.conn.execute(&sql, params_from_iter(values))?;
        Ok(affected)
    }

    fn delete_bookmark(&mut self, id: i64) -> Result<usize, BookmarkError> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
        Ok(affected)
    }
}
