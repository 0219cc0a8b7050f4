//! Bookmarks API: a minimal REST service for rated bookmarks backed by SQLite.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod auth;
pub mod bookmark_handler;
pub mod config;
pub mod database;
pub mod logging;
pub mod managers;
pub mod router;
pub mod server;
pub mod services;
pub mod types;
