//! Environment-driven service configuration.

use anyhow::{anyhow, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";
pub const DB_FILE_NAME: &str = "bookmarks.db";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    /// Bearer token required on `/api` routes. `None` disables the check.
    pub api_token: Option<String>,
}

pub fn load_config() -> Result<ServiceConfig> {
    let addr = socket_addr_from_env("BOOKMARKS_ADDR", DEFAULT_ADDR)?;
    let db_path = db_path_from_env();
    let api_token = optional_env("API_TOKEN");
    Ok(ServiceConfig {
        addr,
        db_path,
        api_token,
    })
}

/// `BOOKMARKS_DB_PATH` wins; otherwise `bookmarks.db` under `BOOKMARKS_DATA_DIR` (or the cwd).
pub fn db_path_from_env() -> PathBuf {
    if let Some(path) = optional_env("BOOKMARKS_DB_PATH") {
        return PathBuf::from(path);
    }
    match optional_env("BOOKMARKS_DATA_DIR") {
        Some(dir) => PathBuf::from(dir).join(DB_FILE_NAME),
        None => PathBuf::from(DB_FILE_NAME),
    }
}

/// Reads a variable, treating empty values as unset.
pub fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

pub fn socket_addr_from_env(name: &str, default: &str) -> Result<SocketAddr> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    SocketAddr::from_str(&value).map_err(|err| anyhow!("invalid socket addr for {name}: {err}"))
}
