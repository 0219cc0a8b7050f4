//! Bookmarks API server entry point.

use bookmarks_api::{config, logging, router, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(router::SERVICE_NAME)?;
    let config = config::load_config()?;
    server::run(config).await
}
