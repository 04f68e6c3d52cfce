//! pagemeta server entry point.
//!
//! Serves page metadata over HTTP (`POST /scrape`) or, with
//! `PAGEMETA_TRANSPORT=stdio`, as an MCP tool on stdio.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use pagemeta_client::{FetchClient, FetchConfig};
use pagemeta_core::CacheDb;
use pagemeta_core::config::{AppConfig, Transport};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod http;
mod scrape;
#[cfg(test)]
mod testing;
mod tools;

use scrape::Scraper;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    let db = CacheDb::open(&config.db_path).await?;
    let fetcher = FetchClient::new(FetchConfig::from(&config))?;
    let scraper = Scraper::new(Arc::new(db), Arc::new(fetcher));

    match config.transport {
        Transport::Http => {
            tracing::info!(bind = %config.bind, db = %config.db_path.display(), "Starting pagemeta on HTTP");
            http::serve(scraper, config.bind).await?;
        }
        Transport::Stdio => {
            tracing::info!(db = %config.db_path.display(), "Starting pagemeta on stdio transport");
            let server = serve_server(handler::PagemetaServer::new(scraper), stdio()).await?;
            server.waiting().await?;
        }
    }

    Ok(())
}
