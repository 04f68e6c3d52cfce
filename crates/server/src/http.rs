//! HTTP surface: `POST /scrape`.
//!
//! Response shapes, all with status 200:
//! - cache hit: the stored record as JSON, including `siteUrl`
//! - fresh scrape: the extracted fields as JSON, without `siteUrl`
//! - failure: [`SCRAPE_FAILED_MESSAGE`] as `text/plain`

use std::net::SocketAddr;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::scrape::{SCRAPE_FAILED_MESSAGE, Scrape, ScrapeOutcome, Scraper};

/// Body of `POST /scrape`.
#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

/// Build the router.
pub fn create_app(scraper: Scraper) -> Router {
    Router::new()
        .route("/scrape", post(scrape_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(scraper)
}

/// Serve the router on `addr` until the process exits.
pub async fn serve(scraper: Scraper, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "pagemeta listening");
    axum::serve(listener, create_app(scraper)).await?;
    Ok(())
}

async fn scrape_handler(State(scraper): State<Scraper>, Json(request): Json<ScrapeRequest>) -> Response {
    let Scrape { outcome, pending_store } = scraper.scrape(&request.url).await;
    // detach: the cache write finishes on its own
    drop(pending_store);

    match outcome {
        ScrapeOutcome::Cached(record) => Json(record).into_response(),
        ScrapeOutcome::Scraped(fields) => Json(fields).into_response(),
        ScrapeOutcome::Failed => SCRAPE_FAILED_MESSAGE.into_response(),
    }
}
