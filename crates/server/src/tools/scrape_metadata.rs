//! scrape_metadata tool implementation.
//!
//! Same cache-or-compute flow as `POST /scrape`; a failed scrape becomes an
//! MCP error instead of a plain-text body.

use pagemeta_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scrape::{ScrapeOutcome, Scraper};

/// Input parameters for the scrape_metadata tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeMetadataParams {
    /// The page URL. Used verbatim as the cache key.
    pub url: String,
}

/// Implementation of the scrape_metadata tool.
pub async fn scrape_impl(scraper: &Scraper, params: ScrapeMetadataParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let json = match scraper.scrape(&params.url).await.outcome {
        ScrapeOutcome::Cached(record) => serde_json::to_string_pretty(&record),
        ScrapeOutcome::Scraped(fields) => serde_json::to_string_pretty(&fields),
        ScrapeOutcome::Failed => return Err(Error::ScrapeFailed.into()),
    }
    .map_err(|e| Error::InvalidInput(format!("Failed to serialize metadata: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
