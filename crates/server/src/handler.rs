//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::scrape::Scraper;
use crate::tools::scrape_metadata::{ScrapeMetadataParams, scrape_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for pagemeta.
#[derive(Clone)]
pub struct PagemetaServer {
    scraper: Scraper,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl PagemetaServer {
    /// Create a new server handler around a shared orchestrator.
    pub fn new(scraper: Scraper) -> Self {
        Self { scraper, tool_router: Self::tool_router() }
    }

    /// Fetch a page (or serve it from cache) and return its metadata.
    #[tool(
        description = "Extract title, description, image, keywords, og:url and og:type from a web page. Cached by exact URL."
    )]
    async fn scrape_metadata(&self, params: Parameters<ScrapeMetadataParams>) -> Result<CallToolResult, McpError> {
        scrape_impl(&self.scraper, params.0).await
    }
}

impl ServerHandler for PagemetaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "pagemeta".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
