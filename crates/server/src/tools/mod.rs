//! MCP tool implementations.
//!
//! This module contains all tools exposed by the pagemeta MCP server.

pub mod scrape_metadata;
