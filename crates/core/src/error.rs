//! Unified error types for pagemeta.
//!
//! Every variant renders with a stable code prefix so log lines and MCP
//! error payloads can be matched without parsing the message.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the pagemeta service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty URL on the tool surface).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Any transport failure while fetching a page: DNS, refused connection,
    /// timeout, non-2xx status, oversized body or a URL the client rejects.
    #[error("FETCH_FAILED: {0}")]
    Fetch(String),

    /// The fetched body could not be turned into a document tree.
    #[error("PARSE_FAILED: {0}")]
    Parse(String),

    /// The scrape pipeline produced no result.
    ///
    /// This is what callers see; the underlying fetch/parse reason is only logged.
    #[error("SCRAPE_FAILED")]
    ScrapeFailed,

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Fetch(msg) => (-32006, msg.clone()),
            Error::Parse(msg) => (-32000, msg.clone()),
            Error::ScrapeFailed => (-32001, "Something went wrong while parsing document...".to_string()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
