//! Metadata cache keyed by exact URL string.
//!
//! The [`MetadataStore`] trait is the seam the scrape orchestrator depends on.
//! [`CacheDb`] implements it over SQLite with async access via tokio-rusqlite:
//!
//! - One row per URL (primary key), insert-or-overwrite writes
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod migrations;
pub mod records;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use store::MetadataStore;
