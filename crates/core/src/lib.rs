//! Core types and shared functionality for pagemeta.
//!
//! This crate provides:
//! - Metadata field and record types
//! - The metadata cache (trait plus SQLite backend)
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod metadata;

pub use cache::{CacheDb, MetadataStore};
pub use error::Error;
pub use metadata::{Field, MetadataFields, MetadataRecord};
