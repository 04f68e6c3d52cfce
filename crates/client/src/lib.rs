//! Client code for pagemeta.
//!
//! This crate provides the fetch -> parse -> extract pipeline used by the
//! scrape orchestrator: an HTTP fetcher, an HTML/XML document parser and
//! selector-driven metadata extraction.

pub mod extract;
pub mod fetch;
pub mod parse;

pub use extract::{FieldSelector, Probe, SelectorSet, ValueSource, extract, extract_metadata, first_match};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, Fetcher};
pub use parse::{ParsedDocument, parse};
