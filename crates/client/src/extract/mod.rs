//! Selector-driven metadata extraction.
//!
//! ### Query syntax
//! A query is a CSS selector group optionally followed by whitespace and
//! `@attr`:
//!
//! - `meta[property="og:image"][content] @content` yields the `content`
//!   attribute of the first matching element.
//! - `title` yields the text of the first matching element.
//!
//! ### Evaluation
//! - A [`FieldSelector`] holds an ordered list of probes; the first probe
//!   that matches any node supplies the value.
//! - Values are trimmed. No match at all yields the empty string.
//! - Extraction is pure and never fails.

mod selectors;

pub use selectors::STANDARD_QUERIES;

use crate::parse::{ParsedDocument, parse};
use pagemeta_core::{Error, Field, MetadataFields};
use scraper::{Html, Selector};
use std::sync::LazyLock;

static STANDARD: LazyLock<SelectorSet> =
    LazyLock::new(|| SelectorSet::new(STANDARD_QUERIES).expect("built-in selector queries are valid"));

/// Where a probe reads its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Concatenated descendant text.
    Text,
    /// An attribute value.
    Attr(String),
}

/// One compiled query.
#[derive(Debug, Clone)]
pub struct Probe {
    selector: Selector,
    source: ValueSource,
}

impl Probe {
    /// Compile a query string.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the CSS part does not parse or the
    /// attribute name is empty.
    pub fn parse(query: &str) -> Result<Self, Error> {
        let query = query.trim();
        let (css, source) = match query.rsplit_once(char::is_whitespace) {
            Some((css, attr)) if attr.starts_with('@') => {
                let name = attr.trim_start_matches('@');
                if name.is_empty() {
                    return Err(Error::InvalidInput(format!("empty attribute in query: {query}")));
                }
                (css.trim_end(), ValueSource::Attr(name.to_string()))
            }
            _ => (query, ValueSource::Text),
        };

        let selector =
            Selector::parse(css).map_err(|e| Error::InvalidInput(format!("invalid selector `{css}`: {e}")))?;

        Ok(Self { selector, source })
    }

    pub fn source(&self) -> &ValueSource {
        &self.source
    }

    fn evaluate(&self, html: &Html) -> Option<String> {
        html.select(&self.selector)
            .find_map(|element| match &self.source {
                ValueSource::Attr(name) => element.value().attr(name).map(str::to_string),
                ValueSource::Text => Some(element.text().collect::<String>()),
            })
            .map(|value| value.trim().to_string())
    }
}

/// Probes for a single metadata field, in priority order.
#[derive(Debug, Clone)]
pub struct FieldSelector {
    pub field: Field,
    pub probes: Vec<Probe>,
}

impl FieldSelector {
    fn evaluate(&self, html: &Html) -> String {
        self.probes
            .iter()
            .find_map(|probe| probe.evaluate(html))
            .unwrap_or_default()
    }
}

/// The fixed field-to-query mapping applied to every page.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    fields: Vec<FieldSelector>,
}

impl SelectorSet {
    /// Compile a selector set from `(field, queries)` pairs.
    pub fn new(table: &[(Field, &[&str])]) -> Result<Self, Error> {
        let fields = table
            .iter()
            .map(|(field, queries)| -> Result<FieldSelector, Error> {
                let probes = queries.iter().map(|q| Probe::parse(q)).collect::<Result<Vec<_>, _>>()?;
                Ok(FieldSelector { field: *field, probes })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { fields })
    }

    /// The built-in set used by the service, compiled once per process.
    pub fn standard() -> &'static SelectorSet {
        &STANDARD
    }

    pub fn fields(&self) -> &[FieldSelector] {
        &self.fields
    }
}

/// Evaluate every selector against `document`.
///
/// Each value has leading and trailing whitespace trimmed, so
/// `<title>\n  Bar  \n</title>` yields `"Bar"`. Inner whitespace is kept
/// as is. Fields the set does not cover, or that match nothing, are empty
/// strings.
pub fn extract(document: &ParsedDocument, selectors: &SelectorSet) -> MetadataFields {
    let html = document.html();
    let mut fields = MetadataFields::default();
    for selector in selectors.fields() {
        fields.set(selector.field, selector.evaluate(html));
    }
    fields
}

/// Trimmed value of the first node matching a single query, or `""`.
pub fn first_match(document: &ParsedDocument, query: &str) -> Result<String, Error> {
    let probe = Probe::parse(query)?;
    Ok(probe.evaluate(document.html()).unwrap_or_default())
}

/// Parse a fetched body and extract its metadata in one step.
///
/// Keeps the non-`Send` document tree inside a synchronous call.
pub fn extract_metadata(body: &[u8], selectors: &SelectorSet) -> Result<MetadataFields, Error> {
    let document = parse(body)?;
    Ok(extract(&document, selectors))
}
