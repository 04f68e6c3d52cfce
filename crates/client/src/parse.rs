//! Raw body to document tree.
//!
//! Parsing goes through html5ever (via `scraper`), which recovers from the
//! broken markup found on real pages and accepts XHTML/XML well enough for
//! `<meta>` and `<title>` lookups. Only bodies that carry no markup at all are
//! refused.

use pagemeta_core::Error;
use scraper::Html;
use std::borrow::Cow;

/// A queryable document tree owned by one scrape.
///
/// Not `Send`: build, query and drop it without crossing an await point.
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    pub(crate) fn html(&self) -> &Html {
        &self.html
    }
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("errors", &self.html.errors.len())
            .finish()
    }
}

const BINARY_MAGIC: &[&[u8]] = &[
    b"\x89PNG\r\n\x1a\n",
    b"GIF87a",
    b"GIF89a",
    b"\xff\xd8\xff",
    b"%PDF-",
    b"PK\x03\x04",
    b"\x1f\x8b",
];

/// Parse a fetched body into a [`ParsedDocument`].
///
/// UTF-16 bodies (with a BOM, or starting with `<` as a 16-bit unit) are
/// decoded as such; everything else is read as UTF-8 with invalid sequences
/// replaced. Stray NUL bytes inside markup are left to html5ever.
///
/// # Errors
///
/// Returns `Error::Parse` if the body is empty, whitespace only, or binary:
/// a known image/archive/PDF signature, or a NUL-heavy body with no markup.
pub fn parse(body: &[u8]) -> Result<ParsedDocument, Error> {
    if BINARY_MAGIC.iter().any(|magic| body.starts_with(magic)) {
        return Err(Error::Parse("binary content".into()));
    }

    let text = decode(body);
    if text.trim().is_empty() {
        return Err(Error::Parse("empty document".into()));
    }

    let nuls = body.iter().filter(|b| **b == 0).count();
    if !text.contains('<') && nuls * 10 > body.len() {
        return Err(Error::Parse("binary content".into()));
    }

    let html = Html::parse_document(&text);
    if !html.errors.is_empty() {
        tracing::trace!(errors = html.errors.len(), "recovered from malformed markup");
    }

    Ok(ParsedDocument { html })
}

fn decode(body: &[u8]) -> Cow<'_, str> {
    let little_endian = match body {
        [0xFF, 0xFE, ..] | [b'<', 0, ..] => true,
        [0xFE, 0xFF, ..] | [0, b'<', ..] => false,
        _ => return String::from_utf8_lossy(body),
    };

    let units = body.chunks_exact(2).map(|pair| {
        let bytes = [pair[0], pair[1]];
        if little_endian { u16::from_le_bytes(bytes) } else { u16::from_be_bytes(bytes) }
    });
    let text: String = char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    Cow::Owned(text.trim_start_matches('\u{feff}').to_string())
}
