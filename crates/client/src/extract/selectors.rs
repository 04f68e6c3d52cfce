//! Built-in field queries.

use pagemeta_core::Field;

/// Queries for each field, highest priority first.
///
/// Open Graph properties win over their plain `<meta name>` counterparts
/// only when they come first in the document; the two are one selector group.
/// The `<title>` element is consulted only when no title meta tag matched.
pub const STANDARD_QUERIES: &[(Field, &[&str])] = &[
    (Field::Title, &[r#"meta[property="og:title"][content], meta[name="title"][content] @content"#, "title"]),
    (
        Field::Description,
        &[r#"meta[property="og:description"][content], meta[name="description"][content] @content"#],
    ),
    (Field::Image, &[r#"meta[property="og:image"][content] @content"#]),
    (Field::Keywords, &[r#"meta[name="keywords"][content], meta[property="keywords"][content] @content"#]),
    (Field::OgUrl, &[r#"meta[property="og:url"][content] @content"#]),
    (Field::OgType, &[r#"meta[property="og:type"][content] @content"#]),
];
