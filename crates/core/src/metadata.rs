//! Page metadata fields and the cached record built from them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A metadata field extracted from a page.
///
/// The set is closed: every extraction produces a value for each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Image,
    Keywords,
    OgUrl,
    OgType,
}

impl Field {
    /// All fields, in response order.
    pub const ALL: [Field; 6] =
        [Field::Title, Field::Description, Field::Image, Field::Keywords, Field::OgUrl, Field::OgType];

    /// Wire name of the field, as it appears in JSON responses.
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Image => "image",
            Field::Keywords => "keywords",
            Field::OgUrl => "ogUrl",
            Field::OgType => "ogType",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values extracted from one document.
///
/// Absent metadata is the empty string, never a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetadataFields {
    pub title: String,
    pub description: String,
    pub image: String,
    pub keywords: String,
    pub og_url: String,
    pub og_type: String,
}

impl MetadataFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Image => &self.image,
            Field::Keywords => &self.keywords,
            Field::OgUrl => &self.og_url,
            Field::OgType => &self.og_type,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Image => &mut self.image,
            Field::Keywords => &mut self.keywords,
            Field::OgUrl => &mut self.og_url,
            Field::OgType => &mut self.og_type,
        };
        *slot = value;
    }
}

/// A cache entry: extracted fields plus the URL they were scraped from.
///
/// Serialized field order follows the persisted item layout, which places
/// `siteUrl` between `keywords` and `ogUrl`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    pub title: String,
    pub description: String,
    pub image: String,
    pub keywords: String,
    pub site_url: String,
    pub og_url: String,
    pub og_type: String,
}

impl MetadataRecord {
    /// Build a record for `site_url` from freshly extracted fields.
    pub fn new(site_url: impl Into<String>, fields: MetadataFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            image: fields.image,
            keywords: fields.keywords,
            site_url: site_url.into(),
            og_url: fields.og_url,
            og_type: fields.og_type,
        }
    }

    /// The extracted fields without the source URL.
    pub fn fields(&self) -> MetadataFields {
        MetadataFields {
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            keywords: self.keywords.clone(),
            og_url: self.og_url.clone(),
            og_type: self.og_type.clone(),
        }
    }
}
