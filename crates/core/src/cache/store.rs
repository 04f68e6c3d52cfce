//! Storage abstraction for metadata records.

use crate::{Error, MetadataRecord};
use async_trait::async_trait;

/// Point lookup and point write of [`MetadataRecord`]s keyed by URL.
///
/// Keys are compared as exact strings: `http://a.com` and `http://a.com/`
/// are different entries.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Return every record stored under `url`.
    ///
    /// Backends with a unique key return at most one item; callers must not
    /// rely on that and should treat anything but exactly one as a miss.
    async fn lookup(&self, url: &str) -> Result<Vec<MetadataRecord>, Error>;

    /// Insert or overwrite the record keyed by `record.site_url`.
    async fn store(&self, record: &MetadataRecord) -> Result<(), Error>;
}
