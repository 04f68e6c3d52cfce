//! Test doubles for the fetcher and the metadata store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use pagemeta_client::{FetchResponse, Fetcher};
use pagemeta_core::{CacheDb, Error, MetadataRecord, MetadataStore};
use tokio::sync::Notify;

pub const PAGE: &str = r#"<html><head>
    <title>Bar</title>
    <meta property="og:title" content="Foo">
    <meta property="og:type" content="website">
</head><body></body></html>"#;

/// Serves a fixed body, or fails every fetch when `body` is `None`.
pub struct StubFetcher {
    body: Option<Bytes>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn page(body: &str) -> Arc<Self> {
        Arc::new(Self { body: Some(Bytes::copy_from_slice(body.as_bytes())), calls: AtomicUsize::new(0) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { body: None, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let bytes = self
            .body
            .clone()
            .ok_or_else(|| Error::Fetch("dns error: failed to lookup address information".into()))?;
        Ok(FetchResponse {
            url: url.to_string(),
            final_url: url.to_string(),
            status: 200,
            content_type: Some("text/html".into()),
            bytes,
            fetch_ms: 1,
        })
    }
}

/// Store whose every operation fails.
#[derive(Default)]
pub struct FailingStore {
    pub stores: AtomicUsize,
}

#[async_trait]
impl MetadataStore for FailingStore {
    async fn lookup(&self, _url: &str) -> Result<Vec<MetadataRecord>, Error> {
        Err(Error::Database(tokio_rusqlite::Error::ConnectionClosed))
    }

    async fn store(&self, _record: &MetadataRecord) -> Result<(), Error> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        Err(Error::Database(tokio_rusqlite::Error::ConnectionClosed))
    }
}

/// Wraps a [`CacheDb`]; writes block until [`GatedStore::open`] is called.
pub struct GatedStore {
    pub db: CacheDb,
    gate: Notify,
}

impl GatedStore {
    pub async fn new() -> Arc<Self> {
        Arc::new(Self { db: CacheDb::open_in_memory().await.unwrap(), gate: Notify::new() })
    }

    pub fn open(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl MetadataStore for GatedStore {
    async fn lookup(&self, url: &str) -> Result<Vec<MetadataRecord>, Error> {
        self.db.lookup(url).await
    }

    async fn store(&self, record: &MetadataRecord) -> Result<(), Error> {
        self.gate.notified().await;
        self.db.store(record).await
    }
}

/// Reports the same URL twice, which no unique-key backend would.
pub struct DuplicateStore;

#[async_trait]
impl MetadataStore for DuplicateStore {
    async fn lookup(&self, url: &str) -> Result<Vec<MetadataRecord>, Error> {
        let record = MetadataRecord { site_url: url.to_string(), title: "dup".into(), ..Default::default() };
        Ok(vec![record.clone(), record])
    }

    async fn store(&self, _record: &MetadataRecord) -> Result<(), Error> {
        Ok(())
    }
}
