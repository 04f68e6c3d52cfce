//! Cache-or-compute scrape orchestration.
//!
//! For each URL:
//! 1. Look the URL up in the metadata store. Exactly one record is a hit and
//!    is returned as stored. Zero records, several records or a lookup error
//!    all fall through to a fresh scrape.
//! 2. Fetch, parse and extract. A fetch or parse failure ends the request
//!    with [`ScrapeOutcome::Failed`] and nothing is written.
//! 3. On success the fields are returned immediately and the record is
//!    written by a detached task. A failed write is logged and nothing else.
//!
//! Concurrent misses for the same URL each scrape and each write; the last
//! write wins.

use std::sync::Arc;

use pagemeta_client::{Fetcher, SelectorSet, extract_metadata};
use pagemeta_core::{Error, MetadataFields, MetadataRecord, MetadataStore};
use tokio::task::JoinHandle;

/// Plain-text body returned when a scrape produces no result.
pub const SCRAPE_FAILED_MESSAGE: &str = "Something went wrong while parsing document...";

/// What a scrape request resolved to.
///
/// `Cached` carries `siteUrl`, `Scraped` does not; callers serialize each
/// as-is, so the two success shapes differ on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Cached(MetadataRecord),
    Scraped(MetadataFields),
    Failed,
}

/// A finished request plus the cache write it started, if any.
#[derive(Debug)]
pub struct Scrape {
    pub outcome: ScrapeOutcome,
    /// Background store task. Dropping it detaches the task; awaiting it only
    /// tells you the write attempt is over, never whether it succeeded.
    pub pending_store: Option<JoinHandle<()>>,
}

impl Scrape {
    fn done(outcome: ScrapeOutcome) -> Self {
        Self { outcome, pending_store: None }
    }
}

/// Request orchestrator shared by every surface.
#[derive(Clone)]
pub struct Scraper {
    store: Arc<dyn MetadataStore>,
    fetcher: Arc<dyn Fetcher>,
    selectors: &'static SelectorSet,
}

impl Scraper {
    /// Build an orchestrator over the built-in selector set.
    pub fn new(store: Arc<dyn MetadataStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { store, fetcher, selectors: SelectorSet::standard() }
    }

    /// Resolve metadata for `url`.
    pub async fn scrape(&self, url: &str) -> Scrape {
        match self.store.lookup(url).await {
            Ok(mut records) if records.len() == 1 => {
                tracing::info!(url, "cached entry found");
                return Scrape::done(ScrapeOutcome::Cached(records.remove(0)));
            }
            Ok(records) => {
                tracing::info!(url, matches = records.len(), "no cached entry found, scraping");
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "cache lookup failed, scraping");
            }
        }

        let fields = match self.run_pipeline(url).await {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!(url, error = %e, "scrape failed");
                return Scrape::done(ScrapeOutcome::Failed);
            }
        };

        let pending_store = self.spawn_store(MetadataRecord::new(url, fields.clone()));

        Scrape { outcome: ScrapeOutcome::Scraped(fields), pending_store: Some(pending_store) }
    }

    async fn run_pipeline(&self, url: &str) -> Result<MetadataFields, Error> {
        let response = self.fetcher.fetch(url).await?;
        tracing::debug!(url, final_url = %response.final_url, bytes = response.bytes.len(), "parsing");
        extract_metadata(&response.bytes, self.selectors)
    }

    fn spawn_store(&self, record: MetadataRecord) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            match store.store(&record).await {
                Ok(()) => tracing::debug!(url = %record.site_url, "data cached"),
                Err(e) => tracing::warn!(url = %record.site_url, error = %e, "error caching data"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DuplicateStore, FailingStore, GatedStore, PAGE, StubFetcher};
    use pagemeta_core::CacheDb;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    async fn memory_store() -> Arc<CacheDb> {
        Arc::new(CacheDb::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_miss_scrapes_then_hit_serves_cache() {
        let db = memory_store().await;
        let fetcher = StubFetcher::page(PAGE);
        let scraper = Scraper::new(db.clone(), fetcher.clone());

        let first = scraper.scrape("http://example.com").await;
        let ScrapeOutcome::Scraped(fields) = &first.outcome else {
            panic!("expected scraped outcome, got {:?}", first.outcome);
        };
        assert_eq!(fields.title, "Foo");
        assert_eq!(fields.og_type, "website");
        first.pending_store.unwrap().await.unwrap();

        let second = scraper.scrape("http://example.com").await;
        let expected = MetadataRecord::new("http://example.com", fields.clone());
        assert_eq!(second.outcome, ScrapeOutcome::Cached(expected));
        assert!(second.pending_store.is_none());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_hit_never_fetches() {
        let db = memory_store().await;
        let cached = MetadataRecord { site_url: "http://example.com".into(), title: "Stored".into(), ..Default::default() };
        db.store(&cached).await.unwrap();

        let fetcher = StubFetcher::page(PAGE);
        let scraper = Scraper::new(db, fetcher.clone());

        let scrape = scraper.scrape("http://example.com").await;
        assert_eq!(scrape.outcome, ScrapeOutcome::Cached(cached));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_responds_failed_without_store() {
        let db = memory_store().await;
        let scraper = Scraper::new(db.clone(), StubFetcher::failing());

        let scrape = scraper.scrape("http://bad.invalid").await;
        assert_eq!(scrape.outcome, ScrapeOutcome::Failed);
        assert!(scrape.pending_store.is_none());
        assert_eq!(db.count_records().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_parse_failure_responds_failed_without_store() {
        let db = memory_store().await;
        let scraper = Scraper::new(db.clone(), StubFetcher::page("   "));

        let scrape = scraper.scrape("http://example.com/empty").await;
        assert_eq!(scrape.outcome, ScrapeOutcome::Failed);
        assert_eq!(db.count_records().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_lookup_error_falls_back_to_scrape() {
        let store = Arc::new(FailingStore::default());
        let fetcher = StubFetcher::page(PAGE);
        let scraper = Scraper::new(store.clone(), fetcher.clone());

        let scrape = scraper.scrape("http://example.com").await;
        assert!(matches!(scrape.outcome, ScrapeOutcome::Scraped(ref f) if f.title == "Foo"));
        assert_eq!(fetcher.calls(), 1);

        // failed write is swallowed by the background task
        scrape.pending_store.unwrap().await.unwrap();
        assert_eq!(store.stores.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_multiple_matches_treated_as_miss() {
        let fetcher = StubFetcher::page(PAGE);
        let scraper = Scraper::new(Arc::new(DuplicateStore), fetcher.clone());

        let scrape = scraper.scrape("http://example.com").await;
        assert!(matches!(scrape.outcome, ScrapeOutcome::Scraped(_)));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_response_does_not_wait_for_store() {
        let store = GatedStore::new().await;
        let scraper = Scraper::new(store.clone(), StubFetcher::page(PAGE));

        let scrape = tokio::time::timeout(Duration::from_secs(5), scraper.scrape("http://example.com"))
            .await
            .expect("scrape must not block on the cache write");
        assert!(matches!(scrape.outcome, ScrapeOutcome::Scraped(_)));

        let pending = scrape.pending_store.unwrap();
        assert!(!pending.is_finished());
        assert!(store.db.lookup("http://example.com").await.unwrap().is_empty());

        store.open();
        pending.await.unwrap();
        assert_eq!(store.db.lookup("http://example.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_both_store() {
        let db = memory_store().await;
        let fetcher = StubFetcher::page(PAGE);
        let scraper = Scraper::new(db.clone(), fetcher.clone());

        let (a, b) = tokio::join!(scraper.scrape("http://example.com"), scraper.scrape("http://example.com"));
        assert!(matches!(a.outcome, ScrapeOutcome::Scraped(_)));
        assert!(matches!(b.outcome, ScrapeOutcome::Scraped(_)));
        a.pending_store.unwrap().await.unwrap();
        b.pending_store.unwrap().await.unwrap();

        assert_eq!(fetcher.calls(), 2);
        assert_eq!(db.count_records().await.unwrap(), 1);
    }
}
