//! `url_data` table operations.
//!
//! One row per exact URL string. Writes replace the whole row, so two
//! concurrent writers for the same URL leave whichever landed last.

use super::connection::CacheDb;
use super::store::MetadataStore;
use crate::{Error, MetadataRecord};
use async_trait::async_trait;
use tokio_rusqlite::params;

impl CacheDb {
    /// Insert or replace the row for `record.site_url`.
    pub async fn upsert_record(&self, record: &MetadataRecord) -> Result<(), Error> {
        let record = record.clone();
        let stored_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO url_data (
                    site_url, title, description, image, keywords, og_url, og_type, stored_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(site_url) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    image = excluded.image,
                    keywords = excluded.keywords,
                    og_url = excluded.og_url,
                    og_type = excluded.og_type,
                    stored_at = excluded.stored_at",
                    params![
                        &record.site_url,
                        &record.title,
                        &record.description,
                        &record.image,
                        &record.keywords,
                        &record.og_url,
                        &record.og_type,
                        &stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// All rows whose key equals `site_url` exactly.
    pub async fn query_records(&self, site_url: &str) -> Result<Vec<MetadataRecord>, Error> {
        let site_url = site_url.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<MetadataRecord>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT title, description, image, keywords, site_url, og_url, og_type
                FROM url_data WHERE site_url = ?1",
                )?;

                let rows = stmt.query_map(params![site_url], |row| {
                    Ok(MetadataRecord {
                        title: row.get(0)?,
                        description: row.get(1)?,
                        image: row.get(2)?,
                        keywords: row.get(3)?,
                        site_url: row.get(4)?,
                        og_url: row.get(5)?,
                        og_type: row.get(6)?,
                    })
                })?;

                let records = rows.collect::<Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of cached URLs.
    pub async fn count_records(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM url_data", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl MetadataStore for CacheDb {
    async fn lookup(&self, url: &str) -> Result<Vec<MetadataRecord>, Error> {
        self.query_records(url).await
    }

    async fn store(&self, record: &MetadataRecord) -> Result<(), Error> {
        self.upsert_record(record).await
    }
}
