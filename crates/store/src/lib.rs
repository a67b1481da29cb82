//! SQLite-backed price store.
//!
//! This crate provides:
//! - A price log: every current price fetched is appended to `prices`
//! - A daily cache: the historical series is stored once per day under a
//!   fingerprint of the day, currency, asset and provider
//!
//! A [`PriceStore`] is opened for one [`Scope`]; all reads and writes are
//! filtered by it.

mod error;

pub use error::StoreError;

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use md5::{Digest, Md5};
use quotes::{Point, Series};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

/// What is being tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Provider name, e.g. `IEX`
    pub provider: String,
    /// ISO currency code, e.g. `USD`
    pub currency: String,
    /// Ticker or coin symbol
    pub asset: String,
}

impl Scope {
    /// Creates a scope.
    pub fn new(provider: impl Into<String>, currency: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            currency: currency.into(),
            asset: asset.into(),
        }
    }

    /// Cache fingerprint for `day`: MD5 hex of day, currency, asset and provider.
    pub fn cache_key(&self, day: NaiveDate) -> String {
        let mut hasher = Md5::new();
        hasher.update(day.format("%Y-%m-%d").to_string().as_bytes());
        hasher.update(self.currency.as_bytes());
        hasher.update(self.asset.as_bytes());
        hasher.update(self.provider.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// The price store.
pub struct PriceStore {
    conn: Connection,
    scope: Scope,
}

impl std::fmt::Debug for PriceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceStore").field("scope", &self.scope).finish()
    }
}

impl PriceStore {
    /// Opens or creates the database at `path`.
    pub fn open(path: impl AsRef<Path>, scope: Scope) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                path: parent.display().to_string(),
                source,
            })?;
        }
        tracing::debug!(path = %path.display(), "opening price store");
        Self::with_connection(Connection::open(path)?, scope)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory(scope: Scope) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, scope)
    }

    /// Opens a database given as a `sqlite://` URL or a plain path.
    ///
    /// `sqlite://` with nothing after it (or `:memory:`) is in-memory;
    /// `sqlite:///data/prices.db` is the file `/data/prices.db`.
    pub fn open_url(url: &str, scope: Scope) -> Result<Self, StoreError> {
        let path = url.strip_prefix("sqlite://").unwrap_or(url);
        if path.is_empty() || path == ":memory:" {
            Self::open_in_memory(scope)
        } else {
            Self::open(path, scope)
        }
    }

    fn with_connection(conn: Connection, scope: Scope) -> Result<Self, StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS prices (
                datetime TEXT NOT NULL,
                provider TEXT NOT NULL,
                currency TEXT NOT NULL,
                asset TEXT NOT NULL,
                price REAL NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_prices_scope
                ON prices(provider, currency, asset, datetime);

            CREATE TABLE IF NOT EXISTS cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn, scope })
    }

    /// Scope this store reads and writes.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Appends the current price to the log and hands it back.
    pub fn store_current(&self, current: Point) -> Result<Point, StoreError> {
        self.conn.execute(
            "INSERT INTO prices (datetime, provider, currency, asset, price) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                format_datetime(current.timestamp),
                self.scope.provider,
                self.scope.currency,
                self.scope.asset,
                current.price
            ],
        )?;
        tracing::debug!(price = current.price, asset = %self.scope.asset, "stored current price");
        Ok(current)
    }

    /// Caches the historical series for `day` and hands it back.
    ///
    /// A second insert for the same day is logged and ignored; the first
    /// cached series stays.
    pub fn store_historical(&self, historical: Series, day: NaiveDate) -> Result<Series, StoreError> {
        let key = self.scope.cache_key(day);
        tracing::debug!(key = %key, "caching historical data");
        let value = serde_json::to_string(&historical)?;
        match self
            .conn
            .execute("INSERT INTO cache (key, value) VALUES (?1, ?2)", params![key, value])
        {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                tracing::warn!(key = %key, "historical data already cached");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(historical)
    }

    /// Cached series for `day`, if any.
    pub fn retrieve_historical(&self, day: NaiveDate) -> Result<Option<Series>, StoreError> {
        let key = self.scope.cache_key(day);
        tracing::debug!(key = %key, "retrieving historical data");
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM cache WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        value
            .map(|json| serde_json::from_str(&json).map_err(StoreError::from))
            .transpose()
    }

    /// Up to `limit` logged prices, newest first.
    pub fn recent(&self, limit: usize) -> Result<Series, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(
            "SELECT datetime, price FROM prices
             WHERE currency = ?1 AND asset = ?2 AND provider = ?3
             ORDER BY datetime DESC
             LIMIT ?4",
        )?;
        let rows = stmt
            .query_map(
                params![self.scope.currency, self.scope.asset, self.scope.provider, limit],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let points = rows
            .into_iter()
            .map(|(datetime, price)| Ok(Point::new(parse_datetime(&datetime)?, price)))
            .collect::<Result<Vec<_>, StoreError>>()?;
        Ok(points.into())
    }
}

fn format_datetime(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| StoreError::Timestamp {
            value: value.to_owned(),
            source,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn scope() -> Scope {
        Scope::new("IEX", "USD", "AAPL")
    }

    #[test]
    fn test_cache_key_is_md5_of_fields() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let key = scope().cache_key(day);
        // md5("2024-03-01USDAAPLIEX")
        let mut hasher = Md5::new();
        hasher.update(b"2024-03-01USDAAPLIEX");
        assert_eq!(key, format!("{:x}", hasher.finalize()));
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn test_cache_key_changes_with_each_field() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let next = day.succ_opt().unwrap();
        let base = scope().cache_key(day);
        assert_ne!(base, scope().cache_key(next));
        assert_ne!(base, Scope::new("MOCK", "USD", "AAPL").cache_key(day));
        assert_ne!(base, Scope::new("IEX", "EUR", "AAPL").cache_key(day));
        assert_ne!(base, Scope::new("IEX", "USD", "MSFT").cache_key(day));
    }

    #[test]
    fn test_datetime_text_round_trip() {
        let now = Utc::now();
        let parsed = parse_datetime(&format_datetime(now)).unwrap();
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
        assert!(matches!(parse_datetime("yesterday"), Err(StoreError::Timestamp { .. })));
    }

    #[test]
    fn test_open_url_variants() {
        assert!(PriceStore::open_url("sqlite://", scope()).is_ok());
        assert!(PriceStore::open_url(":memory:", scope()).is_ok());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prices.db");
        let url = format!("sqlite://{}", path.display());
        PriceStore::open_url(&url, scope()).unwrap();
        assert!(path.exists());
    }
}
