//! IEX Cloud stock quotes.
//!
//! Prices are quoted in US dollars and converted when another currency is
//! configured. Historical requests cost credits, so the history is cached
//! for the day.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::asset::Asset;
use crate::currency::Converter;
use crate::error::QuoteError;
use crate::point::{Point, Series};
use crate::provider::Provider;

/// Default IEX Cloud API base.
pub const IEX_API: &str = "https://cloud.iexapis.com/stable";

const NAME: &str = "IEX";
const NATIVE_CURRENCY: &str = "USD";

/// IEX Cloud client for one asset.
#[derive(Debug, Clone)]
pub struct Iex {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    asset: Asset,
    converter: Converter,
}

#[derive(Debug, Deserialize)]
struct ChartDay {
    date: NaiveDate,
    close: f64,
}

/// Parses the plain-text body of `quote/latestPrice`.
pub fn parse_latest_price(body: &str) -> Result<f64, QuoteError> {
    body.trim().parse().map_err(|_| QuoteError::Malformed {
        provider: NAME,
        detail: format!("latest price is not a number: {body:?}"),
    })
}

/// Parses a close-only `chart/1m` response (`[{"date":"YYYY-MM-DD","close":..}]`).
pub fn parse_chart(body: &str) -> Result<Series, QuoteError> {
    let days: Vec<ChartDay> = serde_json::from_str(body)?;
    Ok(days
        .into_iter()
        .map(|day| Point::new(day.date.and_time(chrono::NaiveTime::MIN).and_utc(), day.close))
        .collect::<Vec<_>>()
        .into())
}

impl Iex {
    /// Client for `asset`, converting to `currency`.
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        asset: Asset,
        currency: &str,
    ) -> Self {
        let endpoint = endpoint.into();
        tracing::debug!(endpoint = %endpoint, "IEX endpoint");
        Self {
            converter: Converter::new(client.clone(), NATIVE_CURRENCY, currency),
            client,
            endpoint,
            token: token.into(),
            asset,
        }
    }

    /// Replaces the exchange-rate converter.
    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = converter;
        self
    }

    fn stock(&self) -> Result<&str, QuoteError> {
        match &self.asset {
            Asset::Stock(symbol) => Ok(symbol),
            Asset::Crypto(_) => Err(QuoteError::Unsupported {
                provider: NAME,
                asset: self.asset.clone(),
            }),
        }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String, QuoteError> {
        let url = format!("{}/stock/{}/{}", self.endpoint, self.stock()?, path);
        let body = self
            .client
            .get(url)
            .query(&[("token", self.token.as_str())])
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

impl Provider for Iex {
    fn name(&self) -> &'static str {
        NAME
    }

    fn caches_historical(&self) -> bool {
        true
    }

    async fn current(&self) -> Result<Point, QuoteError> {
        let body = self.get("quote/latestPrice", &[]).await?;
        let price = self.converter.convert(parse_latest_price(&body)?).await?;
        Ok(Point::new(Utc::now(), price))
    }

    async fn historical(&self) -> Result<Series, QuoteError> {
        let body = self.get("chart/1m", &[("chartCloseOnly", "true")]).await?;
        let series = parse_chart(&body)?;
        tracing::debug!(points = series.len(), "IEX history");
        Ok(series.scale(self.converter.rate().await?))
    }
}
