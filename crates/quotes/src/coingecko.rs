//! CoinGecko crypto-currency quotes.
//!
//! CoinGecko prices directly in the configured currency, so no conversion is
//! needed. Symbols are mapped to CoinGecko coin ids through the coin list.
//! History covers the last 100 days; ranges over 90 days come back with
//! daily granularity.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::asset::Asset;
use crate::error::QuoteError;
use crate::point::{Point, Series};
use crate::provider::Provider;

/// Public CoinGecko API base.
pub const COINGECKO_API: &str = "https://api.coingecko.com/api/v3";

const NAME: &str = "CoinGecko";
const HISTORY_DAYS: i64 = 100;

/// CoinGecko client for one asset.
#[derive(Debug, Clone)]
pub struct CoinGecko {
    client: reqwest::Client,
    endpoint: String,
    asset: Asset,
    currency: String,
}

/// Entry of `/coins/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct Coin {
    /// CoinGecko id, e.g. `bitcoin`
    pub id: String,
    /// Lower-case ticker symbol, e.g. `btc`
    pub symbol: String,
}

#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
}

/// Finds the id of the first coin whose symbol matches (case-insensitive).
pub fn find_id(coins: &[Coin], symbol: &str) -> Option<String> {
    let symbol = symbol.to_lowercase();
    coins
        .iter()
        .find(|coin| coin.symbol == symbol)
        .map(|coin| coin.id.clone())
}

/// Extracts `{id: {currency: price}}` from a `/simple/price` response.
pub fn parse_simple_price(body: &str, id: &str, currency: &str) -> Result<f64, QuoteError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    value
        .get(id)
        .and_then(|prices| prices.get(currency.to_lowercase()))
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| QuoteError::Malformed {
            provider: NAME,
            detail: format!("no {currency} price for {id}"),
        })
}

/// Parses `/market_chart/range`; timestamps are in milliseconds.
pub fn parse_market_chart(body: &str) -> Result<Series, QuoteError> {
    let chart: MarketChart = serde_json::from_str(body)?;
    let mut points = Vec::with_capacity(chart.prices.len());
    for (millis, price) in chart.prices {
        // SAFETY: float-to-int casts saturate; out-of-range stamps are rejected below.
        #[allow(clippy::cast_possible_truncation)]
        let millis = millis as i64;
        let timestamp = DateTime::from_timestamp_millis(millis).ok_or_else(|| QuoteError::Malformed {
            provider: NAME,
            detail: format!("timestamp out of range: {millis}"),
        })?;
        points.push(Point::new(timestamp, price));
    }
    Ok(points.into())
}

impl CoinGecko {
    /// Client for `asset`, priced in `currency`.
    pub fn new(client: reqwest::Client, asset: Asset, currency: &str) -> Self {
        Self {
            client,
            endpoint: COINGECKO_API.to_owned(),
            asset,
            currency: currency.to_lowercase(),
        }
    }

    /// Overrides the API base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn crypto(&self) -> Result<&str, QuoteError> {
        match &self.asset {
            Asset::Crypto(symbol) => Ok(symbol),
            Asset::Stock(_) => Err(QuoteError::Unsupported {
                provider: NAME,
                asset: self.asset.clone(),
            }),
        }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String, QuoteError> {
        let body = self
            .client
            .get(format!("{}/{}", self.endpoint, path))
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    async fn coin_id(&self) -> Result<String, QuoteError> {
        let symbol = self.crypto()?;
        let coins: Vec<Coin> = serde_json::from_str(&self.get("coins/list", &[]).await?)?;
        let id = find_id(&coins, symbol).ok_or_else(|| QuoteError::UnknownSymbol {
            provider: NAME,
            symbol: symbol.to_owned(),
        })?;
        tracing::debug!(symbol, id = %id, "resolved coin id");
        Ok(id)
    }
}

impl Provider for CoinGecko {
    fn name(&self) -> &'static str {
        NAME
    }

    fn caches_historical(&self) -> bool {
        true
    }

    async fn current(&self) -> Result<Point, QuoteError> {
        let id = self.coin_id().await?;
        let body = self
            .get(
                "simple/price",
                &[("ids", id.as_str()), ("vs_currencies", self.currency.as_str())],
            )
            .await?;
        let price = parse_simple_price(&body, &id, &self.currency)?;
        Ok(Point::new(Utc::now(), price))
    }

    async fn historical(&self) -> Result<Series, QuoteError> {
        let id = self.coin_id().await?;
        let now = Utc::now();
        let from = (now - TimeDelta::days(HISTORY_DAYS)).timestamp().to_string();
        let to = (now - TimeDelta::days(1)).timestamp().to_string();
        let body = self
            .get(
                &format!("coins/{id}/market_chart/range"),
                &[
                    ("vs_currency", self.currency.as_str()),
                    ("from", from.as_str()),
                    ("to", to.as_str()),
                ],
            )
            .await?;
        parse_market_chart(&body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn coins() -> Vec<Coin> {
        serde_json::from_str(
            r#"[
                {"id":"bitcoin","symbol":"btc","name":"Bitcoin"},
                {"id":"ethereum","symbol":"eth","name":"Ethereum"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_find_id_ignores_case() {
        assert_eq!(find_id(&coins(), "BTC").as_deref(), Some("bitcoin"));
        assert_eq!(find_id(&coins(), "doge"), None);
    }

    #[test]
    fn test_parse_simple_price() {
        let body = r#"{"bitcoin":{"gbp":52311.5}}"#;
        assert_eq!(parse_simple_price(body, "bitcoin", "GBP").unwrap(), 52311.5);
        assert!(matches!(
            parse_simple_price(body, "bitcoin", "usd"),
            Err(QuoteError::Malformed { .. })
        ));
    }

    #[test]
    fn test_parse_market_chart() {
        let body = r#"{"prices":[[1709251200000,61000.1],[1709337600000,62000.2]],"market_caps":[]}"#;
        let series = parse_market_chart(body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].timestamp.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(series.points[1].price, 62000.2);
    }

    #[tokio::test]
    async fn test_stock_is_unsupported() {
        let gecko = CoinGecko::new(reqwest::Client::new(), Asset::Stock("AAPL".into()), "USD")
            .with_endpoint("http://127.0.0.1:1");
        assert!(matches!(gecko.current().await, Err(QuoteError::Unsupported { .. })));
    }
}
