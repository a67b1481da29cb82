//! Currency conversion through the Frankfurter exchange-rate API.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::QuoteError;

/// Public Frankfurter endpoint.
pub const FRANKFURTER_API: &str = "https://api.frankfurter.app";

const PROVIDER: &str = "Frankfurter";

/// Converts amounts from a provider's native currency to the configured one.
#[derive(Debug, Clone)]
pub struct Converter {
    client: reqwest::Client,
    endpoint: String,
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct Latest {
    rates: HashMap<String, f64>,
}

/// Extracts the `to` rate from a `/latest` response.
pub fn parse_rate(body: &str, to: &str) -> Result<f64, QuoteError> {
    let latest: Latest = serde_json::from_str(body)?;
    latest
        .rates
        .get(to)
        .copied()
        .ok_or_else(|| QuoteError::Malformed {
            provider: PROVIDER,
            detail: format!("no rate for {to}"),
        })
}

impl Converter {
    /// Converter from `from` to `to` using the public endpoint.
    pub fn new(client: reqwest::Client, from: &str, to: &str) -> Self {
        Self {
            client,
            endpoint: FRANKFURTER_API.to_owned(),
            from: from.to_owned(),
            to: to.to_owned(),
        }
    }

    /// Overrides the API base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// `true` when source and target currency are the same.
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    /// Multiplier from the native to the configured currency.
    ///
    /// 1.0 without a request when the currencies match.
    pub async fn rate(&self) -> Result<f64, QuoteError> {
        if self.is_identity() {
            return Ok(1.0);
        }
        tracing::debug!(from = %self.from, to = %self.to, "fetching exchange rate");
        let body = self
            .client
            .get(format!("{}/latest", self.endpoint))
            .query(&[("from", self.from.as_str()), ("to", self.to.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_rate(&body, &self.to)
    }

    /// Converts one amount.
    pub async fn convert(&self, amount: f64) -> Result<f64, QuoteError> {
        Ok(amount * self.rate().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate() {
        let body = r#"{"amount":1.0,"base":"USD","date":"2024-03-01","rates":{"EUR":0.9237}}"#;
        assert_eq!(parse_rate(body, "EUR").unwrap(), 0.9237);
        assert!(matches!(parse_rate(body, "GBP"), Err(QuoteError::Malformed { .. })));
        assert!(matches!(parse_rate("nope", "EUR"), Err(QuoteError::Json(_))));
    }

    #[tokio::test]
    async fn test_identity_needs_no_request() {
        let converter = Converter::new(reqwest::Client::new(), "USD", "USD")
            .with_endpoint("http://127.0.0.1:1");
        assert!(converter.is_identity());
        assert_eq!(converter.convert(12.5).await.unwrap(), 12.5);
    }
}
