//! Provider abstraction

use std::fmt;
use std::str::FromStr;

use crate::coingecko::CoinGecko;
use crate::error::QuoteError;
use crate::iex::Iex;
use crate::mock::Mock;
use crate::point::{Point, Series};

/// Source of prices for one configured asset.
#[allow(async_fn_in_trait)]
pub trait Provider {
    /// Name recorded alongside stored prices.
    fn name(&self) -> &'static str;

    /// Whether historical data should be cached for the day.
    ///
    /// Providers whose history is slow or expensive to fetch return `true`.
    fn caches_historical(&self) -> bool;

    /// Latest price, stamped with the time it was fetched.
    async fn current(&self) -> Result<Point, QuoteError>;

    /// Daily closes, oldest first.
    async fn historical(&self) -> Result<Series, QuoteError>;
}

/// Provider names accepted in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// IEX Cloud (stocks)
    Iex,
    /// CoinGecko (crypto)
    CoinGecko,
    /// Synthetic data
    Mock,
}

impl ProviderKind {
    /// Canonical configuration name.
    pub const fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Iex => "IEX",
            ProviderKind::CoinGecko => "CoinGecko",
            ProviderKind::Mock => "MOCK",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = QuoteError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iex" => Ok(ProviderKind::Iex),
            "coingecko" => Ok(ProviderKind::CoinGecko),
            "mock" => Ok(ProviderKind::Mock),
            _ => Err(QuoteError::UnknownProvider(s.to_owned())),
        }
    }
}

/// Run-time selected provider.
#[derive(Debug)]
pub enum AnyProvider {
    /// IEX Cloud
    Iex(Iex),
    /// CoinGecko
    CoinGecko(CoinGecko),
    /// Synthetic data
    Mock(Mock),
}

impl AnyProvider {
    /// Which provider this is.
    pub fn kind(&self) -> ProviderKind {
        match self {
            AnyProvider::Iex(_) => ProviderKind::Iex,
            AnyProvider::CoinGecko(_) => ProviderKind::CoinGecko,
            AnyProvider::Mock(_) => ProviderKind::Mock,
        }
    }
}

impl Provider for AnyProvider {
    fn name(&self) -> &'static str {
        match self {
            AnyProvider::Iex(p) => p.name(),
            AnyProvider::CoinGecko(p) => p.name(),
            AnyProvider::Mock(p) => p.name(),
        }
    }

    fn caches_historical(&self) -> bool {
        match self {
            AnyProvider::Iex(p) => p.caches_historical(),
            AnyProvider::CoinGecko(p) => p.caches_historical(),
            AnyProvider::Mock(p) => p.caches_historical(),
        }
    }

    async fn current(&self) -> Result<Point, QuoteError> {
        match self {
            AnyProvider::Iex(p) => p.current().await,
            AnyProvider::CoinGecko(p) => p.current().await,
            AnyProvider::Mock(p) => p.current().await,
        }
    }

    async fn historical(&self) -> Result<Series, QuoteError> {
        match self {
            AnyProvider::Iex(p) => p.historical().await,
            AnyProvider::CoinGecko(p) => p.historical().await,
            AnyProvider::Mock(p) => p.historical().await,
        }
    }
}

impl From<Iex> for AnyProvider {
    fn from(p: Iex) -> Self {
        AnyProvider::Iex(p)
    }
}

impl From<CoinGecko> for AnyProvider {
    fn from(p: CoinGecko) -> Self {
        AnyProvider::CoinGecko(p)
    }
}

impl From<Mock> for AnyProvider {
    fn from(p: Mock) -> Self {
        AnyProvider::Mock(p)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("IEX".parse::<ProviderKind>().unwrap(), ProviderKind::Iex);
        assert_eq!("coingecko".parse::<ProviderKind>().unwrap(), ProviderKind::CoinGecko);
        assert_eq!("MOCK".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
        assert!(matches!(
            "AlphaVantage".parse::<ProviderKind>(),
            Err(QuoteError::UnknownProvider(name)) if name == "AlphaVantage"
        ));
    }

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in [ProviderKind::Iex, ProviderKind::CoinGecko, ProviderKind::Mock] {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }
}
