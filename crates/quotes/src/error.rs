//! Quote errors

use thiserror::Error;

use crate::asset::Asset;

/// Errors raised while fetching or decoding prices
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The provider does not handle this asset class
    #[error("{provider} does not provide {} prices ({asset})", asset.class())]
    Unsupported {
        /// Provider name
        provider: &'static str,
        /// Requested asset
        asset: Asset,
    },

    /// The symbol could not be mapped to a provider identifier
    #[error("{provider} has no asset with symbol {symbol}")]
    UnknownSymbol {
        /// Provider name
        provider: &'static str,
        /// Configured symbol
        symbol: String,
    },

    /// The provider name in the configuration is not known
    #[error("no price provider named {0}")]
    UnknownProvider(String),

    /// Request failed or returned an error status
    #[error("request: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("decode: {0}")]
    Json(#[from] serde_json::Error),

    /// Response body was well-formed but missing data
    #[error("unexpected response from {provider}: {detail}")]
    Malformed {
        /// Provider name
        provider: &'static str,
        /// What was missing or wrong
        detail: String,
    },
}
