//! Quotes
//!
//! Price data for one asset from a pluggable provider.
//!
//! - [`Point`] / [`Series`]: timestamped prices, JSON-serializable so a
//!   series can be cached verbatim
//! - [`Provider`]: current price and daily history for a configured asset
//! - [`Iex`], [`CoinGecko`], [`Mock`]: concrete providers, selected at run
//!   time through [`AnyProvider`]
//! - [`Converter`]: exchange rates for providers quoting in a fixed currency

mod asset;
pub mod coingecko;
pub mod currency;
mod error;
pub mod iex;
pub mod mock;
mod point;
mod provider;

pub use asset::Asset;
pub use coingecko::CoinGecko;
pub use currency::Converter;
pub use error::QuoteError;
pub use iex::Iex;
pub use mock::Mock;
pub use point::{Point, Series};
pub use provider::{AnyProvider, Provider, ProviderKind};
