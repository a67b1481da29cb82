use std::fmt;

/// The asset being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Asset {
    /// Exchange-listed stock ticker, e.g. `AAPL`
    Stock(String),
    /// Crypto-currency symbol, e.g. `BTC`
    Crypto(String),
}

impl Asset {
    /// Ticker or coin symbol as configured.
    pub fn symbol(&self) -> &str {
        match self {
            Asset::Stock(symbol) | Asset::Crypto(symbol) => symbol,
        }
    }

    /// Asset class name for messages.
    pub fn class(&self) -> &'static str {
        match self {
            Asset::Stock(_) => "stock",
            Asset::Crypto(_) => "crypto",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
