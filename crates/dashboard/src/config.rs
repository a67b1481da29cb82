//! Dashboard configuration.
//!
//! The configuration is a TOML file:
//!
//! ```toml
//! [main]
//! currency = "USD"
//! database = "sqlite://./data/inkticker.db"
//! crypto = "BTC"            # or: stock = "AAPL"
//! provider = "CoinGecko"    # IEX | CoinGecko | MOCK
//! display = "phat"          # or width/height (optionally with a model)
//! color = "red"             # black | red | yellow
//! loglevel = "INFO"
//! rotate = 0
//!
//! [fonts]
//! statusbar = "builtin:6x10"
//! # ...
//!
//! [iex]
//! token = "${IEX_TOKEN}"
//! ```
//!
//! String values may reference `${VAR}` for the environment variables in
//! [`ENV_ALLOW_LIST`]; unset variables expand to an empty string. Other
//! references are left as written.

use std::path::{Path, PathBuf};

use eink_specs::{DisplaySpec, InkColor};
use quotes::{Asset, ProviderKind};
use serde::Deserialize;
use thiserror::Error;

/// Environment variables that may be interpolated into configuration values.
pub const ENV_ALLOW_LIST: &[&str] = &[
    "IEX_TOKEN",
    "IEX_ENDPOINT",
    "INKTICKER_SCREEN",
    "INKTICKER_DATABASE",
];

const LOG_LEVELS: &[&str] = &["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("read {path}: {source}")]
    Io {
        /// Configuration path
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the schema
    #[error("parse: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value failed validation
    #[error("{field}: {reason}")]
    Invalid {
        /// Dotted key, e.g. `main.currency`
        field: &'static str,
        /// What is wrong
        reason: String,
    },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// `[main]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MainConfig {
    /// Upper-case ISO currency code prices are shown in
    pub currency: String,
    /// `sqlite://` URL or path of the price store
    pub database: String,
    /// Stock ticker (exclusive with `crypto`)
    pub stock: String,
    /// Coin symbol (exclusive with `stock`)
    pub crypto: String,
    /// Price provider name
    pub provider: String,
    /// Display model name (`phat`, `phat-ssd1608`, `what`)
    pub display: String,
    /// Explicit width in pixels, overriding the model
    pub width: Option<u32>,
    /// Explicit height in pixels, overriding the model
    pub height: Option<u32>,
    /// Panel ink colour
    pub color: String,
    /// Log level when `RUST_LOG` is not set
    pub loglevel: String,
    /// Counter-clockwise rotation of the final image, in degrees
    pub rotate: i32,
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_owned(),
            database: "sqlite://".to_owned(),
            stock: String::new(),
            crypto: String::new(),
            provider: "MOCK".to_owned(),
            display: "phat".to_owned(),
            width: None,
            height: None,
            color: "black".to_owned(),
            loglevel: "INFO".to_owned(),
            rotate: 0,
        }
    }
}

/// `[fonts]`: `builtin:<W>x<H>` or a TrueType path, with pixel sizes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Ticker bar and price movement
    pub ticker: String,
    /// Ticker pixel size
    pub ticker_size: f32,
    /// Headline price
    pub headline: String,
    /// Headline pixel size
    pub headline_size: f32,
    /// Status bar currency glyph
    pub symbol: String,
    /// Symbol pixel size
    pub symbol_size: f32,
    /// Status bar text
    pub statusbar: String,
    /// Status bar pixel size
    pub statusbar_size: f32,
    /// Chart tick labels
    pub chart: String,
    /// Chart pixel size
    pub chart_size: f32,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            ticker: "builtin:6x10".to_owned(),
            ticker_size: 10.0,
            headline: "builtin:10x20".to_owned(),
            headline_size: 20.0,
            symbol: "builtin:6x10".to_owned(),
            symbol_size: 10.0,
            statusbar: "builtin:6x10".to_owned(),
            statusbar_size: 10.0,
            chart: "builtin:4x6".to_owned(),
            chart_size: 6.0,
        }
    }
}

/// `[mascot]`: images shown next to the headline price.
#[derive(Debug, Clone, Deserialize)]
pub struct MascotConfig {
    /// Shown when the price went up
    pub increasing: PathBuf,
    /// Shown when the price went down
    pub decreasing: PathBuf,
    /// Shown when the price did not move
    #[serde(rename = "static")]
    pub unchanged: PathBuf,
}

/// `[iex]`
#[derive(Debug, Clone, Deserialize)]
pub struct IexConfig {
    /// API token
    pub token: String,
    /// API base URL; empty means the public endpoint
    #[serde(default)]
    pub endpoint: String,
}

impl IexConfig {
    /// Endpoint with the public default applied.
    pub fn endpoint(&self) -> &str {
        if self.endpoint.is_empty() {
            quotes::iex::IEX_API
        } else {
            &self.endpoint
        }
    }
}

/// `[outputs]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputsConfig {
    /// `inky` (panel), `file:<path>` (image file standing in for the panel)
    /// or `none`
    pub screen: String,
    /// Where the painted image is always saved
    pub local: PathBuf,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            screen: "inky".to_owned(),
            local: PathBuf::from("./data/out.png"),
        }
    }
}

/// Where the finished image is pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// The configured Inky panel
    Inky,
    /// An image file standing in for the panel
    File(PathBuf),
    /// Nowhere
    None,
}

impl OutputsConfig {
    /// Parsed `screen` value.
    pub fn screen(&self) -> Result<Screen, ConfigError> {
        match self.screen.as_str() {
            "inky" => Ok(Screen::Inky),
            "none" | "" => Ok(Screen::None),
            other => match other.strip_prefix("file:") {
                Some(path) if !path.is_empty() => Ok(Screen::File(PathBuf::from(path))),
                _ => Err(invalid(
                    "outputs.screen",
                    format!("expected inky, none or file:<path>, got {other:?}"),
                )),
            },
        }
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// `[main]`
    #[serde(default)]
    pub main: MainConfig,
    /// `[fonts]`
    #[serde(default)]
    pub fonts: FontsConfig,
    /// `[mascot]`; without it the headline has no mascot
    pub mascot: Option<MascotConfig>,
    /// `[iex]`; required for the IEX provider
    pub iex: Option<IexConfig>,
    /// `[outputs]`
    #[serde(default)]
    pub outputs: OutputsConfig,
}

impl Config {
    /// Reads, interpolates and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, |name| std::env::var(name).ok())
    }

    /// Parses configuration text, resolving `${VAR}` through `env`.
    pub fn parse(text: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut value: toml::Value = toml::from_str(text)?;
        interpolate_value(&mut value, &env);
        let config: Config = value.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let main = &self.main;
        if main.currency.is_empty() || !main.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(invalid("main.currency", "must be uppercase"));
        }
        if main.stock.is_empty() == main.crypto.is_empty() {
            return Err(invalid(
                "main.stock",
                "one of *either* stock or crypto must be specified",
            ));
        }
        if !LOG_LEVELS.contains(&main.loglevel.as_str()) {
            return Err(invalid(
                "main.loglevel",
                format!("must be one of {}", LOG_LEVELS.join(", ")),
            ));
        }
        if InkColor::from_name(&main.color).is_none() {
            return Err(invalid("main.color", "must be black, red or yellow"));
        }
        self.display()?;
        self.outputs.screen()?;
        if self.provider()? == ProviderKind::Iex && self.iex.is_none() {
            return Err(invalid("iex", "section is required for the IEX provider"));
        }
        Ok(())
    }

    /// Configured provider.
    pub fn provider(&self) -> Result<ProviderKind, ConfigError> {
        self.main
            .provider
            .parse()
            .map_err(|_| invalid("main.provider", format!("unknown provider {:?}", self.main.provider)))
    }

    /// Tracked asset.
    pub fn asset(&self) -> Asset {
        if self.main.crypto.is_empty() {
            Asset::Stock(self.main.stock.clone())
        } else {
            Asset::Crypto(self.main.crypto.clone())
        }
    }

    /// Panel ink colour.
    pub fn color(&self) -> InkColor {
        InkColor::from_name(&self.main.color).unwrap_or_default()
    }

    /// Panel specification: the model, resized by explicit width/height and
    /// set to the configured colour.
    pub fn display(&self) -> Result<DisplaySpec, ConfigError> {
        let model = eink_specs::displays::by_name(&self.main.display).ok_or_else(|| {
            invalid(
                "main.display",
                format!("unknown display model {:?}", self.main.display),
            )
        })?;
        let width = self.main.width.unwrap_or(model.width);
        let height = self.main.height.unwrap_or(model.height);
        if width == 0 || height == 0 {
            return Err(invalid("main.width", "display dimensions must be positive"));
        }
        Ok(model.with_resolution(width, height).with_color(self.color()))
    }
}

fn interpolate_value(value: &mut toml::Value, env: &impl Fn(&str) -> Option<String>) {
    match value {
        toml::Value::String(s) => *s = interpolate(s, env),
        toml::Value::Array(items) => items.iter_mut().for_each(|v| interpolate_value(v, env)),
        toml::Value::Table(table) => table.iter_mut().for_each(|(_, v)| interpolate_value(v, env)),
        _ => {}
    }
}

/// Expands `${VAR}` references to allow-listed environment variables.
pub fn interpolate(text: &str, env: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let (before, after) = rest.split_at(start);
        out.push_str(before);
        let Some(end) = after.find('}') else {
            out.push_str(after);
            return out;
        };
        let reference = after.get(..=end).unwrap_or(after);
        let name = reference.get(2..end).unwrap_or_default();
        if ENV_ALLOW_LIST.contains(&name) {
            out.push_str(&env(name).unwrap_or_default());
        } else {
            out.push_str(reference);
        }
        rest = after.get(end.saturating_add(1)..).unwrap_or_default();
    }
    out.push_str(rest);
    out
}
