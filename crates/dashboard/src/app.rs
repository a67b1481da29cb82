//! Refresh pipeline.
//!
//! One refresh fetches prices, records them, composes the dashboard and
//! pushes it out:
//!
//! ```text
//! provider ──current──▶ store ──recent──▶ ticker bar / headline
//!    │                    ▲
//!    └──historical──▶ daily cache ──▶ chart / change
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, TimeZone};
use eink_layout::layout::Layout;
use eink_layout::style::Display;
use eink_paint::board::{Board, FileBoard, MemoryBoard};
use eink_paint::image::Image;
use eink_paint::painter::{MonoPainter, PalettePainter, Painter};
use eink_paint::palette::Palette;
use eink_paint::Container;
use eink_specs::{DisplaySpec, InkColor};
use embedded_graphics::prelude::Size;
use quotes::{AnyProvider, CoinGecko, Iex, Mock, Point, Provider, ProviderKind, QuoteError, Series};
use store::{PriceStore, Scope};

use crate::config::{Config, ConfigError, Screen};
use crate::error::DashboardError;
use crate::widgets::{ChartPanel, Headline, StatusBar, Theme, TickerBar, Ui};

/// Stored prices shown in the ticker bar.
pub const TICKER_LIMIT: usize = 10;

const USER_AGENT: &str = concat!("inkticker/", env!("CARGO_PKG_VERSION"));

/// Options that override the configuration for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Skip pushing the image to the board
    pub no_display: bool,
    /// Save the image here instead of `outputs.local`
    pub output: Option<PathBuf>,
}

/// Everything one refresh draws.
#[derive(Debug, Clone, PartialEq)]
pub struct Prices {
    /// Just fetched price
    pub current: Point,
    /// Daily closes, oldest first
    pub historical: Series,
    /// Stored prices, newest first
    pub recent: Series,
}

impl Prices {
    /// Most recent tick minus the last historical close.
    pub fn change(&self) -> f64 {
        let latest = self.recent.points.first().unwrap_or(&self.current);
        match self.historical.last() {
            Some(close) => latest.price - close.price,
            None => {
                tracing::warn!("no historical data, reporting no change");
                0.0
            }
        }
    }

    /// Recent prices oldest first.
    pub fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        self.recent.points.iter().rev().map(|p| p.price)
    }
}

/// Builds the configured provider.
pub fn provider(config: &Config, client: reqwest::Client) -> Result<AnyProvider, DashboardError> {
    let asset = config.asset();
    let currency = &config.main.currency;
    let provider: AnyProvider = match config.provider()? {
        ProviderKind::Iex => {
            let iex = config.iex.as_ref().ok_or_else(|| ConfigError::Invalid {
                field: "iex",
                reason: "section is required for the IEX provider".to_owned(),
            })?;
            Iex::new(client, iex.endpoint(), iex.token.as_str(), asset, currency).into()
        }
        ProviderKind::CoinGecko => CoinGecko::new(client, asset, currency).into(),
        ProviderKind::Mock => Mock::default().into(),
    };
    tracing::info!(provider = provider.name(), asset = %config.asset(), "provider selected");
    Ok(provider)
}

/// Opens the configured database, scoped to `provider`.
pub fn open_store(config: &Config, provider: &impl Provider) -> Result<PriceStore, DashboardError> {
    let scope = Scope::new(
        provider.name(),
        config.main.currency.as_str(),
        config.asset().symbol(),
    );
    Ok(PriceStore::open_url(&config.main.database, scope)?)
}

/// Fetches and records the current price, then reads the history and the
/// recent ticks.
///
/// Providers that cache history are asked at most once per `today`; the
/// first answer is kept in the store.
pub async fn fetch<P: Provider>(
    provider: &P,
    store: &PriceStore,
    today: NaiveDate,
) -> Result<Prices, DashboardError> {
    let current = store.store_current(provider.current().await?)?;
    tracing::info!(price = current.price, at = %current.timestamp, "current price");

    let historical = if provider.caches_historical() {
        match store.retrieve_historical(today)? {
            Some(cached) => {
                tracing::debug!(points = cached.len(), %today, "historical cache hit");
                cached
            }
            None => {
                tracing::debug!(%today, "historical cache miss");
                store.store_historical(provider.historical().await?, today)?
            }
        }
    } else {
        provider.historical().await?
    };

    let recent = store.recent(TICKER_LIMIT)?;
    tracing::info!(historical = historical.len(), recent = recent.len(), "prices ready");
    Ok(Prices {
        current,
        historical,
        recent,
    })
}

/// Painter for a panel's ink.
pub fn painter_for(color: InkColor) -> Box<dyn Painter> {
    match color {
        InkColor::Black => Box::new(MonoPainter),
        accent => Box::new(PalettePainter::new(Palette::for_ink(accent))),
    }
}

/// Composes and outputs dashboards for one configuration.
pub struct Dashboard {
    config: Config,
    spec: DisplaySpec,
    theme: Theme,
    painter: Box<dyn Painter>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("spec", &self.spec)
            .field("palette", &self.painter.palette())
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Resolves the display and loads the fonts.
    pub fn new(config: Config) -> Result<Self, DashboardError> {
        let spec = config.display()?;
        let theme = Theme::load(&config.fonts)?;
        let painter = painter_for(spec.color);
        tracing::debug!(
            display = spec.name,
            width = spec.width,
            height = spec.height,
            color = spec.color.as_str(),
            "dashboard ready"
        );
        Ok(Self {
            config,
            spec,
            theme,
            painter,
        })
    }

    /// The configuration this dashboard was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolved panel specification.
    pub fn spec(&self) -> &DisplaySpec {
        &self.spec
    }

    /// The painter matching the panel's ink.
    pub fn painter(&self) -> &dyn Painter {
        self.painter.as_ref()
    }

    /// Builds the section tree for `prices` at `now`.
    pub fn layout<Tz: TimeZone>(
        &self,
        prices: &Prices,
        now: DateTime<Tz>,
    ) -> Result<Container, DashboardError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let display = Size::new(self.spec.width, self.spec.height);
        let ui = Ui {
            painter: self.painter(),
            theme: &self.theme,
            display,
        };
        let asset = self.config.asset();

        let status = StatusBar::new(asset.symbol(), &self.config.main.currency, now).build(&ui);
        let ticker = TickerBar::new(prices.ticks()).build(&ui);
        let headline =
            Headline::new(prices.current.price, prices.change(), self.config.mascot.as_ref())
                .build(&ui)?;
        let chart = ChartPanel::new(&prices.historical, ChartPanel::DEFAULT_LIMIT)?.build(&ui);

        Ok(Container::sized(display.width, display.height)
            .with_name("root")
            .with_display(Display::Block)
            .with_child(status)
            .with_child(ticker)
            .with_child(headline)
            .with_child(chart))
    }

    /// Paints the dashboard at the display size, rotated as configured.
    pub fn compose<Tz: TimeZone>(&self, prices: &Prices, now: DateTime<Tz>) -> Result<Image, DashboardError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let root = self.layout(prices, now)?;
        let placements = Layout::new(&root).layout()?;
        let mut image = self
            .painter
            .paint(Size::new(self.spec.width, self.spec.height), &placements)?;
        if self.config.main.rotate != 0 {
            image.rotate(self.config.main.rotate);
        }
        Ok(image)
    }

    /// The configured output board, if any.
    pub fn board(&self) -> Result<Option<Box<dyn Board>>, DashboardError> {
        Ok(match self.config.outputs.screen()? {
            Screen::Inky => {
                tracing::info!(display = self.spec.name, "no panel driver linked, using in-memory board");
                Some(Box::new(MemoryBoard::new(self.spec)))
            }
            Screen::File(path) => Some(Box::new(FileBoard::new(self.spec, path))),
            Screen::None => None,
        })
    }

    /// Pushes `image` to `board`.
    pub fn show(&self, board: &mut dyn Board, image: &Image) -> Result<(), DashboardError> {
        Ok(self.painter.display(board, image)?)
    }
}

/// Saves `image`, creating the parent directory.
pub fn save(image: &Image, path: &Path) -> Result<(), DashboardError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DashboardError::Output {
            path: parent.display().to_string(),
            source,
        })?;
    }
    image.save(path)?;
    tracing::info!(path = %path.display(), "image saved");
    Ok(())
}

/// One full refresh with the configured provider, store and board.
pub async fn run(config: Config, options: &RunOptions) -> Result<Image, DashboardError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(QuoteError::from)?;
    let provider = provider(&config, client)?;
    let store = open_store(&config, &provider)?;
    let dashboard = Dashboard::new(config)?;

    let now = chrono::Local::now();
    let prices = fetch(&provider, &store, now.date_naive()).await?;
    let image = dashboard.compose(&prices, now)?;

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| dashboard.config().outputs.local.clone());
    save(&image, &output)?;

    if options.no_display {
        tracing::info!("display disabled");
    } else if let Some(mut board) = dashboard.board()? {
        dashboard.show(board.as_mut(), &image)?;
    }
    Ok(image)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    fn at(days_ago: i64, price: f64) -> Point {
        let anchor = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();
        Point::new(anchor - TimeDelta::days(days_ago), price)
    }

    #[test]
    fn test_change_uses_newest_tick() {
        let prices = Prices {
            current: at(0, 105.0),
            historical: Series::new(vec![at(2, 90.0), at(1, 100.0)]),
            recent: Series::new(vec![at(0, 105.0), at(0, 104.0)]),
        };
        assert_eq!(prices.change(), 5.0);
        assert_eq!(prices.ticks().collect::<Vec<_>>(), vec![104.0, 105.0]);
    }

    #[test]
    fn test_change_without_history_is_zero() {
        let prices = Prices {
            current: at(0, 105.0),
            historical: Series::default(),
            recent: Series::new(vec![at(0, 105.0)]),
        };
        assert_eq!(prices.change(), 0.0);
    }

    #[test]
    fn test_painter_matches_ink() {
        assert_eq!(painter_for(InkColor::Black).palette(), Palette::BlackWhite);
        assert_eq!(painter_for(InkColor::Red).palette(), Palette::BlackWhiteRed);
        assert_eq!(painter_for(InkColor::Yellow).palette(), Palette::BlackWhiteYellow);
    }

    #[test]
    fn test_provider_from_config() {
        let config = Config::parse("[main]\ncrypto = \"BTC\"\nprovider = \"coingecko\"", |_| None).unwrap();
        let gecko = provider(&config, reqwest::Client::new()).unwrap();
        assert_eq!(gecko.kind(), ProviderKind::CoinGecko);
        assert_eq!(gecko.name(), "CoinGecko");

        let config = Config::parse(
            "[main]\nstock = \"AAPL\"\nprovider = \"IEX\"\n[iex]\ntoken = \"t\"",
            |_| None,
        )
        .unwrap();
        let iex = provider(&config, reqwest::Client::new()).unwrap();
        assert_eq!(iex.kind(), ProviderKind::Iex);
        assert!(iex.caches_historical());
    }

    #[test]
    fn test_board_follows_screen() {
        let dir = tempfile::tempdir().unwrap();
        let frame = dir.path().join("frame.png");
        let text = format!(
            "[main]\ncrypto = \"BTC\"\n[outputs]\nscreen = \"file:{}\"",
            frame.display()
        );
        let dashboard = Dashboard::new(Config::parse(&text, |_| None).unwrap()).unwrap();
        let board = dashboard.board().unwrap().unwrap();
        assert_eq!(board.spec().width, 212);

        let none = Config::parse("[main]\ncrypto = \"BTC\"\n[outputs]\nscreen = \"none\"", |_| None).unwrap();
        assert!(Dashboard::new(none).unwrap().board().unwrap().is_none());
    }
}
