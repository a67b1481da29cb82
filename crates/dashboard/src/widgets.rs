//! Dashboard sections.
//!
//! Each widget turns some data into a [`Container`] sized for the display:
//!
//! ```text
//! +--------------------------------------------+
//! | BTC w USD                       7/3  09:41  |  StatusBar
//! |--------------------------------------------|
//! |                   > 41.20 > 41.90 > 42.00  |  TickerBar
//! |--------------------------------------------|
//! | 42,000  ^ +120.50                   (o_o)  |  Headline
//! | |\_/\                                      |
//! | |    \___                                  |  ChartPanel
//! | +---------                                 |
//! +--------------------------------------------+
//! ```

use std::path::Path;

use chrono::{DateTime, TimeZone};
use eink_layout::style::{Align, Border, Display, Padding};
use eink_paint::font::Font;
use eink_paint::graphic::Text;
use eink_paint::painter::Painter;
use eink_paint::shapes::Orientation;
use eink_paint::Container;
use embedded_graphics::prelude::Size;
use quotes::{Point, Series};

use crate::chart::Chart;
use crate::config::{FontsConfig, MascotConfig};
use crate::error::DashboardError;

/// Glyph drawn in the symbol font between the asset and the currency.
///
/// Symbol fonts map it to an exchange icon; text fonts just show the letter.
pub const SYMBOL_GLYPH: &str = "w";

const STATUS_FORMAT: &str = "%-d/%-m  %H:%M";
const ARROW: Size = Size::new(20, 10);
const MASCOT_WIDTH: u32 = 25;
const HEADLINE_RESERVED: u32 = 30;

/// A font with the pixel size it is drawn at.
#[derive(Debug, Clone)]
pub struct Face {
    /// The font
    pub font: Font,
    /// Pixel size
    pub px: f32,
}

impl Face {
    fn load(spec: &str, px: f32) -> Result<Self, DashboardError> {
        Ok(Self {
            font: Font::load(spec)?,
            px,
        })
    }
}

/// Loaded fonts for every section.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Ticker bar and price movement
    pub ticker: Face,
    /// Headline price
    pub headline: Face,
    /// Status bar glyph
    pub symbol: Face,
    /// Status bar text
    pub statusbar: Face,
    /// Chart labels
    pub chart: Face,
}

impl Theme {
    /// Loads every configured font.
    pub fn load(fonts: &FontsConfig) -> Result<Self, DashboardError> {
        Ok(Self {
            ticker: Face::load(&fonts.ticker, fonts.ticker_size)?,
            headline: Face::load(&fonts.headline, fonts.headline_size)?,
            symbol: Face::load(&fonts.symbol, fonts.symbol_size)?,
            statusbar: Face::load(&fonts.statusbar, fonts.statusbar_size)?,
            chart: Face::load(&fonts.chart, fonts.chart_size)?,
        })
    }
}

/// What every widget draws with.
#[derive(Clone, Copy)]
pub struct Ui<'a> {
    /// Painter producing the leaves
    pub painter: &'a dyn Painter,
    /// Fonts
    pub theme: &'a Theme,
    /// Display size in pixels
    pub display: Size,
}

impl Ui<'_> {
    fn text(&self, text: &str, face: &Face) -> Text {
        self.painter.text(text, &face.font, face.px)
    }
}

/// Groups the integer part in thousands: `1234567` → `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len().saturating_add(digits.len() / 3).saturating_add(1));
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len().saturating_sub(i)) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Headline price: two decimals, or a grouped whole number above 999.
pub fn format_price(price: f64) -> String {
    if price > 999.0 {
        // SAFETY: truncation is the intended display rounding.
        #[allow(clippy::cast_possible_truncation)]
        let whole = price as i64;
        group_thousands(whole)
    } else {
        format!("{price:.2}")
    }
}

/// Signed change: two decimals, or a whole number for gains above 999.
pub fn format_change(change: f64) -> String {
    if change > 999.0 {
        // SAFETY: truncation is the intended display rounding.
        #[allow(clippy::cast_possible_truncation)]
        let whole = change as i64;
        format!("{whole:+}")
    } else {
        format!("{change:+.2}")
    }
}

/// Asset, currency and clock.
#[derive(Debug, Clone)]
pub struct StatusBar<Tz: TimeZone> {
    asset: String,
    currency: String,
    now: DateTime<Tz>,
}

impl<Tz: TimeZone> StatusBar<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    /// Status bar for `asset` priced in `currency` at `now`.
    pub fn new(asset: &str, currency: &str, now: DateTime<Tz>) -> Self {
        Self {
            asset: asset.to_owned(),
            currency: currency.to_owned(),
            now,
        }
    }

    /// Left half: asset, glyph, currency. Right half: right-aligned date and time.
    pub fn build(&self, ui: &Ui<'_>) -> Container {
        let half = ui.display.width / 2;

        let left = Container::new()
            .with_name("status_bar_left")
            .with_width(half)
            .with_display(Display::Inline)
            .with_padding(Padding::NONE.with_bottom(1))
            .with_child(ui.text(&self.asset, &ui.theme.statusbar))
            .with_child(ui.text(SYMBOL_GLYPH, &ui.theme.symbol))
            .with_child(ui.text(&self.currency, &ui.theme.statusbar));

        let stamp = self.now.format(STATUS_FORMAT).to_string();
        let right = Container::new()
            .with_name("status_bar_right")
            .with_width(half)
            .with_align(Align::Right)
            .with_display(Display::Inline)
            .with_padding(Padding::NONE.with_right(1))
            .with_child(ui.text(&stamp, &ui.theme.statusbar));

        Container::new()
            .with_name("status_bar")
            .with_width(ui.display.width)
            .with_display(Display::Inline)
            .with_padding(Padding::NONE.with_top(1).with_bottom(1))
            .with_child(left)
            .with_child(right)
    }
}

/// Recent prices as a right-aligned `> a > b > c` strip.
#[derive(Debug, Clone)]
pub struct TickerBar {
    ticks: Vec<String>,
}

impl TickerBar {
    /// Ticker from prices in display order (oldest first).
    pub fn new(prices: impl IntoIterator<Item = f64>) -> Self {
        Self {
            ticks: prices.into_iter().map(|p| format!("{p:.2}")).collect(),
        }
    }

    /// The strip text.
    pub fn text(&self) -> String {
        format!("> {}", self.ticks.join(" > "))
    }

    /// Full-width bar with a top and bottom rule.
    pub fn build(&self, ui: &Ui<'_>) -> Container {
        let strip = Container::new()
            .with_name("ticker_bar_text")
            .with_width(ui.display.width)
            .with_align(Align::Right)
            .with_padding(Padding::NONE.with_top(1).with_bottom(1))
            .with_child(ui.text(&self.text(), &ui.theme.ticker));

        Container::new()
            .with_name("ticker_bar")
            .with_width(ui.display.width)
            .with_display(Display::Block)
            .with_border(Border::NONE.with_top(1).with_bottom(1))
            .with_padding(Padding::NONE.with_top(1).with_bottom(1))
            .with_align(Align::Right)
            .with_child(strip)
    }
}

/// Price, movement arrow and mascot.
#[derive(Debug, Clone)]
pub struct Headline<'a> {
    price: f64,
    change: f64,
    mascot: Option<&'a MascotConfig>,
}

impl<'a> Headline<'a> {
    /// Headline for `price`, which moved by `change` since the last close.
    pub fn new(price: f64, change: f64, mascot: Option<&'a MascotConfig>) -> Self {
        Self {
            price,
            change,
            mascot,
        }
    }

    /// Arrow direction: up for a gain, down otherwise.
    pub fn orientation(&self) -> Orientation {
        if self.change > 0.0 {
            Orientation::Up
        } else {
            Orientation::Down
        }
    }

    fn mascot_path(&self) -> Option<&'a Path> {
        let mascot = self.mascot?;
        let path = if self.change > 0.0 {
            &mascot.increasing
        } else if self.change < 0.0 {
            &mascot.decreasing
        } else {
            &mascot.unchanged
        };
        Some(path.as_path())
    }

    /// Price and movement on the left, mascot on the right.
    pub fn build(&self, ui: &Ui<'_>) -> Result<Container, DashboardError> {
        let arrow = ui.painter.triangle(ARROW, self.orientation().degrees());
        let movement_text = ui.text(&format_change(self.change), &ui.theme.ticker);
        let spacer = Container::new().with_name("spacer").with_height(2);

        let mut movement = Container::new()
            .with_name("movement")
            .with_display(Display::Block);
        if self.change > 0.0 {
            movement.add(arrow).add(spacer).add(movement_text);
        } else {
            movement.add(movement_text).add(spacer).add(arrow);
        }

        let left = Container::new()
            .with_name("headline")
            .with_width(ui.display.width.saturating_sub(HEADLINE_RESERVED))
            .with_display(Display::Inline)
            .with_child(ui.text(&format_price(self.price), &ui.theme.headline))
            .with_child(movement);

        let mut right = Container::new()
            .with_name("mascot")
            .with_width(MASCOT_WIDTH)
            .with_align(Align::Right);
        if let Some(path) = self.mascot_path() {
            right.add(ui.painter.from_file(path)?);
        }

        Ok(Container::new()
            .with_name("headline_row")
            .with_display(Display::Inline)
            .with_padding(Padding::NONE.with_right(2))
            .with_child(left)
            .with_child(right))
    }
}

/// Line chart of the most recent closes.
#[derive(Debug, Clone)]
pub struct ChartPanel {
    points: Vec<Point>,
}

impl ChartPanel {
    /// Points shown by default.
    pub const DEFAULT_LIMIT: usize = 7;

    /// Panel over the last `limit` points of `series`.
    pub fn new(series: &Series, limit: usize) -> Result<Self, DashboardError> {
        if limit < 1 {
            return Err(DashboardError::ChartLimit(limit));
        }
        Ok(Self {
            points: series.tail(limit).to_vec(),
        })
    }

    /// The plotted points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Chart box sized to the display, the chart inset by its padding.
    ///
    /// The box spans the display width and half its height, trimmed more on
    /// wide displays and less on tall ones.
    pub fn build(&self, ui: &Ui<'_>) -> Container {
        let width_offset = if ui.display.width > 212 { 20 } else { 10 };
        let height_offset = if ui.display.height > 104 { 5 } else { 10 };
        let size = Size::new(
            ui.display.width.saturating_sub(width_offset),
            (ui.display.height / 2).saturating_sub(height_offset),
        );
        let padding = Padding::NONE.with_top(1).with_left(1).with_bottom(1);
        let plot = Size::new(
            size.width.saturating_sub(padding.horizontal()),
            size.height.saturating_sub(padding.vertical()),
        );
        let face = &ui.theme.chart;
        let chart = Chart::plot(ui.painter, plot, &self.points, &face.font, face.px);

        Container::sized(size.width, size.height)
            .with_name("chart")
            .with_padding(padding)
            .with_child(chart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use eink_layout::element::Element;
    use eink_paint::painter::PalettePainter;
    use eink_paint::palette::Palette;

    fn theme() -> Theme {
        Theme::load(&FontsConfig::default()).unwrap()
    }

    fn ui<'a>(painter: &'a dyn Painter, theme: &'a Theme) -> Ui<'a> {
        Ui {
            painter,
            theme,
            display: Size::new(212, 104),
        }
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_price(42.0), "42.00");
        assert_eq!(format_price(999.0), "999.00");
        assert_eq!(format_price(12_345.67), "12,345");
        assert_eq!(format_price(1_000_000.0), "1,000,000");
    }

    #[test]
    fn test_change_formatting() {
        assert_eq!(format_change(1.5), "+1.50");
        assert_eq!(format_change(-0.25), "-0.25");
        assert_eq!(format_change(0.0), "+0.00");
        assert_eq!(format_change(1500.9), "+1500");
        // losses keep their decimals
        assert_eq!(format_change(-2000.1), "-2000.10");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
    }

    #[test]
    fn test_ticker_text() {
        let bar = TickerBar::new([1.0, 2.5, 3.126]);
        assert_eq!(bar.text(), "> 1.00 > 2.50 > 3.13");
        // exact ties round half to even
        assert_eq!(TickerBar::new([3.125]).text(), "> 3.12");
    }

    #[test]
    fn test_status_bar_spans_display() {
        let painter = PalettePainter::new(Palette::BlackWhiteRed);
        let theme = theme();
        let bar = StatusBar::new("BTC", "USD", Utc::now()).build(&ui(&painter, &theme));
        // 10px font + top and bottom padding + left half's bottom padding
        assert_eq!(bar.size().unwrap(), Size::new(212, 13));
    }

    #[test]
    fn test_ticker_bar_height() {
        let painter = PalettePainter::new(Palette::BlackWhite);
        let theme = theme();
        let bar = TickerBar::new([1.0]).build(&ui(&painter, &theme));
        // text 10 + inner padding 2 + outer padding 2
        assert_eq!(bar.size().unwrap(), Size::new(212, 14));
        assert_eq!(bar.border(), Border::NONE.with_top(1).with_bottom(1));
    }

    #[test]
    fn test_headline_arrow_order() {
        let painter = PalettePainter::new(Palette::BlackWhite);
        let theme = theme();
        let ui = ui(&painter, &theme);

        let up = Headline::new(100.0, 1.0, None);
        assert_eq!(up.orientation(), Orientation::Up);
        let down = Headline::new(100.0, -1.0, None);
        assert_eq!(down.orientation(), Orientation::Down);
        assert_eq!(Headline::new(100.0, 0.0, None).orientation(), Orientation::Down);

        let row = up.build(&ui).unwrap();
        // arrow 10 + spacer 2 + text 10 outgrows the 20px price
        assert_eq!(row.size().unwrap().height, 22);
        assert_eq!(row.size().unwrap().width, 212 - 30 + 25 + 2);
    }

    #[test]
    fn test_chart_limit() {
        let now = Utc::now();
        let series = Series::new(
            (0..10)
                .map(|d| Point::new(now - TimeDelta::days(10 - d), f64::from(u32::try_from(d).unwrap())))
                .collect(),
        );
        assert!(matches!(ChartPanel::new(&series, 0), Err(DashboardError::ChartLimit(0))));

        let panel = ChartPanel::new(&series, ChartPanel::DEFAULT_LIMIT).unwrap();
        assert_eq!(panel.points().len(), 7);
        assert_eq!(panel.points()[0].price, 3.0);

        let short = ChartPanel::new(&Series::new(series.points[..2].to_vec()), 7).unwrap();
        assert_eq!(short.points().len(), 2);
    }

    #[test]
    fn test_chart_panel_size() {
        let painter = PalettePainter::new(Palette::BlackWhiteRed);
        let theme = theme();
        let panel = ChartPanel::new(&Series::default(), 7).unwrap();
        let phat = panel.build(&ui(&painter, &theme));
        assert_eq!(phat.size().unwrap(), Size::new(202, 42));

        let what = Ui {
            display: Size::new(400, 300),
            ..ui(&painter, &theme)
        };
        assert_eq!(panel.build(&what).size().unwrap(), Size::new(380, 145));
    }
}
