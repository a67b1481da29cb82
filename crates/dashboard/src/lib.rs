//! Price dashboard for Inky e-paper boards
//!
//! Fetches a stock or crypto price, records it, and paints a status bar,
//! ticker, headline and chart onto the panel.
//!
//! ```rust,ignore
//! let config = Config::load("config.toml")?;
//! let image = dashboard::app::run(config, &RunOptions::default()).await?;
//! ```

pub mod app;
pub mod chart;
pub mod config;
pub mod error;
pub mod widgets;

pub use app::{Dashboard, Prices, RunOptions};
pub use config::Config;
pub use error::DashboardError;
