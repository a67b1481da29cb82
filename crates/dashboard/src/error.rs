//! Dashboard errors

use eink_layout::error::LayoutError;
use eink_paint::error::{BoardError, PaintError};
use quotes::QuoteError;
use store::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// Anything that can stop a dashboard refresh
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Bad configuration
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    /// A quote provider failed
    #[error("quotes: {0}")]
    Quote(#[from] QuoteError),

    /// The price store failed
    #[error("store: {0}")]
    Store(#[from] StoreError),

    /// The tree could not be measured or laid out
    #[error("layout: {0}")]
    Layout(#[from] LayoutError),

    /// Rasterizing, loading or saving an image failed
    #[error("paint: {0}")]
    Paint(#[from] PaintError),

    /// The panel rejected the frame
    #[error("board: {0}")]
    Board(#[from] BoardError),

    /// The output directory could not be created
    #[error("create {path}: {source}")]
    Output {
        /// Directory path
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A chart needs at least one point
    #[error("chart limit must be at least 1, got {0}")]
    ChartLimit(usize),
}
