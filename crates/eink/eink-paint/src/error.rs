//! Paint and board errors

use embedded_graphics::prelude::Size;
use thiserror::Error;

use eink_layout::error::LayoutError;

/// Errors raised while rasterizing or loading images
#[derive(Debug, Error)]
pub enum PaintError {
    /// The tree could not be measured or laid out
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Decoding or encoding an image file failed
    #[error("image: {0}")]
    Image(#[from] image::ImageError),

    /// A font file could not be read
    #[error("font {path}: {source}")]
    FontIo {
        /// Font file path
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A font file was read but could not be parsed
    #[error("font {path}: {reason}")]
    FontParse {
        /// Font file path
        path: String,
        /// Parser message
        reason: &'static str,
    },

    /// `builtin:<name>` did not match a bundled bitmap font
    #[error("unknown builtin font: {0}")]
    UnknownFont(String),

    /// Pushing an image to a board failed
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors raised by a [`Board`](crate::board::Board)
#[derive(Debug, Error)]
pub enum BoardError {
    /// The image does not match the panel resolution
    #[error("image is {}x{} but the panel is {}x{}", actual.width, actual.height, expected.width, expected.height)]
    SizeMismatch {
        /// Panel resolution
        expected: Size,
        /// Image resolution
        actual: Size,
    },

    /// `show` was called before any image was set
    #[error("no image has been set")]
    NoImage,

    /// Writing the frame out failed
    #[error("write frame: {0}")]
    Write(#[from] image::ImageError),
}
