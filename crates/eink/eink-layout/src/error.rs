//! Layout errors

use thiserror::Error;

/// Errors raised while building or measuring a layout tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A padding or border edge was given a negative width
    #[error("{kind} {edge} must not be negative (got {value})")]
    NegativeEdge {
        /// `"padding"` or `"border"`
        kind: &'static str,
        /// Which edge was rejected
        edge: &'static str,
        /// The offending value
        value: i32,
    },

    /// A container's size or a placement coordinate cannot be represented
    #[error("invalid geometry in {container}: {axis} out of range")]
    InvalidGeometry {
        /// Diagnostic name of the container
        container: String,
        /// Axis that overflowed
        axis: &'static str,
    },

    /// Unknown display mode name
    #[error("unsupported display mode: {0}")]
    UnsupportedDisplay(String),

    /// Unknown alignment name
    #[error("unsupported alignment: {0}")]
    UnsupportedAlign(String),
}
