//! Box-model primitives.
//!
//! # Core Types
//!
//! - [`Position`] - Top-left coordinate of a placed element
//! - [`Dimension`] - Explicit size of a container axis (Auto or Px)
//! - [`Padding`] - Inner spacing between a container's edge and its children
//! - [`Border`] - Solid bands painted along a container's edges
//! - [`Display`] - Flow axis (Block stacks vertically, Inline side by side)
//! - [`Align`] - Anchor edge (Left leading, Right trailing)
//!
//! Padding and border edges are unsigned, so a constructed value can never
//! hold a negative width. Signed input (configuration files, computed
//! offsets) goes through the validating [`Padding::new`] / [`Border::new`].
//!
//! # Example
//!
//! ```
//! use eink_layout::style::*;
//!
//! let padding = Padding::NONE.with_top(1).with_left(1).with_bottom(1);
//! assert_eq!(padding.vertical(), 2);
//!
//! assert!(Border::new(0, 0, -1, 0).is_err());
//! assert!(Border::default().is_none());
//! ```

use core::fmt;
use core::str::FromStr;

use crate::error::LayoutError;

/// Top-left coordinate of an element within its parent's box.
///
/// A plain `Copy` value: every placement owns its own coordinates.
pub type Position = embedded_graphics::prelude::Point;

/// Explicit size of one container axis.
///
/// # Examples
///
/// ```
/// use eink_layout::style::Dimension;
///
/// assert_eq!(Dimension::from(0), Dimension::Auto);
/// assert_eq!(Dimension::from(120), Dimension::Px(120));
/// assert_eq!(Dimension::Px(120).resolve(80), 120);
/// assert_eq!(Dimension::Auto.resolve(80), 80);
/// ```
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Dimension {
    /// Size follows the content.
    #[default]
    Auto,

    /// Fixed pixel size.
    Px(u32),
}

impl Dimension {
    /// Resolves the dimension given the size the content needs.
    ///
    /// `Px(0)` behaves like `Auto`.
    pub fn resolve(self, content: u32) -> u32 {
        match self {
            Dimension::Px(px) if px > 0 => px,
            _ => content,
        }
    }

    /// Returns `true` if this dimension follows the content.
    pub fn is_auto(self) -> bool {
        matches!(self, Dimension::Auto | Dimension::Px(0))
    }
}

impl From<u32> for Dimension {
    fn from(px: u32) -> Self {
        if px == 0 {
            Dimension::Auto
        } else {
            Dimension::Px(px)
        }
    }
}

fn checked_edge(kind: &'static str, edge: &'static str, value: i32) -> Result<u32, LayoutError> {
    u32::try_from(value).map_err(|_| LayoutError::NegativeEdge { kind, edge, value })
}

macro_rules! box_modification {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name {
            /// Left edge in pixels.
            pub left: u32,

            /// Right edge in pixels.
            pub right: u32,

            /// Top edge in pixels.
            pub top: u32,

            /// Bottom edge in pixels.
            pub bottom: u32,
        }

        impl $name {
            /// All edges zero.
            pub const NONE: Self = Self::all(0);

            /// Builds from signed edge widths, rejecting negatives.
            ///
            /// Argument order is left, right, top, bottom.
            pub fn new(left: i32, right: i32, top: i32, bottom: i32) -> Result<Self, LayoutError> {
                Ok(Self {
                    left: checked_edge($kind, "left", left)?,
                    right: checked_edge($kind, "right", right)?,
                    top: checked_edge($kind, "top", top)?,
                    bottom: checked_edge($kind, "bottom", bottom)?,
                })
            }

            /// Same width on every edge.
            pub const fn all(value: u32) -> Self {
                Self {
                    left: value,
                    right: value,
                    top: value,
                    bottom: value,
                }
            }

            /// Separate horizontal (left/right) and vertical (top/bottom) widths.
            pub const fn horizontal_vertical(horizontal: u32, vertical: u32) -> Self {
                Self {
                    left: horizontal,
                    right: horizontal,
                    top: vertical,
                    bottom: vertical,
                }
            }

            /// Replaces the left edge.
            pub const fn with_left(self, left: u32) -> Self {
                Self { left, ..self }
            }

            /// Replaces the right edge.
            pub const fn with_right(self, right: u32) -> Self {
                Self { right, ..self }
            }

            /// Replaces the top edge.
            pub const fn with_top(self, top: u32) -> Self {
                Self { top, ..self }
            }

            /// Replaces the bottom edge.
            pub const fn with_bottom(self, bottom: u32) -> Self {
                Self { bottom, ..self }
            }

            /// Total horizontal space (left + right), saturating.
            pub const fn horizontal(self) -> u32 {
                self.left.saturating_add(self.right)
            }

            /// Total vertical space (top + bottom), saturating.
            pub const fn vertical(self) -> u32 {
                self.top.saturating_add(self.bottom)
            }

            /// `true` when every edge is zero.
            pub fn is_none(&self) -> bool {
                *self == Self::NONE
            }
        }
    };
}

box_modification!(
    /// Inner spacing between a container's edge and its content.
    ///
    /// # Examples
    ///
    /// ```
    /// use eink_layout::style::Padding;
    ///
    /// let padding = Padding::new(2, 2, 1, 0).unwrap();
    /// assert_eq!(padding.horizontal(), 4);
    /// assert!(Padding::new(-1, 0, 0, 0).is_err());
    /// ```
    Padding,
    "padding"
);

box_modification!(
    /// Solid bands painted along a container's edges.
    ///
    /// [`Border::NONE`] (also the default) means "draw nothing". Borders do
    /// not take part in sizing; they overlay the edge pixels of the box.
    ///
    /// # Examples
    ///
    /// ```
    /// use eink_layout::style::Border;
    ///
    /// let rule = Border::NONE.with_top(1).with_bottom(1);
    /// assert!(!rule.is_none());
    /// assert_eq!(Border::default(), Border::NONE);
    /// ```
    Border,
    "border"
);

/// Flow axis of a container's children.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Display {
    /// Children stack top to bottom.
    #[default]
    Block,

    /// Children sit side by side.
    Inline,
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Display::Block => "block",
            Display::Inline => "inline",
        })
    }
}

impl FromStr for Display {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "block" => Ok(Display::Block),
            "inline" => Ok(Display::Inline),
            _ => {
                tracing::error!(display = s, "unsupported display mode");
                Err(LayoutError::UnsupportedDisplay(s.to_owned()))
            }
        }
    }
}

/// Edge children are anchored to.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Align {
    /// Pack from the leading (left) edge.
    #[default]
    Left,

    /// Pack from the trailing (right) edge.
    Right,
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Align::Left => "left",
            Align::Right => "right",
        })
    }
}

impl FromStr for Align {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Align::Left),
            "right" => Ok(Align::Right),
            _ => Err(LayoutError::UnsupportedAlign(s.to_owned())),
        }
    }
}

/// Content box of a container: `(min_x, min_y)` to `(max_x, max_y)`.
///
/// Not clamped. When padding exceeds an explicit size the max edge can
/// fall before the min edge.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bounds {
    /// Left padding.
    pub min_x: i32,
    /// Top padding.
    pub min_y: i32,
    /// Width minus right padding.
    pub max_x: i32,
    /// Height minus bottom padding.
    pub max_y: i32,
}

impl Bounds {
    /// Top-left corner of the content box.
    pub fn origin(&self) -> Position {
        Position::new(self.min_x, self.min_y)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_rejects_each_negative_edge() {
        let cases = [
            (Padding::new(-1, 0, 0, 0), "left"),
            (Padding::new(0, -2, 0, 0), "right"),
            (Padding::new(0, 0, -3, 0), "top"),
            (Padding::new(0, 0, 0, -4), "bottom"),
        ];
        for (result, expected) in cases {
            match result {
                Err(LayoutError::NegativeEdge { kind, edge, .. }) => {
                    assert_eq!(kind, "padding");
                    assert_eq!(edge, expected);
                }
                other => panic!("expected negative-edge error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_border_validation_names_kind() {
        let err = Border::new(0, 0, 0, -1).unwrap_err();
        assert_eq!(err.to_string(), "border bottom must not be negative (got -1)");
    }

    #[test]
    fn test_zero_is_none() {
        assert!(Border::new(0, 0, 0, 0).unwrap().is_none());
        assert!(Padding::default().is_none());
        assert!(!Border::all(1).is_none());
    }

    #[test]
    fn test_builders() {
        let p = Padding::NONE.with_left(3).with_right(2).with_top(1);
        assert_eq!(p, Padding::new(3, 2, 1, 0).unwrap());
        assert_eq!(p.horizontal(), 5);
        assert_eq!(p.vertical(), 1);
        assert_eq!(Padding::horizontal_vertical(4, 2).vertical(), 4);
    }

    #[test]
    fn test_horizontal_saturates() {
        let p = Padding::all(u32::MAX);
        assert_eq!(p.horizontal(), u32::MAX);
    }

    #[test]
    fn test_dimension_zero_is_auto() {
        assert!(Dimension::Px(0).is_auto());
        assert_eq!(Dimension::Px(0).resolve(7), 7);
        assert!(!Dimension::Px(1).is_auto());
    }

    #[test]
    fn test_display_and_align_parse() {
        assert_eq!("BLOCK".parse::<Display>().unwrap(), Display::Block);
        assert_eq!("inline".parse::<Display>().unwrap(), Display::Inline);
        assert_eq!(
            "grid".parse::<Display>(),
            Err(LayoutError::UnsupportedDisplay("grid".into()))
        );
        assert_eq!("Right".parse::<Align>().unwrap(), Align::Right);
        assert!("center".parse::<Align>().is_err());
    }
}
