//! Containers: boxes that own an ordered list of children.
//!
//! A [`Container`] measures itself from its children (max/sum depending on
//! [`Display`]), adds its padding, and then defers to an explicit width or
//! height when one is set. Content larger than an explicit size is allowed
//! and only logged; it overflows visually.
//!
//! # Example
//!
//! ```
//! use eink_layout::prelude::*;
//! use embedded_graphics::prelude::Size;
//!
//! #[derive(Debug)]
//! struct Glyph;
//!
//! impl Element for Glyph {
//!     fn size(&self) -> Result<Size, LayoutError> {
//!         Ok(Size::new(6, 10))
//!     }
//! }
//!
//! let mut row: Container<Glyph> = Container::new()
//!     .with_display(Display::Inline)
//!     .with_padding(Padding::NONE.with_left(2));
//! row.add(Glyph);
//! row.add(Glyph);
//!
//! assert_eq!(row.size().unwrap(), Size::new(14, 10));
//! ```

use core::cell::Cell;
use core::fmt;

use embedded_graphics::prelude::Size;

use crate::element::Element;
use crate::error::LayoutError;
use crate::style::{Align, Border, Bounds, Dimension, Display, Padding};

/// One child of a container: a leaf of type `L` or a nested container.
#[derive(Debug)]
pub enum Node<L> {
    /// A drawable leaf (text, image, chart, ...)
    Leaf(L),
    /// A nested box, laid out in its own coordinate space
    Container(Container<L>),
}

impl<L: Element> Element for Node<L> {
    fn size(&self) -> Result<Size, LayoutError> {
        match self {
            Node::Leaf(leaf) => leaf.size(),
            Node::Container(container) => container.size(),
        }
    }
}

impl<L> From<L> for Node<L> {
    fn from(leaf: L) -> Self {
        Node::Leaf(leaf)
    }
}

impl<L> From<Container<L>> for Node<L> {
    fn from(container: Container<L>) -> Self {
        Node::Container(container)
    }
}

/// A box of children with padding, an optional border and explicit size.
///
/// The computed size is memoized. [`add`](Container::add) clears the memo,
/// so the next [`size`](Element::size) call recomputes from the new child
/// list. Children are owned; mutate a subtree before adding it.
///
/// The memo lives in a [`Cell`], which makes containers `!Sync`. Build,
/// lay out and paint a tree on one thread.
pub struct Container<L> {
    name: Option<String>,
    width: Dimension,
    height: Dimension,
    padding: Padding,
    border: Border,
    display: Display,
    align: Align,
    children: Vec<Node<L>>,
    cached_size: Cell<Option<Size>>,
}

impl<L> Default for Container<L> {
    fn default() -> Self {
        Self {
            name: None,
            width: Dimension::Auto,
            height: Dimension::Auto,
            padding: Padding::NONE,
            border: Border::NONE,
            display: Display::Block,
            align: Align::Left,
            children: Vec::new(),
            cached_size: Cell::new(None),
        }
    }
}

impl<L> Container<L> {
    /// Empty auto-sized block container anchored left.
    pub fn new() -> Self {
        Self::default()
    }

    /// Container with explicit width and height (`0` keeps an axis automatic).
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new().with_width(width).with_height(height)
    }

    /// Sets a diagnostic name used in log output.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the explicit width (`0` = automatic).
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Dimension::from(width);
        self.invalidate();
        self
    }

    /// Sets the explicit height (`0` = automatic).
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Dimension::from(height);
        self.invalidate();
        self
    }

    /// Sets the padding.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self.invalidate();
        self
    }

    /// Sets the border.
    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Sets the flow axis.
    pub fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self.invalidate();
        self
    }

    /// Sets the anchor edge.
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Builder form of [`add`](Container::add).
    pub fn with_child(mut self, child: impl Into<Node<L>>) -> Self {
        self.add(child);
        self
    }

    /// Appends a child and clears the memoized size.
    pub fn add(&mut self, child: impl Into<Node<L>>) -> &mut Self {
        self.children.push(child.into());
        self.invalidate();
        self
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[Node<L>] {
        &self.children
    }

    /// Diagnostic name, or `"container"` when none was set.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("container")
    }

    /// Padding
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Border
    pub fn border(&self) -> Border {
        self.border
    }

    /// Flow axis
    pub fn display(&self) -> Display {
        self.display
    }

    /// Anchor edge
    pub fn align(&self) -> Align {
        self.align
    }

    /// Explicit width as configured.
    pub fn explicit_width(&self) -> Dimension {
        self.width
    }

    /// Explicit height as configured.
    pub fn explicit_height(&self) -> Dimension {
        self.height
    }

    fn invalidate(&mut self) {
        self.cached_size.set(None);
    }

    fn geometry_error(&self, axis: &'static str) -> LayoutError {
        LayoutError::InvalidGeometry {
            container: self.name().to_owned(),
            axis,
        }
    }

    fn resolve_axis(&self, axis: &'static str, explicit: Dimension, content: u32) -> u32 {
        let resolved = explicit.resolve(content);
        if content > resolved {
            tracing::warn!(
                container = self.name(),
                axis,
                content,
                explicit = resolved,
                "content overflows explicit size"
            );
        }
        resolved
    }
}

impl<L: Element> Container<L> {
    /// Content box: padding-inset rectangle children are placed in.
    ///
    /// `(padding.left, padding.top, width - padding.right, height - padding.bottom)`
    pub fn boundaries(&self) -> Result<Bounds, LayoutError> {
        let size = self.size()?;
        let coord = |value: u32, axis| i32::try_from(value).map_err(|_| self.geometry_error(axis));

        let min_x = coord(self.padding.left, "width")?;
        let min_y = coord(self.padding.top, "height")?;
        let max_x = coord(size.width, "width")?
            .checked_sub(coord(self.padding.right, "width")?)
            .ok_or_else(|| self.geometry_error("width"))?;
        let max_y = coord(size.height, "height")?
            .checked_sub(coord(self.padding.bottom, "height")?)
            .ok_or_else(|| self.geometry_error("height"))?;

        Ok(Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    fn measure(&self) -> Result<Size, LayoutError> {
        let mut content = Size::zero();
        for child in &self.children {
            let child = child.size()?;
            content = match self.display {
                Display::Block => Size::new(
                    content.width.max(child.width),
                    content
                        .height
                        .checked_add(child.height)
                        .ok_or_else(|| self.geometry_error("height"))?,
                ),
                Display::Inline => Size::new(
                    content
                        .width
                        .checked_add(child.width)
                        .ok_or_else(|| self.geometry_error("width"))?,
                    content.height.max(child.height),
                ),
            };
        }

        let total_width = content
            .width
            .checked_add(self.padding.left)
            .and_then(|w| w.checked_add(self.padding.right))
            .ok_or_else(|| self.geometry_error("width"))?;
        let total_height = content
            .height
            .checked_add(self.padding.top)
            .and_then(|h| h.checked_add(self.padding.bottom))
            .ok_or_else(|| self.geometry_error("height"))?;

        let size = Size::new(
            self.resolve_axis("width", self.width, total_width),
            self.resolve_axis("height", self.height, total_height),
        );
        tracing::trace!(
            container = self.name(),
            width = size.width,
            height = size.height,
            children = self.children.len(),
            "measured"
        );
        Ok(size)
    }
}

impl<L: Element> Element for Container<L> {
    fn size(&self) -> Result<Size, LayoutError> {
        if let Some(size) = self.cached_size.get() {
            return Ok(size);
        }
        let size = self.measure()?;
        self.cached_size.set(Some(size));
        Ok(size)
    }
}

impl<L> fmt::Debug for Container<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.name())
            .field("display", &self.display)
            .field("align", &self.align)
            .field("children", &self.children.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::rc::Rc;

    /// Fixed-size leaf that counts how often it was measured.
    #[derive(Debug, Clone)]
    struct FixedSize {
        size: Size,
        measured: Rc<Cell<usize>>,
    }

    impl FixedSize {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: Size::new(width, height),
                measured: Rc::new(Cell::new(0)),
            }
        }
    }

    impl Element for FixedSize {
        fn size(&self) -> Result<Size, LayoutError> {
            self.measured.set(self.measured.get() + 1);
            Ok(self.size)
        }
    }

    #[test]
    fn test_empty_container_is_its_padding() {
        let spacer: Container<FixedSize> =
            Container::new().with_padding(Padding::new(1, 2, 3, 4).unwrap());
        assert_eq!(spacer.size().unwrap(), Size::new(3, 7));
    }

    #[test]
    fn test_explicit_spacer() {
        let spacer: Container<FixedSize> = Container::new().with_height(2);
        assert_eq!(spacer.size().unwrap(), Size::new(0, 2));
    }

    #[test]
    fn test_block_sizing() {
        let container = Container::new()
            .with_display(Display::Block)
            .with_child(FixedSize::new(10, 3))
            .with_child(FixedSize::new(14, 5))
            .with_child(FixedSize::new(7, 2));
        assert_eq!(container.size().unwrap(), Size::new(14, 10));
    }

    #[test]
    fn test_inline_sizing_with_padding() {
        let container = Container::new()
            .with_display(Display::Inline)
            .with_padding(Padding::horizontal_vertical(1, 2))
            .with_child(FixedSize::new(4, 8))
            .with_child(FixedSize::new(6, 3));
        assert_eq!(container.size().unwrap(), Size::new(12, 12));
    }

    #[test]
    fn test_size_is_memoized() {
        let leaf = FixedSize::new(5, 5);
        let counter = Rc::clone(&leaf.measured);
        let container = Container::new().with_child(leaf);

        container.size().unwrap();
        container.size().unwrap();
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_add_invalidates_memo() {
        let mut container = Container::new().with_display(Display::Inline);
        container.add(FixedSize::new(4, 2));
        assert_eq!(container.size().unwrap(), Size::new(4, 2));

        container.add(FixedSize::new(6, 9));
        assert_eq!(container.size().unwrap(), Size::new(10, 9));
    }

    #[test]
    fn test_explicit_size_wins_over_content() {
        let container = Container::sized(5, 0).with_child(FixedSize::new(20, 4));
        assert_eq!(container.size().unwrap(), Size::new(5, 4));
    }

    #[test]
    fn test_nested_containers() {
        let inner = Container::new()
            .with_display(Display::Inline)
            .with_child(FixedSize::new(3, 3))
            .with_child(FixedSize::new(3, 3));
        let outer = Container::new()
            .with_padding(Padding::all(1))
            .with_child(inner)
            .with_child(FixedSize::new(2, 2));
        assert_eq!(outer.size().unwrap(), Size::new(8, 7));
    }

    #[test]
    fn test_overflowing_sum_is_geometry_error() {
        let container = Container::new()
            .with_name("tower")
            .with_child(FixedSize::new(1, u32::MAX))
            .with_child(FixedSize::new(1, 1));
        assert_eq!(
            container.size(),
            Err(LayoutError::InvalidGeometry {
                container: "tower".into(),
                axis: "height",
            })
        );
    }

    #[test]
    fn test_boundaries() {
        let container: Container<FixedSize> = Container::sized(50, 20)
            .with_padding(Padding::new(2, 3, 1, 4).unwrap());
        assert_eq!(
            container.boundaries().unwrap(),
            Bounds {
                min_x: 2,
                min_y: 1,
                max_x: 47,
                max_y: 16,
            }
        );
    }

    #[test]
    fn test_boundaries_are_not_clamped() {
        let container: Container<FixedSize> =
            Container::sized(4, 4).with_padding(Padding::all(3));
        let bounds = container.boundaries().unwrap();
        assert_eq!(bounds.max_x, 1);
        assert!(bounds.max_x < bounds.min_x);
    }

    #[test]
    fn test_debug_does_not_measure() {
        let leaf = FixedSize::new(1, 1);
        let counter = Rc::clone(&leaf.measured);
        let container = Container::new().with_name("status").with_child(leaf);
        let text = format!("{container:?}");
        assert!(text.contains("status"));
        assert_eq!(counter.get(), 0);
    }
}
