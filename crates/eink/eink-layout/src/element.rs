//! The sizing capability shared by every node in a layout tree.

use core::fmt;

use embedded_graphics::prelude::Size;

use crate::error::LayoutError;

/// Anything that occupies a rectangle: text, images, charts, containers.
///
/// Only [`size`](Element::size) is required. Leaves usually return a stored
/// value; containers compute theirs from their children and may fail when
/// the result is not representable.
pub trait Element: fmt::Debug {
    /// Width and height in pixels.
    fn size(&self) -> Result<Size, LayoutError>;

    /// Width in pixels.
    fn width(&self) -> Result<u32, LayoutError> {
        self.size().map(|size| size.width)
    }

    /// Height in pixels.
    fn height(&self) -> Result<u32, LayoutError> {
        self.size().map(|size| size.height)
    }
}

impl<T: Element + ?Sized> Element for Box<T> {
    fn size(&self) -> Result<Size, LayoutError> {
        (**self).size()
    }
}

impl<T: Element + ?Sized> Element for &T {
    fn size(&self) -> Result<Size, LayoutError> {
        (**self).size()
    }
}
