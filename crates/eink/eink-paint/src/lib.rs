//! E-Ink Paint
//!
//! Rasterizes [`eink_layout`] trees into palette images and pushes them to
//! e-paper boards.
//!
//! # Pipeline
//!
//! 1. Build leaves with a [`Painter`](painter::Painter): text, lines,
//!    triangles, polygons, or images loaded from disk
//! 2. Arrange them in [`Container`]s (the layout engine measures and places)
//! 3. [`paint`](painter::Painter::paint) the root layout onto a canvas
//! 4. [`display`](painter::Painter::display) the canvas on a
//!    [`Board`](board::Board)
//!
//! Every image a painter produces is indexed on a small e-paper
//! [`Palette`](palette::Palette): white paper, black ink and optionally one
//! accent ink.

pub mod board;
pub mod error;
pub mod font;
pub mod graphic;
pub mod image;
pub mod painter;
pub mod palette;
pub mod shapes;

use crate::graphic::Leaf;

/// Container whose leaves are paintable graphics.
pub type Container = eink_layout::container::Container<Leaf>;

/// Child of a paintable [`Container`].
pub type Node = eink_layout::container::Node<Leaf>;

/// Placement of a child of a paintable [`Container`].
pub type Placement<'a> = eink_layout::layout::Placement<'a, Leaf>;

/// Common imports.
pub mod prelude {
    pub use eink_layout::element::Element;
    pub use eink_layout::error::LayoutError;
    pub use eink_layout::layout::Layout;
    pub use eink_layout::style::*;

    pub use crate::board::{Board, FileBoard, MemoryBoard};
    pub use crate::error::{BoardError, PaintError};
    pub use crate::font::Font;
    pub use crate::graphic::{Graphic, Leaf, Text};
    pub use crate::image::Image;
    pub use crate::painter::{MonoPainter, PalettePainter, Painter};
    pub use crate::palette::{Palette, Tone};
    pub use crate::shapes::Orientation;
    pub use crate::{Container, Node, Placement};
}
