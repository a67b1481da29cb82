//! E-Ink Layout System
//!
//! Minimal box-model layout engine for small e-paper dashboards.
//!
//! # Architecture
//!
//! - Core types: [`Position`](style::Position), [`Padding`](style::Padding),
//!   [`Border`](style::Border), [`Display`](style::Display), [`Align`](style::Align)
//! - [`Element`](element::Element): anything with a size
//! - [`Container`](container::Container): a box of children that sizes itself
//!   from its content, padding and optional explicit dimensions
//! - [`Layout`](layout::Layout): places the direct children of one container
//!
//! Layout is one level deep. Whoever walks the tree (normally a painter)
//! lays out nested containers recursively, each in its own coordinate space.
//!
//! # Example
//!
//! ```
//! use eink_layout::prelude::*;
//! use embedded_graphics::prelude::Size;
//!
//! #[derive(Debug)]
//! struct Block(Size);
//!
//! impl Element for Block {
//!     fn size(&self) -> Result<Size, LayoutError> {
//!         Ok(self.0)
//!     }
//! }
//!
//! let mut column: Container<Block> = Container::new().with_display(Display::Block);
//! column.add(Block(Size::new(10, 3)));
//! column.add(Block(Size::new(8, 5)));
//!
//! assert_eq!(column.size().unwrap(), Size::new(10, 8));
//!
//! let placements = Layout::new(&column).layout().unwrap();
//! assert_eq!(placements[1].position, Position::new(0, 3));
//! ```

pub mod container;
pub mod element;
pub mod error;
pub mod layout;
pub mod style;

/// Common imports.
pub mod prelude {
    // Box model (public API)
    pub use crate::style::*;

    // Element capability
    pub use crate::element::Element;

    // Tree
    pub use crate::container::{Container, Node};

    // Placement
    pub use crate::layout::{Layout, Placement};

    pub use crate::error::LayoutError;
}
