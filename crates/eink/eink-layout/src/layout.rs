//! Placement of a container's direct children.
//!
//! [`Layout`] computes one [`Placement`] per child, in insertion order,
//! relative to the container's own top-left corner. It does not descend
//! into nested containers; a painter lays those out when it reaches them.
//!
//! | display | align | cursor start           | per child                                  |
//! |---------|-------|------------------------|--------------------------------------------|
//! | Block   | Left  | `(min_x, min_y)`       | place, then `y += height`                  |
//! | Block   | Right | `y = min_y`            | `x = max_x - width`, place, `y += height`  |
//! | Inline  | Left  | `(min_x, min_y)`       | place, then `x += width`                   |
//! | Inline  | Right | `(max_x, min_y)`       | `x -= width`, then place                   |
//!
//! Inline/Right packs from the trailing edge in insertion order, so the last
//! child added ends up leftmost.

use crate::container::{Container, Node};
use crate::element::Element;
use crate::error::LayoutError;
use crate::style::{Align, Display, Position};

/// Where one child goes inside its parent's box.
#[derive(Debug)]
pub struct Placement<'a, L> {
    /// Top-left corner, relative to the parent container.
    pub position: Position,
    /// The placed child.
    pub node: &'a Node<L>,
}

// Manual impls: a placement only borrows the node, so it is Copy for any L.
impl<L> Clone for Placement<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L> Copy for Placement<'_, L> {}

/// Layout pass over one container.
#[derive(Debug)]
pub struct Layout<'a, L> {
    container: &'a Container<L>,
}

impl<'a, L: Element> Layout<'a, L> {
    /// Prepares a layout pass over `container`.
    pub fn new(container: &'a Container<L>) -> Self {
        Self { container }
    }

    /// The container being laid out.
    pub fn container(&self) -> &'a Container<L> {
        self.container
    }

    /// Computes the position of every direct child.
    ///
    /// Fails only when a size or coordinate cannot be represented.
    pub fn layout(&self) -> Result<Vec<Placement<'a, L>>, LayoutError> {
        let bounds = self.container.boundaries()?;
        let children = self.container.children();
        let mut placements = Vec::with_capacity(children.len());

        let mut x = match (self.container.display(), self.container.align()) {
            (Display::Inline, Align::Right) => bounds.max_x,
            _ => bounds.min_x,
        };
        let mut y = bounds.min_y;

        for node in children {
            let width = self.offset(node.width()?, "width")?;
            let height = self.offset(node.height()?, "height")?;

            match (self.container.display(), self.container.align()) {
                (Display::Block, Align::Left) => {
                    placements.push(Placement {
                        position: Position::new(x, y),
                        node,
                    });
                    y = self.advance(y, height, "height")?;
                }
                (Display::Block, Align::Right) => {
                    x = self.retreat(bounds.max_x, width, "width")?;
                    placements.push(Placement {
                        position: Position::new(x, y),
                        node,
                    });
                    y = self.advance(y, height, "height")?;
                }
                (Display::Inline, Align::Left) => {
                    placements.push(Placement {
                        position: Position::new(x, y),
                        node,
                    });
                    x = self.advance(x, width, "width")?;
                }
                (Display::Inline, Align::Right) => {
                    x = self.retreat(x, width, "width")?;
                    placements.push(Placement {
                        position: Position::new(x, y),
                        node,
                    });
                }
            }
        }

        tracing::debug!(
            container = self.container.name(),
            display = %self.container.display(),
            align = %self.container.align(),
            placed = placements.len(),
            "laid out"
        );
        Ok(placements)
    }

    fn offset(&self, value: u32, axis: &'static str) -> Result<i32, LayoutError> {
        i32::try_from(value).map_err(|_| self.error(axis))
    }

    fn advance(&self, cursor: i32, by: i32, axis: &'static str) -> Result<i32, LayoutError> {
        cursor.checked_add(by).ok_or_else(|| self.error(axis))
    }

    fn retreat(&self, cursor: i32, by: i32, axis: &'static str) -> Result<i32, LayoutError> {
        cursor.checked_sub(by).ok_or_else(|| self.error(axis))
    }

    fn error(&self, axis: &'static str) -> LayoutError {
        LayoutError::InvalidGeometry {
            container: self.container.name().to_owned(),
            axis,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::style::Padding;
    use embedded_graphics::prelude::Size;

    #[derive(Debug)]
    struct FixedSize(Size);

    impl Element for FixedSize {
        fn size(&self) -> Result<Size, LayoutError> {
            Ok(self.0)
        }
    }

    fn positions(container: &Container<FixedSize>) -> Vec<(i32, i32)> {
        Layout::new(container)
            .layout()
            .unwrap()
            .iter()
            .map(|p| (p.position.x, p.position.y))
            .collect()
    }

    fn boxes(container: Container<FixedSize>, sizes: &[(u32, u32)]) -> Container<FixedSize> {
        sizes.iter().fold(container, |c, &(w, h)| {
            c.with_child(FixedSize(Size::new(w, h)))
        })
    }

    #[test]
    fn test_block_left_stacks_down() {
        let c = boxes(Container::new(), &[(1, 3), (1, 5), (1, 2)]);
        assert_eq!(positions(&c), vec![(0, 0), (0, 3), (0, 8)]);
    }

    #[test]
    fn test_block_left_respects_padding() {
        let c = boxes(
            Container::new().with_padding(Padding::new(2, 0, 1, 0).unwrap()),
            &[(4, 4), (4, 4)],
        );
        assert_eq!(positions(&c), vec![(2, 1), (2, 5)]);
    }

    #[test]
    fn test_block_right_anchors_each_child() {
        let c = boxes(
            Container::sized(20, 0).with_align(Align::Right),
            &[(4, 2), (10, 3)],
        );
        assert_eq!(positions(&c), vec![(16, 0), (10, 2)]);
    }

    #[test]
    fn test_inline_left_runs_across() {
        let c = boxes(
            Container::new().with_display(Display::Inline),
            &[(4, 1), (6, 9), (2, 2)],
        );
        assert_eq!(positions(&c), vec![(0, 0), (4, 0), (10, 0)]);
    }

    #[test]
    fn test_inline_right_packs_from_trailing_edge() {
        let c = boxes(
            Container::sized(20, 0)
                .with_display(Display::Inline)
                .with_align(Align::Right),
            &[(4, 1), (6, 1)],
        );
        assert_eq!(positions(&c), vec![(16, 0), (10, 0)]);
    }

    #[test]
    fn test_inline_right_with_right_padding() {
        let c = boxes(
            Container::sized(25, 0)
                .with_display(Display::Inline)
                .with_align(Align::Right)
                .with_padding(Padding::NONE.with_right(2).with_top(1)),
            &[(5, 5)],
        );
        assert_eq!(positions(&c), vec![(18, 1)]);
    }

    #[test]
    fn test_placements_follow_insertion_order() {
        let c = boxes(Container::new(), &[(1, 1), (2, 2), (3, 3)]);
        let placements = Layout::new(&c).layout().unwrap();
        let widths: Vec<u32> = placements.iter().map(|p| p.node.width().unwrap()).collect();
        assert_eq!(widths, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_container_has_no_placements() {
        let c: Container<FixedSize> = Container::sized(10, 10);
        assert!(Layout::new(&c).layout().unwrap().is_empty());
    }

    #[test]
    fn test_oversized_child_overflows_leading_edge() {
        let c = boxes(
            Container::sized(5, 0)
                .with_display(Display::Inline)
                .with_align(Align::Right),
            &[(8, 1)],
        );
        assert_eq!(positions(&c), vec![(-3, 0)]);
    }
}
