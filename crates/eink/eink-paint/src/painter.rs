//! Painters turn layouts into images.
//!
//! [`Painter`] supplies every drawing operation and the recursive
//! compositor as provided methods. Implementations only decide the palette
//! and how a foreign image is flattened onto it:
//!
//! - [`PalettePainter`] snaps colours to the nearest entry of a fixed
//!   black/white(/accent) palette
//! - [`MonoPainter`] thresholds luminance into a native 1-bit image
//!
//! Both paste alpha-bearing images through their alpha channel as a mask.
//!
//! # Example
//!
//! ```
//! use eink_paint::prelude::*;
//! use embedded_graphics::prelude::Size;
//!
//! let painter = PalettePainter::new(Palette::BlackWhiteRed);
//! let font = Font::builtin("6x10").unwrap();
//!
//! let mut root = Container::new().with_padding(Padding::all(2));
//! root.add(painter.text("42.00", &font, 10.0));
//! root.add(painter.triangle(Size::new(10, 5), Orientation::Down.degrees()));
//!
//! let size = root.size().unwrap();
//! let image = painter.paint(size, &Layout::new(&root).layout().unwrap()).unwrap();
//! assert_eq!(image.size(), size);
//! ```

use std::path::Path;

use eink_layout::container::Node;
use eink_layout::element::Element;
use eink_layout::layout::Layout;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use image::GrayImage;

use crate::board::Board;
use crate::error::PaintError;
use crate::font::Font;
use crate::graphic::{Leaf, Text};
use crate::image::Image;
use crate::palette::{luma, Palette, Tone};
use crate::shapes::fill_polygon;
use crate::Placement;

/// Rasterization and compositing contract.
pub trait Painter {
    /// Palette of every image this painter produces.
    fn palette(&self) -> Palette;

    /// Converts `image` to this painter's palette.
    ///
    /// Returns the opaque image to paste and, for alpha-bearing input, the
    /// alpha channel to paste it through.
    fn flatten(&self, image: &Image) -> (Image, Option<GrayImage>);

    /// Blank canvas in the background tone.
    fn canvas(&self, size: Size) -> Image {
        Image::blank(size, self.palette())
    }

    /// Loads an image file as-is (RGBA, alpha flag preserved).
    fn from_file(&self, path: &Path) -> Result<Image, PaintError> {
        Image::open(path)
    }

    /// Draws `text` in the foreground tone onto the smallest fitting image.
    fn text(&self, text: &str, font: &Font, px: f32) -> Text {
        let image = font.render(text, px, self.palette());
        tracing::debug!(
            text,
            font = font.name(),
            width = image.size().width,
            height = image.size().height,
            "rendered text"
        );
        Text::new(text, font.name(), px, image)
    }

    /// Solid horizontal bar; its thickness is the image height.
    fn line(&self, size: Size) -> Image {
        let mut image = self.canvas(size);
        image.fill(Rectangle::new(Point::zero(), size), Tone::Black);
        image
    }

    /// Isosceles triangle filling `size`, apex up before rotation.
    ///
    /// `rotate` is counter-clockwise degrees; see
    /// [`Orientation`](crate::shapes::Orientation).
    fn triangle(&self, size: Size, rotate: i32) -> Image {
        let width = i32::try_from(size.width).unwrap_or(i32::MAX);
        let height = i32::try_from(size.height).unwrap_or(i32::MAX);
        let points = [
            Point::new(width / 2, 0),
            Point::new(0, height),
            Point::new(width, height),
        ];
        let mut image = self.polygon(size, &points);
        image.rotate(rotate);
        image
    }

    /// Filled polygon in the foreground tone.
    fn polygon(&self, size: Size, points: &[Point]) -> Image {
        let mut image = self.canvas(size);
        fill_polygon(&mut image, points, Tone::Black);
        image
    }

    /// Pushes `image` to a board and refreshes it.
    fn display(&self, board: &mut dyn Board, image: &Image) -> Result<(), PaintError> {
        tracing::info!(board = board.spec().name, "displaying image");
        board.set_image(image)?;
        board.show()?;
        Ok(())
    }

    /// Composites a layout onto a new canvas of `size`.
    ///
    /// Nested containers are laid out and painted recursively at their own
    /// size, get their border drawn, and are pasted at their position.
    /// Leaves are rendered, flattened and pasted. Anything falling outside
    /// the canvas is clipped.
    fn paint(&self, size: Size, layout: &[Placement<'_>]) -> Result<Image, PaintError> {
        let mut canvas = self.canvas(size);
        for placement in layout {
            match placement.node {
                Node::Container(container) => {
                    let children = Layout::new(container).layout()?;
                    let mut content = self.paint(container.size()?, &children)?;
                    content.border(container.border());
                    canvas.paste(&content, placement.position, None);
                }
                Node::Leaf(leaf) => {
                    paste_leaf(self, &mut canvas, leaf, placement.position)?;
                }
            }
        }
        Ok(canvas)
    }
}

fn paste_leaf<P: Painter + ?Sized>(
    painter: &P,
    canvas: &mut Image,
    leaf: &Leaf,
    at: Point,
) -> Result<(), PaintError> {
    let rendered = leaf.render()?;
    tracing::debug!(
        leaf = ?leaf,
        x = at.x,
        y = at.y,
        "compositing leaf"
    );
    if rendered.palette() == Some(painter.palette()) {
        canvas.paste(&rendered, at, None);
    } else {
        let (flat, mask) = painter.flatten(&rendered);
        canvas.paste(&flat, at, mask.as_ref());
    }
    Ok(())
}

/// Painter quantizing to a fixed palette (no dithering).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PalettePainter {
    palette: Palette,
}

impl PalettePainter {
    /// Painter for `palette`.
    pub const fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl Painter for PalettePainter {
    fn palette(&self) -> Palette {
        self.palette
    }

    fn flatten(&self, image: &Image) -> (Image, Option<GrayImage>) {
        let palette = self.palette;
        (
            image.quantize(palette, |color| palette.nearest(color)),
            image.alpha_mask(),
        )
    }
}

/// Painter producing native 1-bit black/white images.
///
/// Colours are split at mid luminance. Opaque images are pasted directly;
/// a mask is used only when the source carries alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonoPainter;

/// Luma at or above this is paper.
pub const MONO_THRESHOLD: u8 = 128;

impl Painter for MonoPainter {
    fn palette(&self) -> Palette {
        Palette::BlackWhite
    }

    fn flatten(&self, image: &Image) -> (Image, Option<GrayImage>) {
        let flat = image.quantize(Palette::BlackWhite, |color| {
            if luma(color) >= MONO_THRESHOLD {
                Tone::White
            } else {
                Tone::Black
            }
        });
        let mask = if image.has_alpha() {
            image.alpha_mask()
        } else {
            None
        };
        (flat, mask)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::shapes::Orientation;

    fn rows(image: &Image) -> Vec<String> {
        let size = image.size();
        (0..size.height)
            .map(|y| {
                (0..size.width)
                    .map(|x| match image.tone_at(x, y) {
                        Some(Tone::Black) => '#',
                        Some(Tone::Accent) => 'R',
                        _ => '.',
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_line_fills_its_box() {
        let image = MonoPainter.line(Size::new(5, 2));
        assert_eq!(image.count(Tone::Black), 10);
    }

    #[test]
    fn test_triangle_up_and_down() {
        let painter = PalettePainter::new(Palette::BlackWhite);
        let up = painter.triangle(Size::new(7, 4), Orientation::Up.degrees());
        let rows_up = rows(&up);
        // apex row is narrow, base row is wide
        let ink = |row: &String| row.chars().filter(|&c| c == '#').count();
        assert!(ink(&rows_up[0]) < ink(&rows_up[3]));

        let down = painter.triangle(Size::new(7, 4), Orientation::Down.degrees());
        let rows_down = rows(&down);
        assert!(ink(&rows_down[0]) > ink(&rows_down[3]));
    }

    #[test]
    fn test_triangle_left_points_left() {
        let painter = PalettePainter::new(Palette::BlackWhite);
        let left = painter.triangle(Size::new(8, 8), Orientation::Left.degrees());
        let column_ink = |x: u32| (0..8).filter(|&y| left.tone_at(x, y) == Some(Tone::Black)).count();
        assert!(column_ink(0) < column_ink(7));
    }

    #[test]
    fn test_polygon_is_black() {
        let painter = PalettePainter::new(Palette::BlackWhiteRed);
        let image = painter.polygon(
            Size::new(4, 4),
            &[Point::new(0, 0), Point::new(4, 0), Point::new(4, 4), Point::new(0, 4)],
        );
        assert_eq!(image.count(Tone::Black), 16);
        assert_eq!(image.count(Tone::Accent), 0);
    }

    #[test]
    fn test_mono_flatten_thresholds() {
        let rgba = image::RgbaImage::from_fn(3, 1, |x, _| match x {
            0 => image::Rgba([200, 200, 200, 255]),
            1 => image::Rgba([255, 0, 0, 255]),
            _ => image::Rgba([30, 30, 30, 255]),
        });
        let (flat, mask) = MonoPainter.flatten(&Image::from_rgba(rgba, false));
        assert_eq!(rows(&flat), vec![".##"]);
        assert!(mask.is_none());
    }

    #[test]
    fn test_palette_flatten_keeps_accent_and_mask() {
        let rgba = image::RgbaImage::from_fn(2, 1, |x, _| match x {
            0 => image::Rgba([240, 20, 20, 255]),
            _ => image::Rgba([0, 0, 0, 0]),
        });
        let painter = PalettePainter::new(Palette::BlackWhiteRed);
        let (flat, mask) = painter.flatten(&Image::from_rgba(rgba, true));
        assert_eq!(flat.tone_at(0, 0), Some(Tone::Accent));
        let mask = mask.unwrap();
        assert_eq!(mask.get_pixel(0, 0).0, [255]);
        assert_eq!(mask.get_pixel(1, 0).0, [0]);
    }
}
