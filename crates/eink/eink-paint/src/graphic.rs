//! Drawable leaves of a layout tree.

use std::borrow::Cow;

use eink_layout::container::Node;
use eink_layout::element::Element;
use eink_layout::error::LayoutError;
use embedded_graphics::prelude::Size;

use crate::error::PaintError;
use crate::image::Image;

/// A leaf that can be rasterized.
///
/// Painters call [`render`](Graphic::render) when they reach the leaf in a
/// layout and composite the result at the leaf's position.
pub trait Graphic: Element {
    /// The leaf's pixels. Leaves that already hold an image borrow it.
    fn render(&self) -> Result<Cow<'_, Image>, PaintError>;
}

/// Boxed leaf stored in painter-facing containers.
pub type Leaf = Box<dyn Graphic>;

impl Element for Image {
    fn size(&self) -> Result<Size, LayoutError> {
        Ok(Image::size(self))
    }
}

impl Graphic for Image {
    fn render(&self) -> Result<Cow<'_, Image>, PaintError> {
        Ok(Cow::Borrowed(self))
    }
}

impl From<Image> for Node<Leaf> {
    fn from(image: Image) -> Self {
        Node::Leaf(Box::new(image))
    }
}

/// A run of text already rasterized in a particular font.
#[derive(Debug, Clone)]
pub struct Text {
    content: String,
    font: String,
    px: f32,
    image: Image,
}

impl Text {
    pub(crate) fn new(content: &str, font: &str, px: f32, image: Image) -> Self {
        Self {
            content: content.to_owned(),
            font: font.to_owned(),
            px,
            image,
        }
    }

    /// The string that was drawn.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Font name used.
    pub fn font(&self) -> &str {
        &self.font
    }

    /// Requested pixel size.
    pub fn px(&self) -> f32 {
        self.px
    }

    /// The rasterized text.
    pub fn image(&self) -> &Image {
        &self.image
    }
}

impl Element for Text {
    fn size(&self) -> Result<Size, LayoutError> {
        Ok(self.image.size())
    }
}

impl Graphic for Text {
    fn render(&self) -> Result<Cow<'_, Image>, PaintError> {
        Ok(Cow::Borrowed(&self.image))
    }
}

impl From<Text> for Node<Leaf> {
    fn from(text: Text) -> Self {
        Node::Leaf(Box::new(text))
    }
}
