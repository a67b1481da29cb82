//! Fonts for text elements.
//!
//! Two kinds are supported:
//!
//! - bundled embedded-graphics bitmap fonts, named `builtin:<W>x<H>`
//!   (e.g. `builtin:6x10`), which ignore the requested pixel size
//! - TrueType/OpenType files rasterized with `fontdue`
//!
//! Text is drawn without anti-aliasing: a glyph pixel is inked when its
//! coverage reaches half.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use embedded_graphics::mono_font::{ascii, MonoFont, MonoTextStyle};
use embedded_graphics::prelude::*;
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text as TextDrawable};

use crate::error::PaintError;
use crate::image::Image;
use crate::palette::{Palette, Tone};

const COVERAGE_THRESHOLD: u8 = 128;

/// A loaded font.
#[derive(Clone)]
pub enum Font {
    /// Fixed-size bitmap font bundled with embedded-graphics
    Bitmap {
        /// Name after the `builtin:` prefix
        name: &'static str,
        /// Glyph data
        font: &'static MonoFont<'static>,
    },
    /// Scalable font read from a file
    Vector {
        /// Source path, for diagnostics
        name: String,
        /// Parsed outlines
        font: Arc<fontdue::Font>,
    },
}

fn builtin(name: &str) -> Option<(&'static str, &'static MonoFont<'static>)> {
    let font = match name {
        "4x6" => ("4x6", &ascii::FONT_4X6),
        "5x7" => ("5x7", &ascii::FONT_5X7),
        "5x8" => ("5x8", &ascii::FONT_5X8),
        "6x9" => ("6x9", &ascii::FONT_6X9),
        "6x10" => ("6x10", &ascii::FONT_6X10),
        "6x12" => ("6x12", &ascii::FONT_6X12),
        "6x13" => ("6x13", &ascii::FONT_6X13),
        "7x13" => ("7x13", &ascii::FONT_7X13),
        "7x14" => ("7x14", &ascii::FONT_7X14),
        "8x13" => ("8x13", &ascii::FONT_8X13),
        "9x15" => ("9x15", &ascii::FONT_9X15),
        "9x18" => ("9x18", &ascii::FONT_9X18),
        "10x20" => ("10x20", &ascii::FONT_10X20),
        _ => return None,
    };
    Some(font)
}

impl Font {
    /// Bundled bitmap font by size name (`"6x10"`).
    pub fn builtin(name: &str) -> Option<Self> {
        builtin(name).map(|(name, font)| Font::Bitmap { name, font })
    }

    /// Reads a TrueType/OpenType file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PaintError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| PaintError::FontIo {
            path: shown.clone(),
            source,
        })?;
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|reason| PaintError::FontParse {
                path: shown.clone(),
                reason,
            })?;
        tracing::debug!(path = %shown, "loaded font");
        Ok(Font::Vector {
            name: shown,
            font: Arc::new(font),
        })
    }

    /// Resolves a configuration value: `builtin:<name>` or a file path.
    pub fn load(spec: &str) -> Result<Self, PaintError> {
        match spec.strip_prefix("builtin:") {
            Some(name) => Self::builtin(name).ok_or_else(|| PaintError::UnknownFont(name.to_owned())),
            None => Self::from_file(spec),
        }
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Font::Bitmap { name, .. } => name,
            Font::Vector { name, .. } => name,
        }
    }

    /// Draws `text` in black onto the smallest image that holds it.
    ///
    /// The image is as wide as the ink extent (right minus left) and as tall
    /// as the distance from the top of the line to the lowest inked pixel.
    /// Text is drawn at the origin.
    pub fn render(&self, text: &str, px: f32, palette: Palette) -> Image {
        match self {
            Font::Bitmap { font, .. } => render_bitmap(font, text, palette),
            Font::Vector { font, .. } => render_vector(font, text, px, palette),
        }
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Font::Bitmap { name, .. } => write!(f, "Font(builtin:{name})"),
            Font::Vector { name, .. } => write!(f, "Font({name})"),
        }
    }
}

fn render_bitmap(font: &'static MonoFont<'static>, text: &str, palette: Palette) -> Image {
    let style = MonoTextStyle::new(font, palette.color(Tone::Black));
    let size = style
        .measure_string(text, Point::zero(), Baseline::Top)
        .bounding_box
        .size;
    let mut image = Image::blank(size, palette);
    // Image's DrawTarget is infallible.
    let _ = TextDrawable::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut image);
    image
}

struct Glyph {
    x: i32,
    y: i32,
    width: usize,
    coverage: Vec<u8>,
}

// SAFETY: glyph metrics are bounded by the font size (a few hundred pixels at
// most), so the i32/usize conversions and sums below cannot overflow.
#[allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
fn render_vector(font: &fontdue::Font, text: &str, px: f32, palette: Palette) -> Image {
    let ascent = font
        .horizontal_line_metrics(px)
        .map_or(px, |metrics| metrics.ascent);
    let baseline = ascent.round() as i32;

    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen = 0.0f32;
    let mut previous = None;
    let (mut left, mut right, mut bottom) = (i32::MAX, 0i32, 0i32);

    for ch in text.chars() {
        if let Some(prev) = previous {
            pen += font.horizontal_kern(prev, ch, px).unwrap_or(0.0);
        }
        let (metrics, coverage) = font.rasterize(ch, px);
        let x = pen.round() as i32 + metrics.xmin;
        let y = baseline - metrics.ymin - metrics.height as i32;
        if metrics.width > 0 && metrics.height > 0 {
            left = left.min(x);
            right = right.max(x + metrics.width as i32);
            bottom = bottom.max(y + metrics.height as i32);
        }
        glyphs.push(Glyph {
            x,
            y,
            width: metrics.width,
            coverage,
        });
        pen += metrics.advance_width;
        previous = Some(ch);
    }

    if left == i32::MAX {
        left = 0;
    }
    right = right.max(pen.ceil() as i32);
    let width = (right - left).max(0) as u32;
    let height = bottom.max(0) as u32;
    tracing::trace!(text, left, right, bottom, "text extent");

    let mut image = Image::blank(Size::new(width, height), palette);
    for glyph in &glyphs {
        if glyph.width == 0 {
            continue;
        }
        for (i, &value) in glyph.coverage.iter().enumerate() {
            if value < COVERAGE_THRESHOLD {
                continue;
            }
            let gx = glyph.x + (i % glyph.width) as i32;
            let gy = glyph.y + (i / glyph.width) as i32;
            if let (Ok(x), Ok(y)) = (u32::try_from(gx), u32::try_from(gy)) {
                image.set_tone(x, y, Tone::Black);
            }
        }
    }
    image
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert!(Font::builtin("6x10").is_some());
        assert!(Font::builtin("11x11").is_none());
        assert_eq!(Font::load("builtin:4x6").unwrap().name(), "4x6");
    }

    #[test]
    fn test_unknown_builtin_is_error() {
        assert!(matches!(
            Font::load("builtin:huge"),
            Err(PaintError::UnknownFont(name)) if name == "huge"
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Font::load("/nonexistent/font.ttf"),
            Err(PaintError::FontIo { .. })
        ));
    }

    #[test]
    fn test_unparsable_file_names_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        match Font::from_file(&path) {
            Err(PaintError::FontParse { path: shown, .. }) => {
                assert_eq!(shown, path.display().to_string());
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_bitmap_text_extent() {
        let font = Font::builtin("6x10").unwrap();
        let image = font.render("abc", 99.0, Palette::BlackWhite);
        assert_eq!(image.size(), Size::new(18, 10));
        assert!(image.count(Tone::Black) > 0);
    }

    #[test]
    fn test_bitmap_empty_text_has_no_width() {
        let font = Font::builtin("6x10").unwrap();
        let image = font.render("", 10.0, Palette::BlackWhite);
        assert_eq!(image.size().width, 0);
    }
}
