//! CPU raster used for every painted element.
//!
//! An [`Image`] is either palette-indexed (everything the painters produce)
//! or RGBA (files loaded from disk, such as mascot artwork). Painters flatten
//! RGBA images onto their palette before compositing.
//!
//! Images implement embedded-graphics' [`DrawTarget`] with [`Rgb888`]
//! colours, so primitives and bitmap fonts can be drawn straight onto them.
//! On indexed images each colour snaps to the nearest palette entry.

use core::convert::Infallible;
use std::fmt;
use std::path::Path;

use eink_layout::style::Border;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

use crate::error::PaintError;
use crate::palette::{Palette, Tone};

/// Alpha at or above this value counts as opaque when pasting through a mask.
pub const MASK_THRESHOLD: u8 = 128;

#[derive(Clone, PartialEq, Eq)]
enum Raster {
    Indexed { pixels: GrayImage, palette: Palette },
    Rgba { pixels: RgbaImage, alpha: bool },
}

/// A raster image.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    raster: Raster,
}

impl Image {
    /// Blank indexed image filled with paper white.
    pub fn blank(size: Size, palette: Palette) -> Self {
        Self {
            raster: Raster::Indexed {
                pixels: GrayImage::from_pixel(size.width, size.height, Luma([Tone::White.index()])),
                palette,
            },
        }
    }

    /// Wraps an RGBA buffer. `alpha` records whether the source carried a
    /// meaningful alpha channel.
    pub fn from_rgba(pixels: RgbaImage, alpha: bool) -> Self {
        Self {
            raster: Raster::Rgba { pixels, alpha },
        }
    }

    /// Converts a decoded image, keeping track of whether it had alpha.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let alpha = image.color().has_alpha();
        Self::from_rgba(image.to_rgba8(), alpha)
    }

    /// Decodes an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PaintError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening image");
        Ok(Self::from_dynamic(image::open(path)?))
    }

    /// Width and height in pixels.
    pub fn size(&self) -> Size {
        let (width, height) = match &self.raster {
            Raster::Indexed { pixels, .. } => pixels.dimensions(),
            Raster::Rgba { pixels, .. } => pixels.dimensions(),
        };
        Size::new(width, height)
    }

    /// Palette of an indexed image.
    pub fn palette(&self) -> Option<Palette> {
        match &self.raster {
            Raster::Indexed { palette, .. } => Some(*palette),
            Raster::Rgba { .. } => None,
        }
    }

    /// `true` for RGBA images whose source had an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self.raster, Raster::Rgba { alpha: true, .. })
    }

    /// Tone of an indexed pixel.
    pub fn tone_at(&self, x: u32, y: u32) -> Option<Tone> {
        match &self.raster {
            Raster::Indexed { pixels, .. } => pixels
                .get_pixel_checked(x, y)
                .and_then(|p| Tone::from_index(p.0[0])),
            Raster::Rgba { .. } => None,
        }
    }

    /// Display colour of any pixel.
    pub fn color_at(&self, x: u32, y: u32) -> Option<Rgb888> {
        match &self.raster {
            Raster::Indexed { pixels, palette } => pixels
                .get_pixel_checked(x, y)
                .map(|p| palette.color_at(p.0[0])),
            Raster::Rgba { pixels, .. } => pixels
                .get_pixel_checked(x, y)
                .map(|p| Rgb888::new(p.0[0], p.0[1], p.0[2])),
        }
    }

    /// Number of indexed pixels holding `tone`.
    pub fn count(&self, tone: Tone) -> usize {
        match &self.raster {
            Raster::Indexed { pixels, .. } => {
                pixels.as_raw().iter().filter(|&&i| i == tone.index()).count()
            }
            Raster::Rgba { .. } => 0,
        }
    }

    /// Raw pixel bytes (one index per pixel, or four bytes RGBA).
    pub fn as_bytes(&self) -> &[u8] {
        match &self.raster {
            Raster::Indexed { pixels, .. } => pixels.as_raw(),
            Raster::Rgba { pixels, .. } => pixels.as_raw(),
        }
    }

    /// Sets one pixel to a tone. Out-of-range coordinates are ignored.
    pub fn set_tone(&mut self, x: u32, y: u32, tone: Tone) {
        match &mut self.raster {
            Raster::Indexed { pixels, palette } => {
                let tone = if tone == Tone::Accent && !palette.has_accent() {
                    Tone::Black
                } else {
                    tone
                };
                if let Some(p) = pixels.get_pixel_mut_checked(x, y) {
                    p.0 = [tone.index()];
                }
            }
            Raster::Rgba { pixels, .. } => {
                let c = Palette::BlackWhiteRed.color(tone);
                if let Some(p) = pixels.get_pixel_mut_checked(x, y) {
                    *p = Rgba([c.r(), c.g(), c.b(), u8::MAX]);
                }
            }
        }
    }

    /// Fills a rectangle with a tone, clipped to the image.
    pub fn fill(&mut self, area: Rectangle, tone: Tone) {
        let clipped = area.intersection(&self.bounding_box());
        for point in clipped.points() {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.set_tone(x, y, tone);
            }
        }
    }

    fn put_color(&mut self, x: u32, y: u32, color: Rgb888) {
        match &mut self.raster {
            Raster::Indexed { pixels, palette } => {
                let tone = palette.nearest(color);
                if let Some(p) = pixels.get_pixel_mut_checked(x, y) {
                    p.0 = [tone.index()];
                }
            }
            Raster::Rgba { pixels, .. } => {
                if let Some(p) = pixels.get_pixel_mut_checked(x, y) {
                    *p = Rgba([color.r(), color.g(), color.b(), u8::MAX]);
                }
            }
        }
    }

    /// Copies one pixel from `src`, keeping the palette index when both
    /// images share a palette.
    fn copy_pixel(&mut self, src: &Image, sx: u32, sy: u32, dx: u32, dy: u32) {
        match (&mut self.raster, &src.raster) {
            (
                Raster::Indexed { pixels, palette },
                Raster::Indexed {
                    pixels: from,
                    palette: from_palette,
                },
            ) if palette == from_palette => {
                if let (Some(to), Some(value)) =
                    (pixels.get_pixel_mut_checked(dx, dy), from.get_pixel_checked(sx, sy))
                {
                    *to = *value;
                }
            }
            (Raster::Rgba { pixels, .. }, Raster::Rgba { pixels: from, .. }) => {
                if let (Some(to), Some(value)) =
                    (pixels.get_pixel_mut_checked(dx, dy), from.get_pixel_checked(sx, sy))
                {
                    *to = *value;
                }
            }
            _ => {
                if let Some(color) = src.color_at(sx, sy) {
                    self.put_color(dx, dy, color);
                }
            }
        }
    }

    /// Pastes `src` with its top-left corner at `at`.
    ///
    /// Pixels falling outside this image are clipped. With a `mask`, only
    /// pixels whose mask value is at least [`MASK_THRESHOLD`] are copied.
    pub fn paste(&mut self, src: &Image, at: Point, mask: Option<&GrayImage>) {
        let size = src.size();
        for sy in 0..size.height {
            for sx in 0..size.width {
                if let Some(mask) = mask {
                    match mask.get_pixel_checked(sx, sy) {
                        Some(Luma([alpha])) if *alpha >= MASK_THRESHOLD => {}
                        _ => continue,
                    }
                }
                let dx = i64::from(at.x) + i64::from(sx);
                let dy = i64::from(at.y) + i64::from(sy);
                if let (Ok(dx), Ok(dy)) = (u32::try_from(dx), u32::try_from(dy)) {
                    self.copy_pixel(src, sx, sy, dx, dy);
                }
            }
        }
    }

    /// Alpha channel of an RGBA image that carried alpha.
    pub fn alpha_mask(&self) -> Option<GrayImage> {
        match &self.raster {
            Raster::Rgba {
                pixels,
                alpha: true,
            } => Some(GrayImage::from_fn(pixels.width(), pixels.height(), |x, y| {
                Luma([pixels.get_pixel(x, y).0[3]])
            })),
            _ => None,
        }
    }

    /// Maps every pixel onto `palette` with `pick`, dropping alpha.
    ///
    /// No dithering: each pixel is converted independently.
    pub fn quantize(&self, palette: Palette, pick: impl Fn(Rgb888) -> Tone) -> Image {
        let size = self.size();
        let mut out = Image::blank(size, palette);
        for y in 0..size.height {
            for x in 0..size.width {
                if let Some(color) = self.color_at(x, y) {
                    out.set_tone(x, y, pick(color));
                }
            }
        }
        out
    }

    /// Rotates counter-clockwise by `degrees` about the centre.
    ///
    /// The canvas keeps its size, so corners of non-square images are
    /// cropped. Uncovered pixels become paper white (transparent for RGBA).
    /// Multiples of 90 are exact.
    pub fn rotate(&mut self, degrees: i32) -> &mut Self {
        let degrees = degrees.rem_euclid(360);
        if degrees == 0 {
            return self;
        }
        tracing::debug!(degrees, "rotating image");

        let (sin, cos) = match degrees {
            90 => (1.0, 0.0),
            180 => (0.0, -1.0),
            270 => (-1.0, 0.0),
            other => f64::from(other).to_radians().sin_cos(),
        };

        let size = self.size();
        let (w, h) = (f64::from(size.width), f64::from(size.height));
        let (cx, cy) = (w / 2.0, h / 2.0);

        let mut rotated = match &self.raster {
            Raster::Indexed { palette, .. } => Image::blank(size, *palette),
            Raster::Rgba { alpha, .. } => {
                Image::from_rgba(RgbaImage::new(size.width, size.height), *alpha)
            }
        };

        for y in 0..size.height {
            for x in 0..size.width {
                let dx = f64::from(x) + 0.5 - cx;
                let dy = f64::from(y) + 0.5 - cy;
                let sx = (cx + dx * cos - dy * sin).floor();
                let sy = (cy + dx * sin + dy * cos).floor();
                if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
                    continue;
                }
                // SAFETY: sx and sy were range-checked against the u32 image size above.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                rotated.copy_pixel(self, sx as u32, sy as u32, x, y);
            }
        }

        *self = rotated;
        self
    }

    /// Draws solid black bands along the edges named by `border`.
    ///
    /// A zero border leaves the image untouched.
    pub fn border(&mut self, border: Border) -> &mut Self {
        if border.is_none() {
            return self;
        }
        tracing::debug!(
            left = border.left,
            right = border.right,
            top = border.top,
            bottom = border.bottom,
            "drawing border"
        );

        let size = self.size();
        let right_x = i32::try_from(size.width.saturating_sub(border.right)).unwrap_or(i32::MAX);
        let bottom_y = i32::try_from(size.height.saturating_sub(border.bottom)).unwrap_or(i32::MAX);
        let bands = [
            Rectangle::new(Point::zero(), Size::new(border.left, size.height)),
            Rectangle::new(Point::new(right_x, 0), Size::new(border.right, size.height)),
            Rectangle::new(Point::zero(), Size::new(size.width, border.top)),
            Rectangle::new(Point::new(0, bottom_y), Size::new(size.width, border.bottom)),
        ];
        for band in bands {
            self.fill(band, Tone::Black);
        }
        self
    }

    /// Converts to an opaque RGB raster for saving or viewing.
    pub fn render(&self) -> RgbImage {
        match &self.raster {
            Raster::Indexed { pixels, palette } => {
                RgbImage::from_fn(pixels.width(), pixels.height(), |x, y| {
                    let c = palette.color_at(pixels.get_pixel(x, y).0[0]);
                    Rgb([c.r(), c.g(), c.b()])
                })
            }
            Raster::Rgba { pixels, .. } => DynamicImage::ImageRgba8(pixels.clone()).to_rgb8(),
        }
    }

    /// Writes the rendered image; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PaintError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "saving image");
        self.render().save(path)?;
        Ok(())
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        let mut s = f.debug_struct("Image");
        s.field("width", &size.width).field("height", &size.height);
        match &self.raster {
            Raster::Indexed { palette, .. } => s.field("palette", palette),
            Raster::Rgba { alpha, .. } => s.field("alpha", alpha),
        };
        s.finish()
    }
}

impl OriginDimensions for Image {
    fn size(&self) -> Size {
        Image::size(self)
    }
}

impl DrawTarget for Image {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.put_color(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

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
    fn test_blank_is_white() {
        let image = Image::blank(Size::new(4, 3), Palette::BlackWhite);
        assert_eq!(image.count(Tone::White), 12);
        assert_eq!(image.size(), Size::new(4, 3));
    }

    #[test]
    fn test_zero_border_is_noop() {
        let mut image = Image::blank(Size::new(5, 5), Palette::BlackWhite);
        image.set_tone(2, 2, Tone::Black);
        let before = image.clone();
        image.border(Border::NONE);
        assert_eq!(image.as_bytes(), before.as_bytes());
    }

    #[test]
    fn test_border_bands() {
        let mut image = Image::blank(Size::new(5, 4), Palette::BlackWhite);
        image.border(Border::NONE.with_top(1).with_right(2));
        assert_eq!(rows(&image), vec!["#####", "...##", "...##", "...##"]);
    }

    #[test]
    fn test_border_wider_than_image_clips() {
        let mut image = Image::blank(Size::new(3, 3), Palette::BlackWhite);
        image.border(Border::NONE.with_bottom(10));
        assert_eq!(image.count(Tone::Black), 9);
    }

    #[test]
    fn test_rotate_180_is_exact() {
        let mut image = Image::blank(Size::new(3, 2), Palette::BlackWhite);
        image.set_tone(0, 0, Tone::Black);
        image.rotate(180);
        assert_eq!(rows(&image), vec!["...", "..#"]);
    }

    #[test]
    fn test_rotate_90_is_counter_clockwise() {
        let mut image = Image::blank(Size::new(3, 3), Palette::BlackWhite);
        // mark the middle of the right edge
        image.set_tone(2, 1, Tone::Black);
        image.rotate(90);
        assert_eq!(rows(&image), vec![".#.", "...", "..."]);
    }

    #[test]
    fn test_rotate_full_turn_is_identity() {
        let mut image = Image::blank(Size::new(4, 2), Palette::BlackWhite);
        image.set_tone(1, 0, Tone::Black);
        let before = image.clone();
        image.rotate(360).rotate(-360);
        assert_eq!(image, before);
    }

    #[test]
    fn test_paste_clips_and_masks() {
        let mut canvas = Image::blank(Size::new(4, 4), Palette::BlackWhite);
        let mut stamp = Image::blank(Size::new(2, 2), Palette::BlackWhite);
        stamp.fill(Rectangle::new(Point::zero(), Size::new(2, 2)), Tone::Black);

        let mask = GrayImage::from_raw(2, 2, vec![255, 0, 0, 255]).unwrap();
        canvas.paste(&stamp, Point::new(-1, 0), None);
        canvas.paste(&stamp, Point::new(2, 2), Some(&mask));

        assert_eq!(rows(&canvas), vec!["#...", "#...", "..#.", "...#"]);
    }

    #[test]
    fn test_paste_remaps_foreign_palette() {
        let mut canvas = Image::blank(Size::new(1, 1), Palette::BlackWhite);
        let mut red = Image::blank(Size::new(1, 1), Palette::BlackWhiteRed);
        red.set_tone(0, 0, Tone::Accent);
        canvas.paste(&red, Point::zero(), None);
        assert_eq!(canvas.tone_at(0, 0), Some(Tone::Black));
    }

    #[test]
    fn test_accent_on_two_ink_image_is_black() {
        let mut image = Image::blank(Size::new(1, 1), Palette::BlackWhite);
        image.set_tone(0, 0, Tone::Accent);
        assert_eq!(image.tone_at(0, 0), Some(Tone::Black));
    }

    #[test]
    fn test_draw_target_snaps_to_palette() {
        let mut image = Image::blank(Size::new(4, 1), Palette::BlackWhiteRed);
        Line::new(Point::new(0, 0), Point::new(3, 0))
            .into_styled(PrimitiveStyle::with_stroke(Rgb888::new(200, 30, 30), 1))
            .draw(&mut image)
            .unwrap();
        assert_eq!(image.count(Tone::Accent), 4);
    }

    #[test]
    fn test_alpha_mask_only_for_alpha_images() {
        let rgba = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 10]));
        assert!(Image::from_rgba(rgba.clone(), true).alpha_mask().is_some());
        assert!(Image::from_rgba(rgba, false).alpha_mask().is_none());
        assert!(Image::blank(Size::new(1, 1), Palette::BlackWhite).alpha_mask().is_none());
    }

    #[test]
    fn test_render_uses_palette_colours() {
        let mut image = Image::blank(Size::new(2, 1), Palette::BlackWhiteYellow);
        image.set_tone(1, 0, Tone::Accent);
        let rgb = image.render();
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([255, 255, 0]));
    }
}
