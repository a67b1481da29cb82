//! Output boards: where a finished image goes.
//!
//! ## Hardware pattern
//!
//! E-paper controllers separate transferring a frame from refreshing the
//! panel, and [`Board`] mirrors that:
//!
//! ```rust,ignore
//! board.set_image(&image)?; // transfer into controller RAM
//! board.show()?;            // trigger the (slow) physical refresh
//! ```
//!
//! [`MemoryBoard`] keeps the frame as SSD16xx-style bit planes, which is
//! what a real driver would shift out over SPI. [`FileBoard`] writes the
//! frame to an image file on every refresh.

use std::path::{Path, PathBuf};

use eink_specs::DisplaySpec;
use embedded_graphics::prelude::Size;
use image::RgbImage;

use crate::error::BoardError;
use crate::image::Image;
use crate::palette::{Palette, Tone};

/// A physical or virtual e-paper panel.
pub trait Board {
    /// Panel specification (resolution and ink colours).
    fn spec(&self) -> &DisplaySpec;

    /// Transfers a frame. The image must match the panel resolution.
    fn set_image(&mut self, image: &Image) -> Result<(), BoardError>;

    /// Refreshes the panel with the last transferred frame.
    fn show(&mut self) -> Result<(), BoardError>;
}

fn check_size(spec: &DisplaySpec, image: &Image) -> Result<(), BoardError> {
    let expected = Size::new(spec.width, spec.height);
    let actual = image.size();
    if expected == actual {
        Ok(())
    } else {
        Err(BoardError::SizeMismatch { expected, actual })
    }
}

/// In-memory panel holding black and accent bit planes.
///
/// Rows are packed MSB-first, `ceil(width / 8)` bytes per row. In the black
/// plane a set bit is paper (white) and a clear bit is ink, as SSD16xx
/// controllers expect. In the accent plane a set bit is accent ink.
#[derive(Debug, Clone)]
pub struct MemoryBoard {
    spec: DisplaySpec,
    black: Vec<u8>,
    accent: Vec<u8>,
    staged: bool,
    refreshes: u32,
}

impl MemoryBoard {
    /// Blank (all white) panel.
    pub fn new(spec: DisplaySpec) -> Self {
        let len = Self::stride_of(&spec).saturating_mul(spec.height) as usize;
        Self {
            spec,
            black: vec![0xFF; len],
            accent: vec![0x00; len],
            staged: false,
            refreshes: 0,
        }
    }

    fn stride_of(spec: &DisplaySpec) -> u32 {
        spec.width.div_ceil(8)
    }

    /// Black plane (set bit = white).
    pub fn black_plane(&self) -> &[u8] {
        &self.black
    }

    /// Accent plane (set bit = accent ink).
    pub fn accent_plane(&self) -> &[u8] {
        &self.accent
    }

    /// Number of completed `show` calls.
    pub fn refresh_count(&self) -> u32 {
        self.refreshes
    }

    // SAFETY: x < width and y < height are checked; the byte index is then
    // below stride * height, the plane length.
    #[allow(clippy::arithmetic_side_effects)]
    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.spec.width || y >= self.spec.height {
            return None;
        }
        let index = (y * Self::stride_of(&self.spec) + x / 8) as usize;
        let bit = 0x80u8 >> (x % 8);
        Some((index, bit))
    }

    /// Tone currently held for a pixel.
    pub fn tone_at(&self, x: u32, y: u32) -> Option<Tone> {
        let (index, bit) = self.locate(x, y)?;
        let accent = self.accent.get(index)? & bit != 0;
        let paper = self.black.get(index)? & bit != 0;
        Some(if accent {
            Tone::Accent
        } else if paper {
            Tone::White
        } else {
            Tone::Black
        })
    }
}

impl Board for MemoryBoard {
    fn spec(&self) -> &DisplaySpec {
        &self.spec
    }

    fn set_image(&mut self, image: &Image) -> Result<(), BoardError> {
        check_size(&self.spec, image)?;
        let palette = Palette::for_ink(self.spec.color);
        self.black.fill(0xFF);
        self.accent.fill(0x00);

        for y in 0..self.spec.height {
            for x in 0..self.spec.width {
                let Some(color) = image.color_at(x, y) else {
                    continue;
                };
                let Some((index, bit)) = self.locate(x, y) else {
                    continue;
                };
                match palette.nearest(color) {
                    Tone::White => {}
                    Tone::Black => {
                        if let Some(byte) = self.black.get_mut(index) {
                            *byte &= !bit;
                        }
                    }
                    Tone::Accent => {
                        if let Some(byte) = self.accent.get_mut(index) {
                            *byte |= bit;
                        }
                    }
                }
            }
        }
        self.staged = true;
        Ok(())
    }

    fn show(&mut self) -> Result<(), BoardError> {
        if !self.staged {
            return Err(BoardError::NoImage);
        }
        self.refreshes = self.refreshes.saturating_add(1);
        tracing::info!(board = self.spec.name, refreshes = self.refreshes, "panel refreshed");
        Ok(())
    }
}

/// Panel stand-in that writes every refresh to an image file.
#[derive(Debug, Clone)]
pub struct FileBoard {
    spec: DisplaySpec,
    path: PathBuf,
    frame: Option<RgbImage>,
}

impl FileBoard {
    /// Board writing to `path`; the format follows the extension.
    pub fn new(spec: DisplaySpec, path: impl Into<PathBuf>) -> Self {
        Self {
            spec,
            path: path.into(),
            frame: None,
        }
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Board for FileBoard {
    fn spec(&self) -> &DisplaySpec {
        &self.spec
    }

    fn set_image(&mut self, image: &Image) -> Result<(), BoardError> {
        check_size(&self.spec, image)?;
        self.frame = Some(image.render());
        Ok(())
    }

    fn show(&mut self) -> Result<(), BoardError> {
        let frame = self.frame.as_ref().ok_or(BoardError::NoImage)?;
        frame.save(&self.path)?;
        tracing::info!(path = %self.path.display(), "frame written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use eink_specs::displays::INKY_PHAT;
    use eink_specs::InkColor;

    fn tiny(color: InkColor) -> DisplaySpec {
        INKY_PHAT.with_resolution(10, 2).with_color(color)
    }

    #[test]
    fn test_planes_pack_msb_first() {
        let mut board = MemoryBoard::new(tiny(InkColor::Red));
        let mut image = Image::blank(Size::new(10, 2), Palette::BlackWhiteRed);
        image.set_tone(0, 0, Tone::Black);
        image.set_tone(9, 0, Tone::Accent);
        image.set_tone(1, 1, Tone::Black);

        board.set_image(&image).unwrap();

        // two bytes per row
        assert_eq!(board.black_plane(), &[0x7F, 0xFF, 0xBF, 0xFF]);
        assert_eq!(board.accent_plane(), &[0x00, 0x40, 0x00, 0x00]);
        assert_eq!(board.tone_at(9, 0), Some(Tone::Accent));
        assert_eq!(board.tone_at(1, 1), Some(Tone::Black));
        assert_eq!(board.tone_at(10, 0), None);
    }

    #[test]
    fn test_accent_on_black_panel_becomes_ink() {
        let mut board = MemoryBoard::new(tiny(InkColor::Black));
        let mut image = Image::blank(Size::new(10, 2), Palette::BlackWhiteRed);
        image.set_tone(3, 0, Tone::Accent);
        board.set_image(&image).unwrap();
        assert_eq!(board.tone_at(3, 0), Some(Tone::Black));
        assert!(board.accent_plane().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_size_mismatch() {
        let mut board = MemoryBoard::new(tiny(InkColor::Black));
        let image = Image::blank(Size::new(3, 3), Palette::BlackWhite);
        assert!(matches!(
            board.set_image(&image),
            Err(BoardError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_show_requires_image() {
        let mut board = MemoryBoard::new(tiny(InkColor::Black));
        assert!(matches!(board.show(), Err(BoardError::NoImage)));

        board
            .set_image(&Image::blank(Size::new(10, 2), Palette::BlackWhite))
            .unwrap();
        board.show().unwrap();
        board.show().unwrap();
        assert_eq!(board.refresh_count(), 2);
    }

    #[test]
    fn test_file_board_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut board = FileBoard::new(tiny(InkColor::Black), &path);

        assert!(matches!(board.show(), Err(BoardError::NoImage)));
        board
            .set_image(&Image::blank(Size::new(10, 2), Palette::BlackWhite))
            .unwrap();
        board.show().unwrap();

        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (10, 2));
    }
}
