//! Ink tones and the fixed palettes of e-paper panels.
//!
//! Painted images store one palette index per pixel. Index 0 is always the
//! paper (white), index 1 the black ink and index 2, on tri-colour panels,
//! the accent ink.

use eink_specs::InkColor;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// One ink of a panel, stored as its palette index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tone {
    /// Paper / background
    White = 0,
    /// Foreground ink
    Black = 1,
    /// Third pigment on red or yellow panels
    Accent = 2,
}

impl Tone {
    /// Palette index of this tone.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Tone stored at `index`, if any.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Tone::White),
            1 => Some(Tone::Black),
            2 => Some(Tone::Accent),
            _ => None,
        }
    }
}

const BLACK_AND_WHITE: [Rgb888; 2] = [Rgb888::WHITE, Rgb888::BLACK];
const BLACK_WHITE_RED: [Rgb888; 3] = [Rgb888::WHITE, Rgb888::BLACK, Rgb888::RED];
const BLACK_WHITE_YELLOW: [Rgb888; 3] = [Rgb888::WHITE, Rgb888::BLACK, Rgb888::YELLOW];

/// The fixed set of colours a panel can show.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Palette {
    /// White and black
    #[default]
    BlackWhite,
    /// White, black and red
    BlackWhiteRed,
    /// White, black and yellow
    BlackWhiteYellow,
}

impl Palette {
    /// Palette for a panel's ink variant.
    pub const fn for_ink(ink: InkColor) -> Self {
        match ink {
            InkColor::Black => Palette::BlackWhite,
            InkColor::Red => Palette::BlackWhiteRed,
            InkColor::Yellow => Palette::BlackWhiteYellow,
        }
    }

    /// Colours in index order.
    pub const fn colors(self) -> &'static [Rgb888] {
        match self {
            Palette::BlackWhite => &BLACK_AND_WHITE,
            Palette::BlackWhiteRed => &BLACK_WHITE_RED,
            Palette::BlackWhiteYellow => &BLACK_WHITE_YELLOW,
        }
    }

    /// Whether [`Tone::Accent`] is available.
    pub const fn has_accent(self) -> bool {
        !matches!(self, Palette::BlackWhite)
    }

    /// Display colour of a tone. Accent falls back to black on two-ink panels.
    pub fn color(self, tone: Tone) -> Rgb888 {
        self.colors()
            .get(usize::from(tone.index()))
            .copied()
            .unwrap_or(Rgb888::BLACK)
    }

    /// Display colour of a raw index. Unknown indices render as paper.
    pub fn color_at(self, index: u8) -> Rgb888 {
        self.colors()
            .get(usize::from(index))
            .copied()
            .unwrap_or(Rgb888::WHITE)
    }

    /// Closest tone by squared RGB distance. Ties go to the lower index.
    pub fn nearest(self, color: Rgb888) -> Tone {
        let distance = |c: &Rgb888| {
            let dr = i32::from(c.r()) - i32::from(color.r());
            let dg = i32::from(c.g()) - i32::from(color.g());
            let db = i32::from(c.b()) - i32::from(color.b());
            dr * dr + dg * dg + db * db
        };

        let mut best = Tone::White;
        let mut best_distance = i32::MAX;
        for (index, candidate) in self.colors().iter().enumerate() {
            let d = distance(candidate);
            if d < best_distance {
                best_distance = d;
                best = u8::try_from(index)
                    .ok()
                    .and_then(Tone::from_index)
                    .unwrap_or(Tone::White);
            }
        }
        best
    }
}

/// Rec. 601 luma, as used for 1-bit conversion.
pub fn luma(color: Rgb888) -> u8 {
    let weighted = 299 * u32::from(color.r()) + 587 * u32::from(color.g()) + 114 * u32::from(color.b());
    u8::try_from(weighted / 1000).unwrap_or(u8::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_index_order() {
        assert_eq!(Palette::BlackWhiteRed.color(Tone::White), Rgb888::WHITE);
        assert_eq!(Palette::BlackWhiteRed.color(Tone::Black), Rgb888::BLACK);
        assert_eq!(Palette::BlackWhiteRed.color(Tone::Accent), Rgb888::RED);
        assert_eq!(Palette::BlackWhiteYellow.color(Tone::Accent), Rgb888::YELLOW);
    }

    #[test]
    fn test_accent_falls_back_to_black() {
        assert_eq!(Palette::BlackWhite.color(Tone::Accent), Rgb888::BLACK);
        assert!(!Palette::BlackWhite.has_accent());
    }

    #[test]
    fn test_nearest() {
        let p = Palette::BlackWhiteRed;
        assert_eq!(p.nearest(Rgb888::new(250, 10, 5)), Tone::Accent);
        assert_eq!(p.nearest(Rgb888::new(20, 20, 20)), Tone::Black);
        assert_eq!(p.nearest(Rgb888::new(240, 240, 240)), Tone::White);
        // red has no slot on a two-ink panel and lands on black
        assert_eq!(Palette::BlackWhite.nearest(Rgb888::RED), Tone::Black);
    }

    #[test]
    fn test_for_ink() {
        assert_eq!(Palette::for_ink(InkColor::Yellow), Palette::BlackWhiteYellow);
        assert_eq!(Palette::for_ink(InkColor::Black), Palette::BlackWhite);
    }

    #[test]
    fn test_luma() {
        assert_eq!(luma(Rgb888::WHITE), 255);
        assert_eq!(luma(Rgb888::BLACK), 0);
        assert!(luma(Rgb888::RED) < 128);
        assert!(luma(Rgb888::YELLOW) > 128);
    }
}
