//! Filled shapes drawn onto images.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};

use crate::image::Image;
use crate::palette::Tone;

/// Direction a triangle's apex points, as a counter-clockwise rotation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Apex at the top (0°)
    #[default]
    Up,
    /// Apex to the left (90°)
    Left,
    /// Apex at the bottom (180°)
    Down,
    /// Apex to the right (270°)
    Right,
}

impl Orientation {
    /// Rotation in degrees, counter-clockwise from [`Orientation::Up`].
    pub const fn degrees(self) -> i32 {
        match self {
            Orientation::Up => 0,
            Orientation::Left => 90,
            Orientation::Down => 180,
            Orientation::Right => 270,
        }
    }
}

impl From<Orientation> for i32 {
    fn from(orientation: Orientation) -> Self {
        orientation.degrees()
    }
}

/// Fills a closed polygon (even-odd rule, sampled at pixel centres) and
/// strokes its outline one pixel wide.
pub(crate) fn fill_polygon(image: &mut Image, points: &[Point], tone: Tone) {
    if points.len() < 2 {
        return;
    }
    let height = image.size().height;
    let edges: Vec<(Point, Point)> = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
        .collect();

    let mut crossings: Vec<f64> = Vec::with_capacity(edges.len());
    for row in 0..height {
        let yc = f64::from(row) + 0.5;
        crossings.clear();
        for (a, b) in &edges {
            let (ay, by) = (f64::from(a.y), f64::from(b.y));
            if (ay <= yc && yc < by) || (by <= yc && yc < ay) {
                let t = (yc - ay) / (by - ay);
                crossings.push(f64::from(a.x) + t * f64::from(b.x - a.x));
            }
        }
        crossings.sort_by(|l, r| l.total_cmp(r));

        for span in crossings.chunks_exact(2) {
            if let [start, end] = span {
                // Pixel x is inside when its centre x + 0.5 lies in [start, end).
                let first = (start - 0.5).ceil().max(0.0);
                let last = (end - 0.5).ceil();
                let mut x = first;
                while x < last {
                    // SAFETY: x is non-negative and below the polygon's extent,
                    // which lies within i32 coordinates.
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    image.set_tone(x as u32, row, tone);
                    x += 1.0;
                }
            }
        }
    }

    let color = image
        .palette()
        .unwrap_or_default()
        .color(tone);
    for (a, b) in edges {
        // Image's DrawTarget is infallible.
        let _ = Line::new(a, b)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut *image);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::palette::Palette;

    #[test]
    fn test_orientation_degrees() {
        assert_eq!(Orientation::Up.degrees(), 0);
        assert_eq!(i32::from(Orientation::Left), 90);
        assert_eq!(Orientation::Down.degrees(), 180);
        assert_eq!(Orientation::Right.degrees(), 270);
    }

    #[test]
    fn test_fill_rectangle_polygon() {
        let mut image = Image::blank(Size::new(6, 6), Palette::BlackWhite);
        let square = [
            Point::new(1, 1),
            Point::new(4, 1),
            Point::new(4, 4),
            Point::new(1, 4),
        ];
        fill_polygon(&mut image, &square, Tone::Black);
        // interior 3x3 plus the outline on the right/bottom edges gives 4x4
        assert_eq!(image.count(Tone::Black), 16);
        assert_eq!(image.tone_at(0, 0), Some(Tone::White));
        assert_eq!(image.tone_at(5, 5), Some(Tone::White));
    }

    #[test]
    fn test_degenerate_polygon_draws_nothing() {
        let mut image = Image::blank(Size::new(3, 3), Palette::BlackWhite);
        fill_polygon(&mut image, &[Point::new(1, 1)], Tone::Black);
        assert_eq!(image.count(Tone::Black), 0);
    }
}
