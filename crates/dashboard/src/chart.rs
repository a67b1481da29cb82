//! Price chart leaf.
//!
//! A small line chart drawn straight onto a palette image: a left and a
//! bottom axis, a few y tick labels, day/month labels under the first,
//! middle and last points, and a one-pixel polyline in the accent ink.

use std::borrow::Cow;

use eink_layout::container::Node;
use eink_layout::element::Element;
use eink_layout::error::LayoutError;
use eink_paint::error::PaintError;
use eink_paint::font::Font;
use eink_paint::graphic::{Graphic, Leaf};
use eink_paint::image::Image;
use eink_paint::painter::Painter;
use eink_paint::palette::Tone;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, Polyline, PrimitiveStyle, Rectangle};
use quotes::Point as Quote;

const TICK_LENGTH: u32 = 2;
const LABEL_GAP: u32 = 1;

/// Formats y-axis tick values for a series whose largest price is `max`.
///
/// Above 999 values are shown in whole thousands (`12K`); below 1 with two
/// decimals and no leading zero (`.25`); otherwise rounded to whole units,
/// or two decimals when the range is too narrow for whole units to differ.
pub fn tick_label(value: f64, min: f64, max: f64) -> String {
    if max > 999.0 {
        // SAFETY: truncation toward zero is the intended thousands label.
        #[allow(clippy::cast_possible_truncation)]
        let thousands = (value / 1000.0) as i64;
        format!("{thousands}K")
    } else if max < 1.0 {
        let label = format!("{value:.2}");
        match label.strip_prefix('0') {
            Some(stripped) => stripped.to_owned(),
            None => label.replacen("-0.", "-.", 1),
        }
    } else if max - min >= 2.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Day/month label (`7/3`).
pub fn date_label(point: &Quote) -> String {
    point.timestamp.format("%-d/%-m").to_string()
}

/// Rendered chart.
#[derive(Debug, Clone)]
pub struct Chart {
    image: Image,
    points: usize,
}

impl Chart {
    /// Plots `points` (oldest first) onto a `size` canvas.
    pub fn plot(
        painter: &dyn Painter,
        size: Size,
        points: &[Quote],
        font: &Font,
        px: f32,
    ) -> Self {
        let mut image = painter.canvas(size);
        let palette = painter.palette();
        let ink = palette.color(Tone::Black);

        let (min, max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.price), hi.max(p.price))
        });
        let ticks: Vec<f64> = if points.is_empty() {
            Vec::new()
        } else if (max - min).abs() < f64::EPSILON {
            vec![max]
        } else {
            vec![max, (min + max) / 2.0, min]
        };

        let y_labels: Vec<Image> = ticks
            .iter()
            .map(|&v| painter.text(&tick_label(v, min, max), font, px).image().clone())
            .collect();
        let x_labels: Vec<(usize, Image)> = label_indices(points.len())
            .into_iter()
            .filter_map(|i| points.get(i).map(|p| (i, painter.text(&date_label(p), font, px))))
            .map(|(i, text)| (i, text.image().clone()))
            .collect();

        let label_width = y_labels.iter().map(|l| l.size().width).max().unwrap_or(0);
        let label_height = x_labels.iter().map(|(_, l)| l.size().height).max().unwrap_or(0);

        let axis_x = label_width.saturating_add(LABEL_GAP).saturating_add(TICK_LENGTH);
        let axis_y = size
            .height
            .saturating_sub(label_height)
            .saturating_sub(LABEL_GAP)
            .saturating_sub(1);
        let area = PlotArea {
            left: axis_x.saturating_add(1),
            top: 0,
            right: size.width.saturating_sub(1),
            bottom: axis_y.saturating_sub(1),
        };
        tracing::debug!(
            width = size.width,
            height = size.height,
            points = points.len(),
            axis_x,
            axis_y,
            "plotting chart"
        );

        let (ax, ay) = (to_i32(axis_x), to_i32(axis_y));
        let axis = PrimitiveStyle::with_stroke(ink, 1);
        // Image's DrawTarget is infallible.
        let _ = Line::new(Point::new(ax, 0), Point::new(ax, ay))
            .into_styled(axis)
            .draw(&mut image);
        let _ = Line::new(Point::new(ax, ay), Point::new(to_i32(size.width), ay))
            .into_styled(axis)
            .draw(&mut image);

        for (value, label) in ticks.iter().zip(&y_labels) {
            let y = area.y_of(*value, min, max);
            let tick_start = ax.saturating_sub(to_i32(TICK_LENGTH));
            image.fill(
                Rectangle::new(Point::new(tick_start, y), Size::new(TICK_LENGTH, 1)),
                Tone::Black,
            );
            let half = to_i32(label.size().height / 2);
            let top = y.saturating_sub(half).clamp(0, to_i32(size.height.saturating_sub(label.size().height)));
            let left = tick_start
                .saturating_sub(to_i32(LABEL_GAP))
                .saturating_sub(to_i32(label.size().width));
            image.paste(label, Point::new(left, top), None);
        }

        let mut next_free = 0i32;
        for (index, label) in &x_labels {
            let x = area.x_of(*index, points.len());
            let width = to_i32(label.size().width);
            let left = x
                .saturating_sub(width / 2)
                .clamp(0, to_i32(size.width).saturating_sub(width).max(0));
            if left < next_free {
                continue;
            }
            image.paste(label, Point::new(left, ay.saturating_add(to_i32(LABEL_GAP)).saturating_add(1)), None);
            next_free = left.saturating_add(width).saturating_add(2);
        }

        let vertices: Vec<Point> = points
            .iter()
            .enumerate()
            .map(|(i, p)| Point::new(area.x_of(i, points.len()), area.y_of(p.price, min, max)))
            .collect();
        let line = PrimitiveStyle::with_stroke(palette.color(Tone::Accent), 1);
        match vertices.as_slice() {
            [] => {}
            [single] => image.fill(Rectangle::new(*single, Size::new(1, 1)), Tone::Accent),
            _ => {
                let _ = Polyline::new(&vertices).into_styled(line).draw(&mut image);
            }
        }

        Self {
            image,
            points: points.len(),
        }
    }

    /// Number of plotted points.
    pub fn points(&self) -> usize {
        self.points
    }

    /// The rendered chart.
    pub fn image(&self) -> &Image {
        &self.image
    }
}

/// First, middle and last point (deduplicated).
fn label_indices(len: usize) -> Vec<usize> {
    match len {
        0 => Vec::new(),
        1 => vec![0],
        n => {
            let last = n.saturating_sub(1);
            let mut indices = vec![0, last / 2, last];
            indices.dedup();
            indices
        }
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

struct PlotArea {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

impl PlotArea {
    // SAFETY: every coordinate is clamped to the canvas, which is far
    // below the f64 mantissa and i32 range.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn x_of(&self, index: usize, count: usize) -> i32 {
        let span = f64::from(self.right.saturating_sub(self.left));
        let x = if count <= 1 {
            f64::from(self.left) + span / 2.0
        } else {
            f64::from(self.left) + span * index as f64 / count.saturating_sub(1) as f64
        };
        x.round() as i32
    }

    // SAFETY: as for x_of.
    #[allow(clippy::cast_possible_truncation)]
    fn y_of(&self, value: f64, min: f64, max: f64) -> i32 {
        let span = f64::from(self.bottom.saturating_sub(self.top));
        let range = max - min;
        let y = if range.abs() < f64::EPSILON || !range.is_finite() {
            f64::from(self.top) + span / 2.0
        } else {
            f64::from(self.top) + span * (max - value) / range
        };
        y.round() as i32
    }
}

impl Element for Chart {
    fn size(&self) -> Result<Size, LayoutError> {
        Ok(self.image.size())
    }
}

impl Graphic for Chart {
    fn render(&self) -> Result<Cow<'_, Image>, PaintError> {
        Ok(Cow::Borrowed(&self.image))
    }
}

impl From<Chart> for Node<Leaf> {
    fn from(chart: Chart) -> Self {
        Node::Leaf(Box::new(chart))
    }
}
