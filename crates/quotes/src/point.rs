use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One price at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// When the price was observed (or the day it closed at)
    pub timestamp: DateTime<Utc>,
    /// Price in the configured currency
    pub price: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Prices in chronological order (oldest first) unless stated otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// The points
    pub points: Vec<Point>,
}

impl Series {
    /// Wraps a list of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last point in the series.
    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// The trailing `n` points.
    pub fn tail(&self, n: usize) -> &[Point] {
        let start = self.points.len().saturating_sub(n);
        self.points.get(start..).unwrap_or_default()
    }

    /// Prices only, in series order.
    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }

    /// Multiplies every price by `rate`.
    pub fn scale(mut self, rate: f64) -> Self {
        for point in &mut self.points {
            point.price *= rate;
        }
        self
    }
}

impl From<Vec<Point>> for Series {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}
