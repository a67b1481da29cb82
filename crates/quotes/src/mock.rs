//! Synthetic prices for development and tests.

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::QuoteError;
use crate::point::{Point, Series};
use crate::provider::Provider;

const NAME: &str = "MOCK";
const START: f64 = 100.0;
const JITTER: i32 = 10;

/// Provider returning a doubling price series.
///
/// The history holds one point per day ending today, starting at 200 and
/// doubling daily. The current price is the last historical price plus a
/// random whole-number jitter in `-10..=10`.
#[derive(Debug, Clone)]
pub struct Mock {
    days: u32,
    anchor: DateTime<Utc>,
    seed: Option<u64>,
}

impl Default for Mock {
    fn default() -> Self {
        Self::new(7)
    }
}

impl Mock {
    /// `days` of history ending now.
    pub fn new(days: u32) -> Self {
        Self {
            days,
            anchor: Utc::now(),
            seed: None,
        }
    }

    /// Makes the jitter reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Ends the history at `anchor` instead of now.
    pub fn with_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = anchor;
        self
    }

    /// The doubling price sequence: 200, 400, 800, ...
    pub fn prices(&self) -> Vec<f64> {
        let mut price = START;
        (0..self.days)
            .map(|_| {
                price *= 2.0;
                price
            })
            .collect()
    }

    fn jitter(&self) -> i32 {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed).gen_range(-JITTER..=JITTER),
            None => rand::thread_rng().gen_range(-JITTER..=JITTER),
        }
    }
}

impl Provider for Mock {
    fn name(&self) -> &'static str {
        NAME
    }

    fn caches_historical(&self) -> bool {
        false
    }

    async fn current(&self) -> Result<Point, QuoteError> {
        let last = self.prices().last().copied().unwrap_or(START);
        Ok(Point::new(Utc::now(), last + f64::from(self.jitter())))
    }

    async fn historical(&self) -> Result<Series, QuoteError> {
        let prices = self.prices();
        let count = prices.len();
        let points = prices
            .into_iter()
            .enumerate()
            .map(|(i, price)| {
                let back = i64::try_from(count.saturating_sub(i).saturating_sub(1)).unwrap_or(0);
                Point::new(self.anchor - TimeDelta::days(back), price)
            })
            .collect::<Vec<_>>();
        Ok(points.into())
    }
}
