//! Deterministic synthetic tick walk for demos and tests.

use crate::{
    error::ChartError,
    tick::{Direction, Tick},
};
use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

const MIN_PRICE: f64 = 1.0;
const MIN_VOLUME: u64 = 1_000;
const MAX_VOLUME: u64 = 11_000;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct MockSpec {
    pub points: usize,
    pub start_time: DateTime<Utc>,
    pub start_price: f64,
    pub seed: u64,
}

/// Endless seeded random walk, one tick per second.
///
/// Each step moves the price by `U(-1, 1)`, floored at 1. Volume is drawn from
/// `[1000, 11000)`. Direction follows the price move.
#[derive(Debug, Clone)]
pub struct MockWalk {
    rng: StdRng,
    time: DateTime<Utc>,
    price: f64,
}

impl MockWalk {
    pub fn new(start_time: DateTime<Utc>, start_price: f64, seed: u64) -> Result<Self, ChartError> {
        if !start_price.is_finite() || start_price <= 0.0 {
            return Err(ChartError::InvalidPrice(start_price));
        }
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            time: start_time,
            price: start_price,
        })
    }

    pub fn next_tick(&mut self) -> Tick {
        let step: f64 = self.rng.random_range(-1.0..1.0);
        let price = (self.price + step).max(MIN_PRICE);
        let volume = self.rng.random_range(MIN_VOLUME..MAX_VOLUME);

        let direction = if price > self.price {
            Direction::Buy
        } else if price < self.price {
            Direction::Sell
        } else {
            Direction::Neutral
        };

        let tick = Tick::from_parts(self.time, price, volume, direction);
        self.price = price;
        self.time += TimeDelta::seconds(1);
        tick
    }
}

impl Iterator for MockWalk {
    type Item = Tick;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_tick())
    }
}

/// Generate `spec.points` ticks starting at `spec.start_time`.
pub fn generate_walk(spec: MockSpec) -> Result<Vec<Tick>, ChartError> {
    Ok(MockWalk::new(spec.start_time, spec.start_price, spec.seed)?
        .take(spec.points)
        .collect())
}
