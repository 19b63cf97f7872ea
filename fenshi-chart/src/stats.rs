//! Running price statistics and the session VWAP series over the retained window.
//!
//! The engine must always agree with a from-scratch pass over the [`DataStore`]. Plain appends
//! are folded in O(1); an append that evicted a tick re-bases every cumulative entry, so that
//! path falls back to [`StatsEngine::rebuild`].

use crate::{store::DataStore, tick::Tick};
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

/// Summary statistics for the retained window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceInfo {
    /// Reference open price. `None` until an explicit initial price or the first tick is seen.
    pub open: Option<f64>,
    pub current: f64,
    pub high: f64,
    pub low: f64,
    /// `current - open`, unavailable without an open price.
    pub change: Option<f64>,
    /// `change / open * 100`, unavailable when the open price is unset or zero.
    pub change_percent: Option<f64>,
    /// VWAP up to the newest tick.
    pub avg_price: f64,
    pub last_volume: u64,
    /// Largest single-tick volume in the window (volume axis maximum).
    pub volume_max: u64,
}

impl PriceInfo {
    /// Percentage distance of `price` from the open, if an open price is available.
    pub fn percent_from_open(&self, price: f64) -> Option<f64> {
        percent_change(self.open?, price)
    }
}

/// `(price - open) / open * 100`, or `None` when `open` is zero or not finite.
pub fn percent_change(open: f64, price: f64) -> Option<f64> {
    if open == 0.0 || !open.is_finite() {
        return None;
    }
    Some((price - open) / open * 100.0)
}

/// Cumulative series co-indexed with the [`DataStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedSeries {
    pub cumulative_volume: Vec<u64>,
    pub cumulative_amount: Vec<f64>,
    /// VWAP up to and including each index.
    pub average_price: Vec<f64>,
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        self.average_price.len()
    }

    pub fn is_empty(&self) -> bool {
        self.average_price.is_empty()
    }

    fn clear(&mut self) {
        self.cumulative_volume.clear();
        self.cumulative_amount.clear();
        self.average_price.clear();
    }

    fn push(&mut self, tick: &Tick) {
        let volume = self
            .cumulative_volume
            .last()
            .copied()
            .unwrap_or(0)
            .saturating_add(tick.volume());
        let amount = self.cumulative_amount.last().copied().unwrap_or(0.0) + tick.amount();

        let average = if volume > 0 {
            amount / volume as f64
        } else {
            tick.price()
        };

        self.cumulative_volume.push(volume);
        self.cumulative_amount.push(amount);
        self.average_price.push(average);
    }
}

/// Running statistics over the retained ticks.
#[derive(Debug, Clone, Default)]
pub struct StatsEngine {
    open: Option<f64>,
    current: f64,
    high: f64,
    low: f64,
    last_volume: u64,
    volume_max: u64,
    series: DerivedSeries,
}

impl StatsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything, starting a new session with an optional explicit open price.
    pub fn reset(&mut self, open: Option<f64>) {
        *self = Self {
            open,
            ..Self::default()
        };
    }

    /// Override the open price (explicit initial price).
    pub fn set_open(&mut self, open: f64) {
        self.open = Some(open);
    }

    /// Recompute every statistic from scratch over `store`.
    pub fn rebuild(&mut self, store: &DataStore) {
        self.series.clear();

        let (low, high) = match store.iter().map(Tick::price).minmax() {
            MinMaxResult::NoElements => (0.0, 0.0),
            MinMaxResult::OneElement(price) => (price, price),
            MinMaxResult::MinMax(low, high) => (low, high),
        };
        self.low = low;
        self.high = high;
        self.volume_max = store.iter().map(Tick::volume).max().unwrap_or(0);

        for tick in store.iter() {
            self.series.push(tick);
        }

        match store.last() {
            Some(last) => {
                self.current = last.price();
                self.last_volume = last.volume();
            }
            None => {
                self.current = 0.0;
                self.last_volume = 0;
            }
        }

        if self.open.is_none() {
            self.open = store.first().map(Tick::price);
        }
    }

    /// Fold the newest tick of `store` into the statistics.
    ///
    /// `evicted` must report whether the append dropped the oldest tick.
    pub fn on_append(&mut self, store: &DataStore, evicted: bool) {
        let Some(tick) = store.last() else {
            return;
        };

        if evicted || self.series.len() + 1 != store.len() {
            self.rebuild(store);
            return;
        }

        if self.series.is_empty() {
            self.high = tick.price();
            self.low = tick.price();
            self.volume_max = tick.volume();
        } else {
            self.high = self.high.max(tick.price());
            self.low = self.low.min(tick.price());
            self.volume_max = self.volume_max.max(tick.volume());
        }

        self.current = tick.price();
        self.last_volume = tick.volume();
        self.series.push(tick);

        if self.open.is_none() {
            self.open = Some(tick.price());
        }
    }

    pub fn series(&self) -> &DerivedSeries {
        &self.series
    }

    pub fn open(&self) -> Option<f64> {
        self.open
    }

    /// Snapshot of the summary statistics.
    pub fn info(&self) -> PriceInfo {
        let change = self.open.filter(|_| !self.series.is_empty()).map(|open| self.current - open);
        let change_percent = self
            .open
            .filter(|_| !self.series.is_empty())
            .and_then(|open| percent_change(open, self.current));

        PriceInfo {
            open: self.open,
            current: self.current,
            high: self.high,
            low: self.low,
            change,
            change_percent,
            avg_price: self.series.average_price.last().copied().unwrap_or(0.0),
            last_volume: self.last_volume,
            volume_max: self.volume_max,
        }
    }
}
