//! Bounded FIFO window of ticks.

use crate::tick::Tick;
use std::collections::VecDeque;
use tracing::debug;

/// Ring buffer holding the `capacity` most recent ticks in arrival order.
#[derive(Debug, Clone)]
pub struct DataStore {
    ticks: VecDeque<Tick>,
    capacity: usize,
}

impl DataStore {
    /// Create an empty store. A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ticks: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Discard all prior ticks and store `ticks` as given (assumed time-ascending).
    ///
    /// When more than `capacity` ticks are supplied only the newest `capacity` are kept.
    pub fn replace(&mut self, ticks: impl IntoIterator<Item = Tick>) {
        self.ticks.clear();
        self.ticks.extend(ticks);

        let excess = self.ticks.len().saturating_sub(self.capacity);
        if excess > 0 {
            debug!(
                excess,
                capacity = self.capacity,
                "initial data exceeds capacity, dropping oldest"
            );
            self.ticks.drain(..excess);
        }
    }

    /// Append a tick, evicting the oldest one first if the store is full.
    ///
    /// Returns the evicted tick, if any.
    pub fn append(&mut self, tick: Tick) -> Option<Tick> {
        let evicted = if self.ticks.len() >= self.capacity {
            self.ticks.pop_front()
        } else {
            None
        };
        self.ticks.push_back(tick);
        evicted
    }

    /// Change the capacity, evicting oldest-first until the window fits.
    ///
    /// Returns the number of evicted ticks.
    pub fn set_capacity(&mut self, capacity: usize) -> usize {
        self.capacity = capacity.max(1);
        let excess = self.ticks.len().saturating_sub(self.capacity);
        self.ticks.drain(..excess);
        excess
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tick> {
        self.ticks.get(index)
    }

    pub fn first(&self) -> Option<&Tick> {
        self.ticks.front()
    }

    pub fn last(&self) -> Option<&Tick> {
        self.ticks.back()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Tick> + DoubleEndedIterator + Clone {
        self.ticks.iter()
    }
}
