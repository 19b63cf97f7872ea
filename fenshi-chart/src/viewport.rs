//! Fixed-pitch horizontal layout and scroll state.
//!
//! Every retained tick occupies one column of `point_width` pixels in a virtual strip of
//! `total_width` pixels. The plot shows a `plot_width` slice of that strip starting at
//! `scroll_offset`. `scroll_position` is the same state expressed as a ratio, 1.0 being the
//! pinned (auto-following) end and 0.0 the fully scrolled end.

use serde::Serialize;
use std::ops::RangeInclusive;

/// Scroll position at or above which the viewport follows new data.
pub const PINNED_THRESHOLD: f64 = 0.99;

/// Inclusive range of tick indices currently inside the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleRange {
    pub first: usize,
    pub last: usize,
}

impl VisibleRange {
    /// Number of visible ticks (never zero).
    pub fn count(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    bar_width: f64,
    bar_spacing: f64,
    right_offset: f64,
    plot_width: f64,
    len: usize,
    scroll_offset: f64,
    scroll_position: f64,
}

impl Viewport {
    pub fn new(bar_width: f64, bar_spacing: f64, right_offset: f64, plot_width: f64) -> Self {
        Self {
            bar_width,
            bar_spacing,
            right_offset,
            plot_width: plot_width.max(0.0),
            len: 0,
            scroll_offset: 0.0,
            scroll_position: 1.0,
        }
    }

    pub fn bar_width(&self) -> f64 {
        self.bar_width
    }

    /// Horizontal distance between consecutive ticks.
    pub fn point_width(&self) -> f64 {
        self.bar_width + self.bar_spacing
    }

    /// Width of the whole virtual strip, including the trailing `right_offset` whitespace.
    pub fn total_width(&self) -> f64 {
        self.len as f64 * self.point_width() + self.right_offset
    }

    pub fn plot_width(&self) -> f64 {
        self.plot_width
    }

    pub fn max_scroll(&self) -> f64 {
        (self.total_width() - self.plot_width).max(0.0)
    }

    /// Check if the strip overflows the plot (the offset only applies in that case).
    pub fn is_scrollable(&self) -> bool {
        self.total_width() > self.plot_width
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    /// Check if the viewport is following new data.
    pub fn is_pinned(&self) -> bool {
        self.scroll_position >= PINNED_THRESHOLD
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Virtual x of tick `index` before scrolling and padding.
    pub fn virtual_x(&self, index: usize) -> f64 {
        index as f64 * self.point_width()
    }

    /// Horizontal shift applied to virtual x when projecting to the screen.
    pub fn applied_offset(&self) -> f64 {
        if self.is_scrollable() {
            self.scroll_offset
        } else {
            0.0
        }
    }

    /// Pin to the default state (`offset = 0`, `position = 1`).
    pub fn reset(&mut self) {
        self.scroll_offset = 0.0;
        self.scroll_position = 1.0;
    }

    /// Replace the data length wholesale (initial data load) and pin.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.reset();
    }

    /// Scroll by a pixel delta. Returns false (and leaves state untouched) if nothing can scroll.
    pub fn scroll_by(&mut self, dx: f64) -> bool {
        let max_scroll = self.max_scroll();
        if max_scroll <= 0.0 || !dx.is_finite() {
            return false;
        }

        let offset = (self.scroll_offset + dx).clamp(0.0, max_scroll);
        if offset == self.scroll_offset {
            return false;
        }

        self.scroll_offset = offset;
        self.scroll_position = 1.0 - offset / max_scroll;
        true
    }

    /// Jump to an absolute scroll ratio, clamped into `[0, 1]`.
    pub fn set_scroll_position(&mut self, position: f64) -> bool {
        let max_scroll = self.max_scroll();
        if max_scroll <= 0.0 {
            return false;
        }

        let position = if position.is_nan() { 1.0 } else { position.clamp(0.0, 1.0) };
        self.scroll_position = position;
        self.scroll_offset = max_scroll * (1.0 - position);
        true
    }

    /// New plot width: keeps the logical scroll position, not the pixel offset.
    pub fn resize(&mut self, plot_width: f64) {
        self.plot_width = plot_width.max(0.0);
        self.rederive_offset();
    }

    /// New pitch geometry; handled like a resize.
    pub fn set_pitch(&mut self, bar_width: f64, bar_spacing: f64, right_offset: f64) {
        self.bar_width = bar_width;
        self.bar_spacing = bar_spacing;
        self.right_offset = right_offset;
        self.rederive_offset();
    }

    /// Account for one appended tick.
    ///
    /// A pinned viewport stays pinned. Otherwise the pixel offset is kept, except that each
    /// eviction moves it back one column so the same ticks stay on screen.
    pub fn on_append(&mut self, len: usize, evicted: bool) {
        self.len = len;

        if self.is_pinned() {
            self.reset();
            return;
        }

        if evicted {
            self.scroll_offset = (self.scroll_offset - self.point_width()).max(0.0);
        }

        let max_scroll = self.max_scroll();
        if max_scroll > 0.0 {
            self.scroll_offset = self.scroll_offset.min(max_scroll);
            self.scroll_position = 1.0 - self.scroll_offset / max_scroll;
        } else {
            self.reset();
        }
    }

    /// Account for `len` shrinking without a scroll-state reset (capacity reduced).
    pub fn on_truncate(&mut self, len: usize) {
        self.len = len;
        self.rederive_offset();
    }

    fn rederive_offset(&mut self) {
        let max_scroll = self.max_scroll();
        if max_scroll > 0.0 {
            self.scroll_offset = max_scroll * (1.0 - self.scroll_position);
        } else {
            self.reset();
        }
    }

    /// Indices inside the plot, `None` when there is no data.
    pub fn visible_range(&self) -> Option<VisibleRange> {
        if self.len == 0 {
            return None;
        }
        let last_index = self.len - 1;

        if !self.is_scrollable() {
            return Some(VisibleRange {
                first: 0,
                last: last_index,
            });
        }

        let point_width = self.point_width();
        let first = (self.scroll_offset / point_width).floor() as usize;
        let count = (self.plot_width / point_width).ceil() as usize;
        let first = first.min(last_index);
        let last = last_index.min(first.saturating_add(count)).max(first);

        Some(VisibleRange { first, last })
    }
}
