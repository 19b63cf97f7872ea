//! Terminal cell layout and the cell <-> chart pixel mapping.

use fenshi_chart::Pane;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Chart pixels per terminal column (two braille dots).
pub const PX_PER_COL: f64 = 4.0;
/// Chart pixels per terminal row (four braille dots).
pub const PX_PER_ROW: f64 = 8.0;

const INFO_ROWS: u16 = 1;
const TIME_AXIS_ROWS: u16 = 2;
const STATUS_ROWS: u16 = 1;
const SIDE_COLS: u16 = 28;
const MIN_PRICE_ROWS: u16 = 4;

/// Screen regions of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    pub info: Rect,
    pub price: Rect,
    pub volume: Rect,
    pub time_axis: Rect,
    pub side: Rect,
    pub status: Rect,
}

impl PaneLayout {
    pub fn new(area: Rect) -> Self {
        let [main, side] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(SIDE_COLS)])
            .areas(area);

        // Volume pane is a fifth of the price pane
        let chart_rows = main
            .height
            .saturating_sub(INFO_ROWS + TIME_AXIS_ROWS + STATUS_ROWS);
        let price_rows = ((f64::from(chart_rows) / 1.2).floor() as u16).max(MIN_PRICE_ROWS);
        let volume_rows = chart_rows.saturating_sub(price_rows).max(1);

        let [info, price, volume, time_axis, status] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(INFO_ROWS),
                Constraint::Length(price_rows),
                Constraint::Length(volume_rows),
                Constraint::Length(TIME_AXIS_ROWS),
                Constraint::Length(STATUS_ROWS),
            ])
            .areas(main);

        Self {
            info,
            price,
            volume,
            time_axis,
            side,
            status,
        }
    }

    /// Price pane size in chart pixels.
    pub fn chart_size(&self) -> (f64, f64) {
        (
            f64::from(self.price.width) * PX_PER_COL,
            f64::from(self.price.height) * PX_PER_ROW,
        )
    }

    pub fn pane_at(&self, column: u16, row: u16) -> Option<Pane> {
        let contains = |rect: Rect| {
            column >= rect.x
                && column < rect.x + rect.width
                && row >= rect.y
                && row < rect.y + rect.height
        };

        if contains(self.price) {
            Some(Pane::Price)
        } else if contains(self.volume) {
            Some(Pane::Volume)
        } else if contains(self.time_axis) {
            Some(Pane::TimeAxis)
        } else {
            None
        }
    }

    /// Price-pane local x at the centre of `column`.
    pub fn chart_x(&self, column: u16) -> f64 {
        (f64::from(column) - f64::from(self.price.x) + 0.5) * PX_PER_COL
    }

    /// Price-pane local y at the centre of `row`. Rows below the price pane map past its height.
    pub fn chart_y(&self, row: u16) -> f64 {
        (f64::from(row) - f64::from(self.price.y) + 0.5) * PX_PER_ROW
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_panes() {
        let layout = PaneLayout::new(Rect::new(0, 0, 128, 40));

        assert_eq!(layout.side.width, SIDE_COLS);
        assert_eq!(layout.price.width, 100);
        // 36 chart rows: 30 price + 6 volume
        assert_eq!(layout.price.height, 30);
        assert_eq!(layout.volume.height, 6);
        assert_eq!(layout.time_axis.y, layout.volume.y + layout.volume.height);
        assert_eq!(layout.chart_size(), (400.0, 240.0));
    }

    #[test]
    fn test_pane_at_and_pixel_mapping() {
        let layout = PaneLayout::new(Rect::new(0, 0, 128, 40));

        assert_eq!(layout.pane_at(10, 1), Some(Pane::Price));
        assert_eq!(layout.pane_at(10, 31), Some(Pane::Volume));
        assert_eq!(layout.pane_at(10, 37), Some(Pane::TimeAxis));
        assert_eq!(layout.pane_at(110, 10), None);
        assert_eq!(layout.pane_at(10, 0), None);

        assert_eq!(layout.chart_x(0), 2.0);
        assert_eq!(layout.chart_y(1), 4.0);
        assert!(layout.chart_y(31) > layout.chart_size().1);
    }
}
