//! Pixel geometry and the data-to-screen transforms.

use crate::{
    config::{ChartConfig, Padding},
    range::RangeSpec,
    viewport::Viewport,
};
use serde::Serialize;

/// Pane sizes in pixels. Each pane has its own local origin at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub volume_height: f64,
    pub time_axis_height: f64,
}

impl Geometry {
    pub fn plot_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    /// Price-pane y of the plot's bottom edge.
    pub fn plot_bottom(&self) -> f64 {
        self.height - self.padding.bottom
    }

    /// Price-pane x of the plot's right edge.
    pub fn plot_right(&self) -> f64 {
        self.width - self.padding.right
    }

    pub fn plot_middle(&self) -> f64 {
        self.padding.top + self.plot_height() / 2.0
    }
}

impl From<&ChartConfig> for Geometry {
    fn from(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            padding: config.padding,
            volume_height: config.volume_height(),
            time_axis_height: config.time_axis_height,
        }
    }
}

/// Stateless transforms over the current geometry, ranges and viewport.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper<'a> {
    geometry: &'a Geometry,
    viewport: &'a Viewport,
    price_range: RangeSpec,
    volume_range: RangeSpec,
}

impl<'a> CoordinateMapper<'a> {
    pub fn new(
        geometry: &'a Geometry,
        viewport: &'a Viewport,
        price_range: RangeSpec,
        volume_range: RangeSpec,
    ) -> Self {
        Self {
            geometry,
            viewport,
            price_range,
            volume_range,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        self.geometry
    }

    pub fn viewport(&self) -> &Viewport {
        self.viewport
    }

    pub fn price_range(&self) -> RangeSpec {
        self.price_range
    }

    /// Price-pane y for `price`. A flat range maps every price to the plot's vertical middle.
    pub fn price_to_y(&self, price: f64) -> f64 {
        let range = self.price_range;
        if range.is_flat() {
            return self.geometry.plot_middle();
        }
        self.geometry.plot_bottom()
            - (price - range.min) / range.span() * self.geometry.plot_height()
    }

    /// Inverse of [`Self::price_to_y`]. A flat range maps every y to `min`.
    pub fn y_to_price(&self, y: f64) -> f64 {
        let range = self.price_range;
        let plot_height = self.geometry.plot_height();
        if range.is_flat() || plot_height <= 0.0 {
            return range.min;
        }
        range.min + (self.geometry.plot_bottom() - y) / plot_height * range.span()
    }

    /// Screen x of tick `index`, shared by all panes.
    pub fn index_to_screen_x(&self, index: usize) -> f64 {
        self.viewport.virtual_x(index) - self.viewport.applied_offset() + self.geometry.padding.left
    }

    /// Bar height inside the volume pane.
    pub fn volume_to_height(&self, volume: u64) -> f64 {
        let max = self.volume_range.max;
        if max <= 0.0 {
            return 0.0;
        }
        volume as f64 / max * self.geometry.volume_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> Geometry {
        Geometry::from(&ChartConfig::default())
    }

    #[test]
    fn test_geometry_from_default_config() {
        let geometry = geometry();
        assert_eq!(geometry.plot_width(), 700.0);
        assert_eq!(geometry.plot_height(), 320.0);
        assert_eq!(geometry.plot_bottom(), 340.0);
        assert_eq!(geometry.plot_right(), 750.0);
        assert_eq!(geometry.volume_height, 80.0);
    }

    #[test]
    fn test_price_to_y() {
        let geometry = geometry();
        let viewport = Viewport::new(2.0, 1.0, 50.0, geometry.plot_width());
        let mapper = CoordinateMapper::new(
            &geometry,
            &viewport,
            RangeSpec::new(10.0, 20.0),
            RangeSpec::new(0.0, 100.0),
        );

        assert_eq!(mapper.price_to_y(10.0), 340.0);
        assert_eq!(mapper.price_to_y(20.0), 20.0);
        assert_eq!(mapper.price_to_y(15.0), 180.0);
        assert!((mapper.y_to_price(mapper.price_to_y(12.5)) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_flat_range_maps_to_middle() {
        let geometry = geometry();
        let viewport = Viewport::new(2.0, 1.0, 50.0, geometry.plot_width());
        let mapper = CoordinateMapper::new(
            &geometry,
            &viewport,
            RangeSpec::new(10.0, 10.0),
            RangeSpec::default(),
        );

        assert_eq!(mapper.price_to_y(10.0), 180.0);
        assert_eq!(mapper.price_to_y(99.0), 180.0);
        assert_eq!(mapper.y_to_price(0.0), 10.0);
        assert_eq!(mapper.volume_to_height(500), 0.0);
    }

    #[test]
    fn test_index_to_screen_x_applies_offset_only_when_scrollable() {
        let geometry = Geometry {
            width: 300.0,
            ..geometry()
        };

        // plot width 200, 100 ticks at pitch 3: scrollable
        let mut viewport = Viewport::new(2.0, 1.0, 50.0, geometry.plot_width());
        viewport.set_len(100);
        viewport.set_scroll_position(0.5);
        let mapper = CoordinateMapper::new(
            &geometry,
            &viewport,
            RangeSpec::default(),
            RangeSpec::default(),
        );
        assert_eq!(mapper.index_to_screen_x(25), 50.0);
        assert_eq!(mapper.index_to_screen_x(30), 65.0);

        // 10 ticks fit: offset ignored
        let mut viewport = Viewport::new(2.0, 1.0, 50.0, geometry.plot_width());
        viewport.set_len(10);
        let mapper = CoordinateMapper::new(
            &geometry,
            &viewport,
            RangeSpec::default(),
            RangeSpec::default(),
        );
        assert_eq!(mapper.index_to_screen_x(0), 50.0);
        assert_eq!(mapper.index_to_screen_x(9), 77.0);
    }

    #[test]
    fn test_volume_to_height() {
        let geometry = geometry();
        let viewport = Viewport::new(2.0, 1.0, 50.0, geometry.plot_width());
        let mapper = CoordinateMapper::new(
            &geometry,
            &viewport,
            RangeSpec::default(),
            RangeSpec::new(0.0, 200.0),
        );

        assert_eq!(mapper.volume_to_height(200), 80.0);
        assert_eq!(mapper.volume_to_height(50), 20.0);
        assert_eq!(mapper.volume_to_height(0), 0.0);
    }
}
