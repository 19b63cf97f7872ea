//! The owning chart instance.

use crate::{
    config::{ChartConfig, OptionsUpdate},
    error::ChartError,
    hit,
    input::Gesture,
    mapper::{CoordinateMapper, Geometry},
    range::{RangePolicy, RangeSpec, volume_range},
    scene::{Point, Scene, SceneContext},
    stats::{DerivedSeries, PriceInfo, StatsEngine},
    store::DataStore,
    tick::{RawTick, Tick},
    viewport::{Viewport, VisibleRange},
};
use tracing::{debug, warn};

/// Streaming intraday chart: bounded tick window, statistics, ranges, viewport and hover state.
///
/// Every mutation is fully applied before it returns. Hosts call [`FenshiChart::scene`] to
/// obtain something to paint.
#[derive(Debug, Clone)]
pub struct FenshiChart {
    config: ChartConfig,
    geometry: Geometry,
    store: DataStore,
    stats: StatsEngine,
    viewport: Viewport,
    price_range: RangeSpec,
    volume_range: RangeSpec,
    hovered: Option<usize>,
    pointer_over: bool,
    pointer: Option<Point>,
}

impl Default for FenshiChart {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

impl FenshiChart {
    pub fn new(config: ChartConfig) -> Self {
        let geometry = Geometry::from(&config);
        let viewport = Viewport::new(
            config.bar_width,
            config.bar_spacing,
            config.right_offset,
            geometry.plot_width(),
        );
        let mut stats = StatsEngine::new();
        stats.reset(config.initial_price);

        let mut chart = Self {
            store: DataStore::new(config.max_data_points),
            config,
            geometry,
            stats,
            viewport,
            price_range: RangeSpec::default(),
            volume_range: RangeSpec::default(),
            hovered: None,
            pointer_over: false,
            pointer: None,
        };
        chart.refresh_ranges();
        chart
    }

    /// Replace all data. Statistics restart and the viewport is pinned.
    pub fn set_initial_data(&mut self, ticks: impl IntoIterator<Item = Tick>) {
        self.store.replace(ticks);
        self.stats.reset(self.config.initial_price);
        self.stats.rebuild(&self.store);
        self.viewport.set_len(self.store.len());
        self.hovered = None;
        self.refresh_ranges();
        self.refresh_hover(false);

        debug!(len = self.store.len(), open = ?self.stats.open(), "initial data set");
    }

    pub fn add_data(&mut self, tick: Tick) {
        let evicted = self.store.append(tick).is_some();
        self.stats.on_append(&self.store, evicted);
        self.viewport.on_append(self.store.len(), evicted);
        self.refresh_ranges();
        self.refresh_hover(evicted);
    }

    /// Validate a feed record and append it. Invalid records leave the chart untouched.
    pub fn add_raw(&mut self, raw: RawTick) -> Result<(), ChartError> {
        let tick = Tick::try_from(raw).inspect_err(|error| warn!(%error, "rejected tick"))?;
        self.add_data(tick);
        Ok(())
    }

    /// Apply a partial configuration. On error nothing changes.
    pub fn update_options(&mut self, update: &OptionsUpdate) -> Result<(), ChartError> {
        let next = self.config.apply(update)?;
        debug!(?update, "options updated");
        self.reconfigure(next);
        Ok(())
    }

    /// Resize the price pane. Non-finite sizes are ignored and the plot keeps at least 1px.
    pub fn resize(&mut self, width: f64, height: f64) {
        let mut next = self.config.clone();
        if width.is_finite() {
            next.width = width.max(next.padding.left + next.padding.right + 1.0);
        }
        if height.is_finite() {
            next.height = height.max(next.padding.top + next.padding.bottom + 1.0);
        }
        self.reconfigure(next);
    }

    /// Jump to a scroll ratio, clamped into `[0, 1]`. Returns false when nothing can scroll.
    pub fn set_scroll_position(&mut self, position: f64) -> bool {
        let changed = self.viewport.set_scroll_position(position);
        if changed {
            self.refresh_hover(false);
        }
        changed
    }

    /// Set the reference open price used for change figures and the limit band.
    pub fn set_initial_price(&mut self, price: f64) -> Result<(), ChartError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(ChartError::InvalidPrice(price));
        }
        self.config.initial_price = Some(price);
        self.stats.set_open(price);
        self.refresh_ranges();
        Ok(())
    }

    /// Nearest visible tick to a price-pane local pointer position.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        hit::hit_test(&self.mapper(), x, y)
    }

    /// Apply an input gesture. Returns true when the host should redraw.
    pub fn handle(&mut self, gesture: Gesture) -> bool {
        match gesture {
            Gesture::DragDelta { dx } => self.scroll_by(dx),
            Gesture::Wheel { dx, dy, shift, pane } => {
                match Gesture::wheel_scroll(dx, dy, shift, pane) {
                    Some(delta) => self.scroll_by(delta),
                    None => false,
                }
            }
            Gesture::PointerMove { x, y, dragging } => {
                let previous = self.hovered;
                self.pointer_over = true;
                if dragging {
                    self.pointer = None;
                    self.hovered = None;
                } else {
                    self.pointer = Some(Point::new(x, y));
                    self.hovered = self.hit_test(x, y);
                }
                previous != self.hovered
            }
            Gesture::PointerEnter => {
                self.pointer_over = true;
                false
            }
            Gesture::PointerLeave => {
                self.pointer_over = false;
                self.pointer = None;
                self.hovered = None;
                true
            }
            Gesture::AxisClick { x } => {
                if !self.config.enable_scroll {
                    return false;
                }
                match hit::nearest_on_axis(&self.mapper(), x) {
                    Some(index) => {
                        self.hovered = Some(index);
                        true
                    }
                    None => false,
                }
            }
            Gesture::Resize { width, height } => {
                self.resize(width, height);
                true
            }
        }
    }

    /// Build the declarative render output for the current state.
    pub fn scene(&self) -> Scene {
        SceneContext {
            config: &self.config,
            store: &self.store,
            series: self.stats.series(),
            info: self.stats.info(),
            policy: self.policy(),
            mapper: self.mapper(),
            volume_range: self.volume_range,
            hovered: self.hovered,
            pointer_over: self.pointer_over,
        }
        .build()
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn ticks(&self) -> impl ExactSizeIterator<Item = &Tick> + DoubleEndedIterator + Clone {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn price_info(&self) -> PriceInfo {
        self.stats.info()
    }

    pub fn series(&self) -> &DerivedSeries {
        self.stats.series()
    }

    pub fn price_range(&self) -> RangeSpec {
        self.price_range
    }

    pub fn volume_range(&self) -> RangeSpec {
        self.volume_range
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.viewport.visible_range()
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered
    }

    pub fn mapper(&self) -> CoordinateMapper<'_> {
        CoordinateMapper::new(&self.geometry, &self.viewport, self.price_range, self.volume_range)
    }

    fn policy(&self) -> RangePolicy {
        RangePolicy {
            coordinate_type: self.config.coordinate_type,
            limit_percentage: self.config.limit_percentage,
            initial_price: self.config.initial_price,
        }
    }

    fn scroll_by(&mut self, dx: f64) -> bool {
        if !self.config.enable_scroll {
            return false;
        }
        let changed = self.viewport.scroll_by(dx);
        if changed {
            self.refresh_hover(false);
        }
        changed
    }

    /// Swap in a validated configuration, re-deriving whatever depends on the changed fields.
    fn reconfigure(&mut self, next: ChartConfig) {
        let previous = std::mem::replace(&mut self.config, next);
        let config = &self.config;

        if config.initial_price != previous.initial_price {
            if let Some(price) = config.initial_price {
                self.stats.set_open(price);
            }
        }

        if config.max_data_points != previous.max_data_points {
            let evicted = self.store.set_capacity(config.max_data_points);
            if evicted > 0 {
                debug!(evicted, capacity = config.max_data_points, "capacity reduced");
                self.stats.rebuild(&self.store);
                self.viewport.on_truncate(self.store.len());
                self.hovered = None;
            }
        }

        if (config.bar_width, config.bar_spacing, config.right_offset)
            != (previous.bar_width, previous.bar_spacing, previous.right_offset)
        {
            self.viewport
                .set_pitch(config.bar_width, config.bar_spacing, config.right_offset);
        }

        self.geometry = Geometry::from(config);
        if self.geometry.plot_width() != self.viewport.plot_width() {
            self.viewport.resize(self.geometry.plot_width());
        }

        if previous.enable_scroll && !config.enable_scroll {
            self.viewport.reset();
        }

        self.refresh_ranges();
        self.refresh_hover(false);
    }

    fn refresh_ranges(&mut self) {
        let info = self.stats.info();
        let data = (!self.store.is_empty()).then_some(&info);
        self.price_range = self.policy().price_range(data);
        self.volume_range = volume_range(&info);
    }

    /// Keep the hovered index pointing at a live tick after data or viewport changes.
    fn refresh_hover(&mut self, evicted: bool) {
        match self.pointer.filter(|_| self.pointer_over) {
            Some(pointer) => self.hovered = self.hit_test(pointer.x, pointer.y),
            None if evicted => self.hovered = self.hovered.and_then(|index| index.checked_sub(1)),
            None => {}
        }
        self.hovered = self.hovered.filter(|index| *index < self.store.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        input::Pane,
        range::CoordinateType,
        scene::{ColorRole, DrawCommand},
        tick::{Direction, RawNumber, RawTime},
    };
    use chrono::{TimeZone, Utc};

    fn tick(secs: i64, price: f64, volume: u64, direction: Direction) -> Tick {
        let time = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
        Tick::new(time, price, volume, direction).unwrap()
    }

    fn ramp(len: usize) -> Vec<Tick> {
        (0..len)
            .map(|i| tick(i as i64, 10.0 + (i % 7) as f64, 100 + i as u64, Direction::Buy))
            .collect()
    }

    /// 300px wide price pane: plot width 200, 100 ticks at pitch 3 overflow by 150px.
    fn scrolling_chart() -> FenshiChart {
        let mut chart = FenshiChart::new(ChartConfig {
            width: 300.0,
            max_data_points: 100,
            ..ChartConfig::default()
        });
        chart.set_initial_data(ramp(100));
        chart
    }

    fn assert_range(actual: RangeSpec, min: f64, max: f64) {
        assert!(
            (actual.min - min).abs() < 1e-9 && (actual.max - max).abs() < 1e-9,
            "{actual:?} != [{min}, {max}]"
        );
    }

    #[test]
    fn test_scenario_three_ticks() {
        let mut chart = FenshiChart::new(ChartConfig {
            max_data_points: 10,
            ..ChartConfig::default()
        });
        chart.add_data(tick(0, 10.0, 100, Direction::Neutral));
        chart.add_data(tick(1, 12.0, 50, Direction::Buy));
        chart.add_data(tick(2, 9.0, 150, Direction::Sell));

        let info = chart.price_info();
        assert_eq!(info.open, Some(10.0));
        assert_eq!((info.high, info.low, info.current), (12.0, 9.0, 9.0));
        assert_eq!(info.change, Some(-1.0));
        assert!((info.change_percent.unwrap() + 10.0).abs() < 1e-9);

        // normal mode: 9..12 padded by 0.3
        assert_range(chart.price_range(), 8.7, 12.3);
        assert_eq!(chart.volume_range(), RangeSpec::new(0.0, 150.0));
    }

    #[test]
    fn test_eviction_keeps_last_ticks() {
        let mut chart = FenshiChart::new(ChartConfig {
            max_data_points: 3,
            ..ChartConfig::default()
        });
        for (i, price) in [5.0, 7.0, 6.0, 8.0].into_iter().enumerate() {
            chart.add_data(tick(i as i64, price, 10, Direction::Neutral));
        }

        let prices: Vec<f64> = chart.ticks().map(Tick::price).collect();
        assert_eq!(prices, vec![7.0, 6.0, 8.0]);
        assert_eq!(chart.price_info().low, 6.0);
        assert_eq!(chart.price_info().high, 8.0);
        assert_eq!(chart.price_info().open, Some(5.0));
    }

    #[test]
    fn test_empty_chart() {
        let chart = FenshiChart::default();
        assert_eq!(chart.visible_range(), None);
        assert_eq!(chart.hit_test(400.0, 100.0), None);
        assert_eq!(chart.price_range(), RangeSpec::new(0.0, 0.0));

        let scene = chart.scene();
        assert_eq!(scene.info, None);
        assert_eq!(scene.crosshair, None);
        assert!(!scene.price.iter().any(|command| matches!(command, DrawCommand::Polyline { .. })));
        assert_eq!(scene.volume.len(), 1);
        assert_eq!(scene.time_axis.len(), 1);
    }

    #[test]
    fn test_add_raw_rejects_invalid() {
        let mut chart = FenshiChart::default();
        let raw = RawTick {
            time: RawTime::Millis(1_700_000_000_000),
            price: RawNumber::Text("-3".to_string()),
            volume: RawNumber::Number(10.0),
            direction: None,
        };

        assert!(matches!(chart.add_raw(raw.clone()), Err(ChartError::InvalidTick(_))));
        assert!(chart.is_empty());

        let raw = RawTick {
            price: RawNumber::Text("3.5".to_string()),
            ..raw
        };
        assert_eq!(chart.add_raw(raw), Ok(()));
        assert_eq!(chart.len(), 1);
        assert_eq!(chart.price_info().current, 3.5);
    }

    #[test]
    fn test_set_initial_data_pins_viewport() {
        let mut chart = scrolling_chart();
        chart.set_scroll_position(0.2);
        assert!(!chart.viewport().is_pinned());

        chart.set_initial_data(ramp(120));
        assert_eq!(chart.viewport().scroll_offset(), 0.0);
        assert_eq!(chart.viewport().scroll_position(), 1.0);
        assert_eq!(chart.len(), 100);
    }

    #[test]
    fn test_set_initial_price() {
        let mut chart = FenshiChart::default();
        chart.set_initial_data(ramp(10));

        assert_eq!(chart.set_initial_price(0.0), Err(ChartError::InvalidPrice(0.0)));
        assert_eq!(chart.price_info().open, Some(10.0));

        chart
            .update_options(&OptionsUpdate {
                coordinate_type: Some(CoordinateType::Limit),
                ..Default::default()
            })
            .unwrap();
        assert_range(chart.price_range(), 9.0, 11.0);

        chart.set_initial_price(20.0).unwrap();
        assert_eq!(chart.price_info().open, Some(20.0));
        assert_range(chart.price_range(), 18.0, 22.0);
    }

    #[test]
    fn test_update_options_rejects_and_keeps_state() {
        let mut chart = FenshiChart::default();
        let update = OptionsUpdate::from_json(r#"{"maxDataPoints": 0}"#).unwrap();

        assert!(chart.update_options(&update).is_err());
        assert_eq!(chart.config(), &ChartConfig::default());
    }

    #[test]
    fn test_update_options_shrinks_capacity() {
        let mut chart = scrolling_chart();
        chart
            .update_options(&OptionsUpdate {
                max_data_points: Some(40),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(chart.len(), 40);
        assert_eq!(chart.series().len(), 40);
        assert_eq!(chart.ticks().next().unwrap().time(), ramp(100)[60].time());
        // 40 ticks fit in the 200px plot
        assert_eq!(chart.visible_range(), Some(VisibleRange { first: 0, last: 39 }));
    }

    #[test]
    fn test_update_options_pitch_keeps_position() {
        let mut chart = scrolling_chart();
        chart.set_scroll_position(0.5);

        chart
            .update_options(&OptionsUpdate {
                bar_width: Some(4.0),
                ..Default::default()
            })
            .unwrap();

        // total = 100 * 5 + 50, max scroll 350
        assert_eq!(chart.viewport().scroll_position(), 0.5);
        assert_eq!(chart.viewport().scroll_offset(), 175.0);
    }

    #[test]
    fn test_disable_scroll_repins_and_ignores_gestures() {
        let mut chart = scrolling_chart();
        assert!(chart.handle(Gesture::DragDelta { dx: 60.0 }));
        assert_eq!(chart.viewport().scroll_offset(), 60.0);

        chart
            .update_options(&OptionsUpdate {
                enable_scroll: Some(false),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(chart.viewport().scroll_offset(), 0.0);
        assert_eq!(chart.viewport().scroll_position(), 1.0);

        assert!(!chart.handle(Gesture::DragDelta { dx: 60.0 }));
        assert!(!chart.handle(Gesture::Wheel {
            dx: 10.0,
            dy: 0.0,
            shift: false,
            pane: Pane::Price
        }));
        assert!(!chart.handle(Gesture::AxisClick { x: 60.0 }));
        assert_eq!(chart.viewport().scroll_offset(), 0.0);
    }

    #[test]
    fn test_wheel_gesture() {
        let mut chart = scrolling_chart();

        // Vertical wheel over the price pane is left to the host
        assert!(!chart.handle(Gesture::Wheel {
            dx: 0.0,
            dy: 30.0,
            shift: false,
            pane: Pane::Price
        }));
        assert!(chart.handle(Gesture::Wheel {
            dx: 0.0,
            dy: 30.0,
            shift: false,
            pane: Pane::TimeAxis
        }));
        assert_eq!(chart.viewport().scroll_offset(), 30.0);
    }

    #[test]
    fn test_pointer_hover_crosshair_and_tooltip() {
        let mut chart = scrolling_chart();

        assert!(chart.handle(Gesture::PointerMove {
            x: 62.0,
            y: 100.0,
            dragging: false
        }));
        assert_eq!(chart.hovered_index(), Some(4));

        let scene = chart.scene();
        let crosshair = scene.crosshair.unwrap();
        assert_eq!(crosshair.index, 4);
        assert_eq!(crosshair.x, 62.0);
        assert_eq!(crosshair.price, 14.0);
        // open 10 -> +40%
        assert_eq!(crosshair.price_label, "+40.00%");

        let tooltip = scene.tooltip.unwrap();
        assert_eq!(tooltip.volume, 104);
        assert_eq!(tooltip.amount, 14.0 * 104.0);
        assert_eq!(tooltip.change, Some(4.0));

        assert!(chart.handle(Gesture::PointerLeave));
        assert_eq!(chart.hovered_index(), None);
        assert_eq!(chart.scene().crosshair, None);
    }

    #[test]
    fn test_pointer_outside_plot_hides_crosshair() {
        let mut chart = scrolling_chart();
        chart.handle(Gesture::PointerMove {
            x: 62.0,
            y: 100.0,
            dragging: false,
        });
        chart.handle(Gesture::PointerMove {
            x: 10.0,
            y: 100.0,
            dragging: false,
        });
        assert_eq!(chart.hovered_index(), None);

        // Dragging suppresses hit-testing
        chart.handle(Gesture::PointerMove {
            x: 62.0,
            y: 100.0,
            dragging: true,
        });
        assert_eq!(chart.hovered_index(), None);
    }

    #[test]
    fn test_crosshair_disabled_keeps_tooltip() {
        let mut chart = scrolling_chart();
        chart
            .update_options(&OptionsUpdate {
                show_crosshair: Some(false),
                ..Default::default()
            })
            .unwrap();
        chart.handle(Gesture::PointerMove {
            x: 62.0,
            y: 100.0,
            dragging: false,
        });

        let scene = chart.scene();
        assert_eq!(scene.crosshair, None);
        assert_eq!(scene.tooltip.map(|tooltip| tooltip.index), Some(4));
    }

    #[test]
    fn test_axis_click_follows_tick_on_eviction() {
        let mut chart = scrolling_chart();
        assert!(chart.handle(Gesture::AxisClick { x: 62.0 }));
        assert_eq!(chart.hovered_index(), Some(4));

        // Store is full: the hovered tick shifts one index left
        chart.add_data(tick(500, 11.0, 1, Direction::Sell));
        assert_eq!(chart.hovered_index(), Some(3));

        assert!(!chart.handle(Gesture::AxisClick { x: 5.0 }));
    }

    #[test]
    fn test_resize_clamps_and_keeps_position() {
        let mut chart = scrolling_chart();
        chart.set_scroll_position(0.5);

        assert!(chart.handle(Gesture::Resize {
            width: 350.0,
            height: 400.0
        }));
        assert_eq!(chart.viewport().plot_width(), 250.0);
        assert_eq!(chart.viewport().scroll_offset(), 50.0);

        chart.resize(f64::NAN, 10.0);
        assert_eq!(chart.config().width, 350.0);
        assert_eq!(chart.config().height, 81.0);
        assert_eq!(chart.geometry().volume_height, 16.0);
    }

    #[test]
    fn test_scene_volume_bars() {
        let mut chart = FenshiChart::default();
        chart.set_initial_data(vec![
            tick(0, 10.0, 100, Direction::Buy),
            tick(1, 11.0, 200, Direction::Sell),
            tick(2, 10.5, 50, Direction::Neutral),
        ]);

        let bars: Vec<(f64, f64, ColorRole)> = chart
            .scene()
            .volume
            .into_iter()
            .filter_map(|command| match command {
                DrawCommand::Rect { x, height, fill, .. } if fill != ColorRole::Background => {
                    Some((x, height, fill))
                }
                _ => None,
            })
            .collect();

        assert_eq!(
            bars,
            vec![
                (49.0, 40.0, ColorRole::UpBar),
                (52.0, 80.0, ColorRole::DownBar),
                (55.0, 20.0, ColorRole::NeutralBar),
            ]
        );
    }

    #[test]
    fn test_scene_limit_lines_and_average_toggle() {
        let mut chart = FenshiChart::default();
        chart.set_initial_data(ramp(10));

        let count_dashed = |scene: &Scene, dash: [f64; 2]| {
            scene
                .price
                .iter()
                .filter(|command| {
                    matches!(command, DrawCommand::Line { stroke, .. } if stroke.dash == Some(dash))
                })
                .count()
        };

        assert_eq!(count_dashed(&chart.scene(), [2.0, 2.0]), 0);

        let update =
            OptionsUpdate::from_json(r#"{"coordinateType": "limit", "showAverage": false}"#)
                .unwrap();
        chart.update_options(&update).unwrap();
        let scene = chart.scene();
        assert_eq!(count_dashed(&scene, [2.0, 2.0]), 3);

        let polylines = scene
            .price
            .iter()
            .filter(|command| matches!(command, DrawCommand::Polyline { .. }))
            .count();
        assert_eq!(polylines, 1);
        assert!(scene.info.is_some());
    }

    fn three_tick_chart(update: OptionsUpdate) -> FenshiChart {
        let mut chart = FenshiChart::new(ChartConfig::default().apply(&update).unwrap());
        chart.add_data(tick(0, 10.0, 100, Direction::Neutral));
        chart.add_data(tick(1, 12.0, 50, Direction::Buy));
        chart.add_data(tick(2, 9.0, 150, Direction::Sell));
        chart
    }

    /// Price-pane labels at `x`, top to bottom.
    fn labels_at(scene: &Scene, x: f64) -> Vec<(String, ColorRole)> {
        scene
            .price
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text {
                    x: label_x,
                    text,
                    color,
                    ..
                } if (*label_x - x).abs() < 1e-9 => Some((text.clone(), *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_scene_grid_lines_and_labels() {
        let chart = three_tick_chart(OptionsUpdate {
            grid_lines: Some(4),
            ..OptionsUpdate::default()
        });
        let scene = chart.scene();
        let geometry = chart.geometry();

        let horizontal_grid = scene
            .price
            .iter()
            .filter(|command| {
                matches!(command, DrawCommand::Line { from, to, color: ColorRole::Grid, .. }
                    if from.y == to.y)
            })
            .count();
        assert_eq!(horizontal_grid, 5);

        // Range 8.7..12.3 split into four steps of 0.9
        let left = labels_at(&scene, geometry.padding.left - 5.0);
        let left_text: Vec<&str> = left.iter().map(|(text, _)| text.as_str()).collect();
        assert_eq!(left_text, vec!["12.30", "11.40", "10.50", "9.60", "8.70"]);
        assert!(left.iter().all(|(_, color)| *color == ColorRole::Text));

        // Change from the 10.0 open
        let right = labels_at(&scene, geometry.plot_right() + 5.0);
        assert_eq!(
            right,
            vec![
                ("+23.00%".to_string(), ColorRole::UpBar),
                ("+14.00%".to_string(), ColorRole::UpBar),
                ("+5.00%".to_string(), ColorRole::UpBar),
                ("-4.00%".to_string(), ColorRole::DownBar),
                ("-13.00%".to_string(), ColorRole::DownBar),
            ]
        );
    }

    #[test]
    fn test_scene_hides_right_labels_and_info() {
        struct TestCase {
            update: OptionsUpdate,
            right_labels: usize,
            info: bool,
        }

        let tests = vec![
            TestCase {
                // TC0: defaults
                update: OptionsUpdate::default(),
                right_labels: 6,
                info: true,
            },
            TestCase {
                // TC1: right change labels off
                update: OptionsUpdate {
                    show_right_price: Some(false),
                    ..OptionsUpdate::default()
                },
                right_labels: 0,
                info: true,
            },
            TestCase {
                // TC2: info summary off
                update: OptionsUpdate {
                    info_bar_enabled: Some(false),
                    ..OptionsUpdate::default()
                },
                right_labels: 6,
                info: false,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let chart = three_tick_chart(test.update);
            let scene = chart.scene();
            let right = labels_at(&scene, chart.geometry().plot_right() + 5.0);

            assert_eq!(right.len(), test.right_labels, "TC{} failed", index);
            assert_eq!(scene.info.is_some(), test.info, "TC{} failed", index);
            assert_eq!(labels_at(&scene, 45.0).len(), 6, "TC{} failed", index);
        }
    }
}
