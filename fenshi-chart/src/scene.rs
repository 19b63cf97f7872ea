//! Declarative render output.
//!
//! The chart never paints. [`Scene`] lists draw commands per pane in pane-local pixel
//! coordinates (origin top-left, y down), in paint order. Colours are [`ColorRole`]s that a
//! backend resolves through [`ColorTokens`].

use crate::{
    config::{ChartConfig, ColorTokens},
    format::{format_number, format_percent, format_price, format_time},
    mapper::{CoordinateMapper, Geometry},
    range::{CoordinateType, RangePolicy, RangeSpec},
    stats::{DerivedSeries, PriceInfo},
    store::DataStore,
    tick::Direction,
    viewport::VisibleRange,
};
use serde::Serialize;

const GRID_DASH: [f64; 2] = [5.0, 5.0];
const LIMIT_DASH: [f64; 2] = [2.0, 2.0];
const CROSSHAIR_DASH: [f64; 2] = [1.5, 1.5];
const LABEL_GAP: f64 = 5.0;
const AXIS_TICK_LENGTH: f64 = 5.0;
const TIME_LABEL_BOX_WIDTH: f64 = 80.0;
const PRICE_LABEL_BOX_HEIGHT: f64 = 20.0;
/// Approximate glyph advance of a 10px sans-serif label, used to size label boxes.
const GLYPH_WIDTH: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRole {
    Line,
    Average,
    Grid,
    Text,
    Background,
    UpBar,
    DownBar,
    NeutralBar,
    Crosshair,
    AreaFill,
    HighlightHalo,
    HighlightCore,
}

impl ColorRole {
    pub fn resolve<'a>(&self, tokens: &'a ColorTokens) -> &'a str {
        match self {
            ColorRole::Line => &tokens.line,
            ColorRole::Average => &tokens.average,
            ColorRole::Grid => &tokens.grid,
            ColorRole::Text => &tokens.text,
            ColorRole::Background => &tokens.background,
            ColorRole::UpBar => &tokens.up_bar,
            ColorRole::DownBar => &tokens.down_bar,
            ColorRole::NeutralBar => &tokens.neutral_bar,
            ColorRole::Crosshair => &tokens.crosshair,
            ColorRole::AreaFill => &tokens.area_fill,
            ColorRole::HighlightHalo => &tokens.highlight_halo,
            ColorRole::HighlightCore => &tokens.highlight_core,
        }
    }

    /// Up colour for non-negative moves, down colour otherwise.
    pub fn for_change(value: f64) -> Self {
        if value >= 0.0 {
            ColorRole::UpBar
        } else {
            ColorRole::DownBar
        }
    }

    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Buy => ColorRole::UpBar,
            Direction::Sell => ColorRole::DownBar,
            Direction::Neutral => ColorRole::NeutralBar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub width: f64,
    /// `[on, off]` dash lengths, solid when `None`.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    pub fn solid(width: f64) -> Self {
        Self { width, dash: None }
    }

    pub fn dashed(width: f64, dash: [f64; 2]) -> Self {
        Self {
            width,
            dash: Some(dash),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One paint operation. Text is anchored at its vertical middle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        color: ColorRole,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Point>,
        color: ColorRole,
        stroke: Stroke,
    },
    /// Closed filled polygon.
    FillPath {
        points: Vec<Point>,
        color: ColorRole,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: ColorRole,
        outline: Option<ColorRole>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: ColorRole,
        align: TextAlign,
        bold: bool,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: ColorRole,
        outline: Option<ColorRole>,
    },
}

impl DrawCommand {
    fn text(x: f64, y: f64, text: impl Into<String>, color: ColorRole, align: TextAlign) -> Self {
        DrawCommand::Text {
            x,
            y,
            text: text.into(),
            color,
            align,
            bold: false,
        }
    }

    fn line(from: Point, to: Point, color: ColorRole, stroke: Stroke) -> Self {
        DrawCommand::Line {
            from,
            to,
            color,
            stroke,
        }
    }

    fn background(width: f64, height: f64) -> Self {
        DrawCommand::Rect {
            x: 0.0,
            y: 0.0,
            width,
            height,
            fill: ColorRole::Background,
            outline: None,
        }
    }
}

/// Hovered point, for backends that draw their own crosshair decorations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrosshairTarget {
    pub index: usize,
    /// Price-pane local x, shared by all panes.
    pub x: f64,
    /// Price-pane local y of the hovered price.
    pub y: f64,
    pub price: f64,
    pub time_label: String,
    /// Change from the open at the hovered price, `--` when unavailable.
    pub price_label: String,
}

/// Info bar contents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InfoSummary {
    pub current: f64,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub last_volume: u64,
    pub open: Option<f64>,
    pub avg_price: f64,
    pub high: f64,
    pub low: f64,
}

impl From<&PriceInfo> for InfoSummary {
    fn from(info: &PriceInfo) -> Self {
        Self {
            current: info.current,
            change: info.change,
            change_percent: info.change_percent,
            last_volume: info.last_volume,
            open: info.open,
            avg_price: info.avg_price,
            high: info.high,
            low: info.low,
        }
    }
}

/// Tooltip contents for the hovered tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub index: usize,
    pub time_label: String,
    pub price: f64,
    pub avg_price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: u64,
    /// `price * volume`.
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub layout: Geometry,
    pub price: Vec<DrawCommand>,
    pub volume: Vec<DrawCommand>,
    pub time_axis: Vec<DrawCommand>,
    pub crosshair: Option<CrosshairTarget>,
    pub info: Option<InfoSummary>,
    pub tooltip: Option<TooltipContent>,
}

/// Tick indices that receive a time label and a vertical grid line.
///
/// Up to 40 visible ticks get a single label at the last one. Wider windows get 3, 4 or 5
/// labels spread evenly from the first to the last visible tick.
pub fn time_label_indices(visible: VisibleRange) -> Vec<usize> {
    let count = match visible.count() {
        0..=40 => return vec![visible.last],
        41..=60 => 3,
        61..=90 => 4,
        _ => 5,
    };

    let span = (visible.last - visible.first) as f64;
    (0..count)
        .map(|step| {
            let ratio = step as f64 / (count - 1) as f64;
            visible.first + (ratio * span).round() as usize
        })
        .collect()
}

/// Everything the builder reads, borrowed from the owning chart.
pub(crate) struct SceneContext<'a> {
    pub config: &'a ChartConfig,
    pub store: &'a DataStore,
    pub series: &'a DerivedSeries,
    pub info: PriceInfo,
    pub policy: RangePolicy,
    pub mapper: CoordinateMapper<'a>,
    pub volume_range: RangeSpec,
    pub hovered: Option<usize>,
    pub pointer_over: bool,
}

impl SceneContext<'_> {
    pub(crate) fn build(&self) -> Scene {
        let layout = *self.mapper.geometry();
        let visible = self.mapper.viewport().visible_range();
        let label_indices = visible.map(time_label_indices).unwrap_or_default();

        let mut scene = Scene {
            layout,
            price: vec![DrawCommand::background(layout.width, layout.height)],
            volume: vec![DrawCommand::background(layout.width, layout.volume_height)],
            time_axis: vec![DrawCommand::background(layout.width, layout.time_axis_height)],
            crosshair: None,
            info: None,
            tooltip: None,
        };

        self.draw_grid(&mut scene.price);
        self.draw_time_grid(&mut scene, &label_indices);
        if let Some(visible) = visible {
            self.draw_price_series(&mut scene.price, visible);
            self.draw_volume(&mut scene.volume, visible);
            self.draw_time_axis(&mut scene.time_axis, &label_indices);
        }

        let hovered = self.hovered.filter(|index| *index < self.store.len());
        if let Some(index) = hovered {
            if self.config.show_crosshair && self.pointer_over {
                scene.crosshair = self.draw_crosshair(&mut scene, index);
            }
            if self.config.tooltip_enabled {
                scene.tooltip = self.tooltip(index);
            }
        }

        if self.config.info_bar_enabled && !self.store.is_empty() {
            scene.info = Some(InfoSummary::from(&self.info));
        }

        scene
    }

    fn draw_grid(&self, out: &mut Vec<DrawCommand>) {
        let layout = self.mapper.geometry();
        let left = layout.padding.left;
        let right = layout.plot_right();
        let range = self.mapper.price_range();
        let step = range.span() / self.config.grid_lines as f64;

        for line in 0..=self.config.grid_lines {
            let price = range.max - line as f64 * step;
            let y = self.mapper.price_to_y(price);

            out.push(DrawCommand::line(
                Point::new(left, y),
                Point::new(right, y),
                ColorRole::Grid,
                Stroke::dashed(0.5, GRID_DASH),
            ));
            out.push(DrawCommand::text(
                left - LABEL_GAP,
                y,
                format_price(price),
                ColorRole::Text,
                TextAlign::Right,
            ));

            if !self.config.show_right_price {
                continue;
            }
            if let Some(percent) = self.info.percent_from_open(price) {
                out.push(DrawCommand::text(
                    right + LABEL_GAP,
                    y,
                    format_percent(Some(percent)),
                    ColorRole::for_change(percent),
                    TextAlign::Left,
                ));
            }
        }

        if self.config.coordinate_type != CoordinateType::Limit {
            return;
        }
        let (Some(reference), Some(band)) = (
            self.policy.reference_price(&self.info),
            self.policy.limit_band(&self.info),
        ) else {
            return;
        };

        for (price, color) in [
            (reference, ColorRole::Text),
            (band.max, ColorRole::UpBar),
            (band.min, ColorRole::DownBar),
        ] {
            let y = self.mapper.price_to_y(price);
            out.push(DrawCommand::line(
                Point::new(left, y),
                Point::new(right, y),
                color,
                Stroke::dashed(1.0, LIMIT_DASH),
            ));
        }
    }

    fn draw_time_grid(&self, scene: &mut Scene, label_indices: &[usize]) {
        let layout = self.mapper.geometry();
        for &index in label_indices {
            let x = self.mapper.index_to_screen_x(index);
            scene.price.push(DrawCommand::line(
                Point::new(x, layout.padding.top),
                Point::new(x, layout.plot_bottom()),
                ColorRole::Grid,
                Stroke::dashed(0.5, GRID_DASH),
            ));
            scene.volume.push(DrawCommand::line(
                Point::new(x, 0.0),
                Point::new(x, layout.volume_height),
                ColorRole::Grid,
                Stroke::dashed(0.5, GRID_DASH),
            ));
        }
    }

    fn draw_price_series(&self, out: &mut Vec<DrawCommand>, visible: VisibleRange) {
        if self.store.len() < 2 {
            return;
        }

        let points: Vec<Point> = visible
            .indices()
            .filter_map(|index| self.store.get(index).map(|tick| (index, tick.price())))
            .map(|(index, price)| {
                Point::new(self.mapper.index_to_screen_x(index), self.mapper.price_to_y(price))
            })
            .collect();

        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            let floor = self.mapper.price_to_y(self.mapper.price_range().min);
            let mut area = points.clone();
            area.push(Point::new(last.x, floor));
            area.push(Point::new(first.x, floor));
            out.push(DrawCommand::FillPath {
                points: area,
                color: ColorRole::AreaFill,
            });
        }

        out.push(DrawCommand::Polyline {
            points,
            color: ColorRole::Line,
            stroke: Stroke::solid(1.5),
        });

        if self.config.show_average {
            let points = visible
                .indices()
                .filter_map(|index| {
                    let average = self.series.average_price.get(index)?;
                    Some(Point::new(
                        self.mapper.index_to_screen_x(index),
                        self.mapper.price_to_y(*average),
                    ))
                })
                .collect();
            out.push(DrawCommand::Polyline {
                points,
                color: ColorRole::Average,
                stroke: Stroke::solid(1.5),
            });
        }
    }

    fn draw_volume(&self, out: &mut Vec<DrawCommand>, visible: VisibleRange) {
        let layout = self.mapper.geometry();
        let bar_width = self.mapper.viewport().bar_width();

        for index in visible.indices() {
            let Some(tick) = self.store.get(index) else {
                continue;
            };
            let height = self.mapper.volume_to_height(tick.volume());
            out.push(DrawCommand::Rect {
                x: self.mapper.index_to_screen_x(index) - bar_width / 2.0,
                y: layout.volume_height - height,
                width: bar_width,
                height,
                fill: ColorRole::for_direction(tick.direction()),
                outline: None,
            });
        }

        let x = layout.plot_right() + LABEL_GAP;
        out.push(DrawCommand::text(
            x,
            LABEL_GAP,
            format_number(self.volume_range.max),
            ColorRole::Text,
            TextAlign::Left,
        ));
        out.push(DrawCommand::text(
            x,
            layout.volume_height - LABEL_GAP,
            "0",
            ColorRole::Text,
            TextAlign::Left,
        ));
    }

    fn draw_time_axis(&self, out: &mut Vec<DrawCommand>, label_indices: &[usize]) {
        let layout = self.mapper.geometry();
        out.push(DrawCommand::line(
            Point::new(layout.padding.left, 0.0),
            Point::new(layout.plot_right(), 0.0),
            ColorRole::Grid,
            Stroke::solid(0.5),
        ));

        for &index in label_indices {
            let Some(tick) = self.store.get(index) else {
                continue;
            };
            let x = self.mapper.index_to_screen_x(index);
            out.push(DrawCommand::text(
                x,
                layout.time_axis_height / 2.0,
                format_time(&tick.time(), &self.config.time_format),
                ColorRole::Text,
                TextAlign::Center,
            ));
            out.push(DrawCommand::line(
                Point::new(x, 0.0),
                Point::new(x, AXIS_TICK_LENGTH),
                ColorRole::Grid,
                Stroke::dashed(0.5, GRID_DASH),
            ));
        }
    }

    fn draw_crosshair(&self, scene: &mut Scene, index: usize) -> Option<CrosshairTarget> {
        let tick = self.store.get(index)?;
        let layout = self.mapper.geometry();
        let x = self.mapper.index_to_screen_x(index);
        let y = self.mapper.price_to_y(tick.price());
        let dashed = Stroke::dashed(1.0, CROSSHAIR_DASH);

        scene.price.push(DrawCommand::line(
            Point::new(x, layout.padding.top),
            Point::new(x, layout.plot_bottom()),
            ColorRole::Crosshair,
            dashed,
        ));
        scene.volume.push(DrawCommand::line(
            Point::new(x, 0.0),
            Point::new(x, layout.volume_height),
            ColorRole::Crosshair,
            dashed,
        ));
        scene.time_axis.push(DrawCommand::line(
            Point::new(x, 0.0),
            Point::new(x, layout.time_axis_height),
            ColorRole::Crosshair,
            Stroke::solid(1.5),
        ));
        scene.price.push(DrawCommand::line(
            Point::new(layout.padding.left, y),
            Point::new(layout.plot_right(), y),
            ColorRole::Crosshair,
            dashed,
        ));

        // Change label boxed at the right plot edge
        let percent = self.info.percent_from_open(tick.price());
        let price_label = format_percent(percent);
        let label_color = percent.map_or(ColorRole::Text, ColorRole::for_change);
        scene.price.push(DrawCommand::Rect {
            x: layout.plot_right(),
            y: y - PRICE_LABEL_BOX_HEIGHT / 2.0,
            width: price_label.chars().count() as f64 * GLYPH_WIDTH + 2.0 * LABEL_GAP,
            height: PRICE_LABEL_BOX_HEIGHT,
            fill: ColorRole::Background,
            outline: Some(ColorRole::Crosshair),
        });
        scene.price.push(DrawCommand::text(
            layout.plot_right() + LABEL_GAP,
            y,
            price_label.clone(),
            label_color,
            TextAlign::Left,
        ));

        let time_label = format_time(&tick.time(), &self.config.time_format);
        scene.time_axis.push(DrawCommand::Rect {
            x: x - TIME_LABEL_BOX_WIDTH / 2.0,
            y: 0.0,
            width: TIME_LABEL_BOX_WIDTH,
            height: layout.time_axis_height,
            fill: ColorRole::Background,
            outline: None,
        });
        scene.time_axis.push(DrawCommand::Text {
            x,
            y: layout.time_axis_height / 2.0,
            text: time_label.clone(),
            color: ColorRole::Text,
            align: TextAlign::Center,
            bold: true,
        });

        scene.price.push(DrawCommand::Circle {
            center: Point::new(x, y),
            radius: 5.0,
            fill: ColorRole::HighlightHalo,
            outline: None,
        });
        scene.price.push(DrawCommand::Circle {
            center: Point::new(x, y),
            radius: 3.0,
            fill: ColorRole::HighlightCore,
            outline: Some(ColorRole::Crosshair),
        });

        Some(CrosshairTarget {
            index,
            x,
            y,
            price: tick.price(),
            time_label,
            price_label,
        })
    }

    fn tooltip(&self, index: usize) -> Option<TooltipContent> {
        let tick = self.store.get(index)?;
        Some(TooltipContent {
            index,
            time_label: format_time(&tick.time(), &self.config.time_format),
            price: tick.price(),
            avg_price: self.series.average_price.get(index).copied(),
            change: self.info.open.map(|open| tick.price() - open),
            change_percent: self.info.percent_from_open(tick.price()),
            volume: tick.volume(),
            amount: tick.amount(),
        })
    }
}
