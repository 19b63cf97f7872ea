//! Chart configuration.
//!
//! [`ChartConfig`] is an immutable value. Changes go through [`ChartConfig::apply`], which
//! validates an [`OptionsUpdate`] partial and returns the next configuration. Partials parsed
//! from JSON reject unrecognised keys.

use crate::{error::ChartError, range::CoordinateType};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Plot insets inside the price pane.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 50.0,
            bottom: 60.0,
            left: 50.0,
        }
    }
}

impl Padding {
    fn validate(&self) -> Result<(), ChartError> {
        let sides = [self.top, self.right, self.bottom, self.left];
        if sides.iter().all(|side| side.is_finite() && *side >= 0.0) {
            Ok(())
        } else {
            Err(ChartError::InvalidOptions(format!(
                "padding sides must be finite and >= 0, got {self:?}"
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl FromStr for Theme {
    type Err = std::convert::Infallible;

    /// Unrecognised themes fall back to [`Theme::Dark`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Theme::Dark,
            "light" => Theme::Light,
            other => {
                warn!(theme = other, "invalid theme, using dark");
                Theme::Dark
            }
        })
    }
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(theme) => theme,
            Err(never) => match never {},
        }
    }
}

impl From<Theme> for String {
    fn from(value: Theme) -> Self {
        value.as_str().to_string()
    }
}

/// Colour tokens handed to rendering backends. Values are CSS colour strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColorTokens {
    pub line: String,
    pub average: String,
    pub grid: String,
    pub text: String,
    pub background: String,
    /// Buy volume and positive change (red-up convention).
    pub up_bar: String,
    /// Sell volume and negative change.
    pub down_bar: String,
    pub neutral_bar: String,
    pub crosshair: String,
    pub area_fill: String,
    /// Outer ring of the hovered point marker.
    pub highlight_halo: String,
    pub highlight_core: String,
}

impl ColorTokens {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                line: "#36a2eb".to_string(),
                average: "#ffcd56".to_string(),
                grid: "#333333".to_string(),
                text: "#cccccc".to_string(),
                background: "#0e1117".to_string(),
                up_bar: "#F44336".to_string(),
                down_bar: "#4CAF50".to_string(),
                neutral_bar: "#ffffff".to_string(),
                crosshair: "rgba(255, 255, 255, 0.5)".to_string(),
                area_fill: "rgba(54, 162, 235, 0.2)".to_string(),
                highlight_halo: "rgba(255, 255, 255, 0.3)".to_string(),
                highlight_core: "#ffffff".to_string(),
            },
            Theme::Light => Self {
                line: "#2196F3".to_string(),
                average: "#FF9800".to_string(),
                grid: "#e0e0e0".to_string(),
                text: "#333333".to_string(),
                background: "#ffffff".to_string(),
                up_bar: "#F44336".to_string(),
                down_bar: "#4CAF50".to_string(),
                neutral_bar: "#D4A017".to_string(),
                crosshair: "rgba(0, 0, 0, 0.3)".to_string(),
                area_fill: "rgba(33, 150, 243, 0.2)".to_string(),
                highlight_halo: "rgba(255, 255, 255, 0.3)".to_string(),
                highlight_core: "#ffffff".to_string(),
            },
        }
    }

    /// Swap to another theme's palette, keeping the up/down colours.
    fn switch_theme(&mut self, theme: Theme) {
        let up_bar = std::mem::take(&mut self.up_bar);
        let down_bar = std::mem::take(&mut self.down_bar);
        *self = Self {
            up_bar,
            down_bar,
            ..Self::for_theme(theme)
        };
    }
}

/// Full chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    /// Price pane width in pixels.
    pub width: f64,
    /// Price pane height in pixels. The volume pane is `floor(height * 0.2)` tall.
    pub height: f64,
    pub padding: Padding,
    pub time_axis_height: f64,
    pub max_data_points: usize,
    pub coordinate_type: CoordinateType,
    pub limit_percentage: f64,
    pub initial_price: Option<f64>,
    pub bar_width: f64,
    pub bar_spacing: f64,
    pub right_offset: f64,
    pub enable_scroll: bool,
    pub show_average: bool,
    pub show_crosshair: bool,
    pub tooltip_enabled: bool,
    pub show_right_price: bool,
    pub info_bar_enabled: bool,
    pub grid_lines: usize,
    /// chrono strftime pattern for time labels.
    pub time_format: String,
    pub theme: Theme,
    pub colors: ColorTokens,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            padding: Padding::default(),
            time_axis_height: 30.0,
            max_data_points: 300,
            coordinate_type: CoordinateType::Normal,
            limit_percentage: 10.0,
            initial_price: None,
            bar_width: 2.0,
            bar_spacing: 1.0,
            right_offset: 50.0,
            enable_scroll: true,
            show_average: true,
            show_crosshair: true,
            tooltip_enabled: true,
            show_right_price: true,
            info_bar_enabled: true,
            grid_lines: 5,
            time_format: "%H:%M:%S".to_string(),
            theme: Theme::Dark,
            colors: ColorTokens::for_theme(Theme::Dark),
        }
    }
}

impl ChartConfig {
    /// Default configuration with a JSON partial applied.
    pub fn from_json(input: &str) -> Result<Self, ChartError> {
        Self::default().apply(&OptionsUpdate::from_json(input)?)
    }

    /// Validate `update` and return the resulting configuration. `self` is left untouched.
    pub fn apply(&self, update: &OptionsUpdate) -> Result<Self, ChartError> {
        let mut next = self.clone();

        if let Some(padding) = update.padding {
            padding.validate()?;
            next.padding = padding;
        }
        if let Some(width) = update.width {
            next.width = positive("width", width)?;
        }
        if let Some(height) = update.height {
            next.height = positive("height", height)?;
        }
        next.width = next.width.max(next.padding.left + next.padding.right + 1.0);
        next.height = next.height.max(next.padding.top + next.padding.bottom + 1.0);

        if let Some(height) = update.time_axis_height {
            next.time_axis_height = non_negative("timeAxisHeight", height)?;
        }
        if let Some(max_data_points) = update.max_data_points {
            if max_data_points == 0 {
                return Err(ChartError::InvalidOptions(
                    "maxDataPoints must be >= 1".to_string(),
                ));
            }
            next.max_data_points = max_data_points;
        }
        if let Some(coordinate_type) = update.coordinate_type {
            next.coordinate_type = coordinate_type;
        }
        if let Some(limit_percentage) = update.limit_percentage {
            next.limit_percentage = positive("limitPercentage", limit_percentage)?;
        }
        if let Some(initial_price) = update.initial_price {
            if !initial_price.is_finite() || initial_price <= 0.0 {
                return Err(ChartError::InvalidPrice(initial_price));
            }
            next.initial_price = Some(initial_price);
        }
        if let Some(bar_width) = update.bar_width {
            next.bar_width = positive("barWidth", bar_width)?;
        }
        if let Some(bar_spacing) = update.bar_spacing {
            next.bar_spacing = non_negative("barSpacing", bar_spacing)?;
        }
        if let Some(right_offset) = update.right_offset {
            next.right_offset = non_negative("rightOffset", right_offset)?;
        }
        if let Some(grid_lines) = update.grid_lines {
            if grid_lines == 0 {
                return Err(ChartError::InvalidOptions(
                    "gridLines must be >= 1".to_string(),
                ));
            }
            next.grid_lines = grid_lines;
        }
        if let Some(time_format) = &update.time_format {
            if StrftimeItems::new(time_format).any(|item| matches!(item, Item::Error)) {
                return Err(ChartError::InvalidOptions(format!(
                    "timeFormat '{time_format}' is not a valid strftime pattern"
                )));
            }
            next.time_format = time_format.clone();
        }

        let flags = [
            (update.enable_scroll, &mut next.enable_scroll),
            (update.show_average, &mut next.show_average),
            (update.show_crosshair, &mut next.show_crosshair),
            (update.tooltip_enabled, &mut next.tooltip_enabled),
            (update.show_right_price, &mut next.show_right_price),
            (update.info_bar_enabled, &mut next.info_bar_enabled),
        ];
        for (value, flag) in flags {
            if let Some(value) = value {
                *flag = value;
            }
        }

        if let Some(theme) = update.theme {
            if theme != next.theme {
                next.colors.switch_theme(theme);
                next.theme = theme;
            }
        }

        let overrides = [
            (&update.line_color, &mut next.colors.line),
            (&update.average_color, &mut next.colors.average),
            (&update.grid_color, &mut next.colors.grid),
            (&update.text_color, &mut next.colors.text),
            (&update.background_color, &mut next.colors.background),
            (&update.up_bar_color, &mut next.colors.up_bar),
            (&update.down_bar_color, &mut next.colors.down_bar),
            (&update.crosshair_color, &mut next.colors.crosshair),
        ];
        for (value, token) in overrides {
            if let Some(value) = value {
                token.clone_from(value);
            }
        }

        Ok(next)
    }

    /// Plot area width (price pane minus horizontal padding).
    pub fn plot_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    pub fn volume_height(&self) -> f64 {
        (self.height * 0.2).floor()
    }
}

fn positive(name: &str, value: f64) -> Result<f64, ChartError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ChartError::InvalidOptions(format!(
            "{name} must be finite and > 0, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<f64, ChartError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ChartError::InvalidOptions(format!(
            "{name} must be finite and >= 0, got {value}"
        )))
    }
}

/// Partial configuration update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct OptionsUpdate {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub padding: Option<Padding>,
    pub time_axis_height: Option<f64>,
    pub max_data_points: Option<usize>,
    pub coordinate_type: Option<CoordinateType>,
    pub limit_percentage: Option<f64>,
    pub initial_price: Option<f64>,
    pub bar_width: Option<f64>,
    pub bar_spacing: Option<f64>,
    pub right_offset: Option<f64>,
    pub enable_scroll: Option<bool>,
    pub show_average: Option<bool>,
    pub show_crosshair: Option<bool>,
    pub tooltip_enabled: Option<bool>,
    pub show_right_price: Option<bool>,
    pub info_bar_enabled: Option<bool>,
    pub grid_lines: Option<usize>,
    pub time_format: Option<String>,
    pub theme: Option<Theme>,
    pub line_color: Option<String>,
    pub average_color: Option<String>,
    pub grid_color: Option<String>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub up_bar_color: Option<String>,
    pub down_bar_color: Option<String>,
    pub crosshair_color: Option<String>,
}

impl OptionsUpdate {
    /// Parse a camelCase JSON partial. Unknown keys are rejected.
    pub fn from_json(input: &str) -> Result<Self, ChartError> {
        Ok(serde_json::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let config = ChartConfig::default();
        assert_eq!(config.plot_width(), 700.0);
        assert_eq!(config.plot_height(), 320.0);
        assert_eq!(config.volume_height(), 80.0);
    }

    #[test]
    fn test_apply_from_json() {
        let config = ChartConfig::from_json(
            r#"{"coordinateType": "limit", "limitPercentage": 5, "maxDataPoints": 120, "showAverage": false}"#,
        )
        .unwrap();

        assert_eq!(config.coordinate_type, CoordinateType::Limit);
        assert_eq!(config.limit_percentage, 5.0);
        assert_eq!(config.max_data_points, 120);
        assert!(!config.show_average);
        assert!(config.show_crosshair);
    }

    #[test]
    fn test_apply_rejects_unknown_keys() {
        let actual = ChartConfig::from_json(r#"{"averagePeriod": 20}"#);
        assert!(matches!(
            actual,
            Err(ChartError::InvalidOptions(message)) if message.contains("averagePeriod")
        ));
    }

    #[test]
    fn test_apply_unknown_coordinate_type_is_normal() {
        let base = ChartConfig {
            coordinate_type: CoordinateType::Full,
            ..ChartConfig::default()
        };
        let update = OptionsUpdate::from_json(r#"{"coordinateType": "log"}"#).unwrap();
        assert_eq!(base.apply(&update).unwrap().coordinate_type, CoordinateType::Normal);
    }

    #[test]
    fn test_apply_validation() {
        struct TestCase {
            input: OptionsUpdate,
            expected_ok: bool,
        }

        let tests = vec![
            TestCase {
                // TC0: empty update is a no-op
                input: OptionsUpdate::default(),
                expected_ok: true,
            },
            TestCase {
                // TC1: zero capacity
                input: OptionsUpdate { max_data_points: Some(0), ..Default::default() },
                expected_ok: false,
            },
            TestCase {
                // TC2: negative limit band
                input: OptionsUpdate { limit_percentage: Some(-1.0), ..Default::default() },
                expected_ok: false,
            },
            TestCase {
                // TC3: zero bar width
                input: OptionsUpdate { bar_width: Some(0.0), ..Default::default() },
                expected_ok: false,
            },
            TestCase {
                // TC4: zero spacing is fine
                input: OptionsUpdate { bar_spacing: Some(0.0), ..Default::default() },
                expected_ok: true,
            },
            TestCase {
                // TC5: non-positive initial price
                input: OptionsUpdate { initial_price: Some(0.0), ..Default::default() },
                expected_ok: false,
            },
            TestCase {
                // TC6: broken strftime pattern
                input: OptionsUpdate {
                    time_format: Some("%H:%Q".to_string()),
                    ..Default::default()
                },
                expected_ok: false,
            },
            TestCase {
                // TC7: negative padding
                input: OptionsUpdate {
                    padding: Some(Padding { top: -1.0, ..Padding::default() }),
                    ..Default::default()
                },
                expected_ok: false,
            },
        ];

        let base = ChartConfig::default();
        for (index, test) in tests.into_iter().enumerate() {
            let actual = base.apply(&test.input);
            assert_eq!(actual.is_ok(), test.expected_ok, "TC{} failed: {:?}", index, actual);
        }
    }

    #[test]
    fn test_apply_clamps_tiny_width() {
        let update = OptionsUpdate {
            width: Some(10.0),
            ..Default::default()
        };
        let config = ChartConfig::default().apply(&update).unwrap();
        assert_eq!(config.width, 101.0);
        assert_eq!(config.plot_width(), 1.0);
    }

    #[test]
    fn test_theme_switch_keeps_up_down_colors() {
        let config = ChartConfig::from_json(r##"{"upBarColor": "#ff0000"}"##).unwrap();
        let config = config
            .apply(&OptionsUpdate {
                theme: Some(Theme::Light),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.colors.up_bar, "#ff0000");
        assert_eq!(config.colors.background, "#ffffff");
        assert_eq!(config.colors.neutral_bar, "#D4A017");
    }
}
