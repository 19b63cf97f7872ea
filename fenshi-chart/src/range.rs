//! Vertical axis range policies.

use crate::stats::PriceInfo;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Padding applied above and below the data in [`CoordinateType::Normal`] mode.
const NORMAL_PADDING_RATIO: f64 = 0.1;

/// Price axis scaling mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum CoordinateType {
    /// Data range padded by 10% of the high-low spread on each side.
    #[default]
    Normal,
    /// Data range with no padding.
    Full,
    /// Symmetric band of `limit_percentage` around the reference price.
    Limit,
}

impl CoordinateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateType::Normal => "normal",
            CoordinateType::Full => "full",
            CoordinateType::Limit => "limit",
        }
    }
}

impl std::fmt::Display for CoordinateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CoordinateType {
    type Err = std::convert::Infallible;

    /// Unrecognised modes fall back to [`CoordinateType::Normal`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "normal" => CoordinateType::Normal,
            "full" => CoordinateType::Full,
            "limit" => CoordinateType::Limit,
            other => {
                warn!(coordinate_type = other, "unknown coordinate type, using normal");
                CoordinateType::Normal
            }
        })
    }
}

impl From<String> for CoordinateType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<CoordinateType> for String {
    fn from(value: CoordinateType) -> Self {
        value.as_str().to_string()
    }
}

/// Axis bounds. `min` is always >= 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct RangeSpec {
    pub min: f64,
    pub max: f64,
}

impl RangeSpec {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check if the range has no usable extent (empty store or flat data in full mode).
    pub fn is_flat(&self) -> bool {
        self.span().abs() < f64::EPSILON
    }

    fn clamp_non_negative(mut self) -> Self {
        if self.min < 0.0 {
            self.min = 0.0;
        }
        self
    }
}

/// Inputs selecting and parameterising the price range rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangePolicy {
    pub coordinate_type: CoordinateType,
    pub limit_percentage: f64,
    pub initial_price: Option<f64>,
}

impl RangePolicy {
    /// Price axis range for the current statistics; `None` means the store is empty.
    pub fn price_range(&self, info: Option<&PriceInfo>) -> RangeSpec {
        let Some(info) = info else {
            return RangeSpec::default();
        };

        let range = match self.coordinate_type {
            CoordinateType::Normal => normal_range(info),
            CoordinateType::Full => RangeSpec::new(info.low, info.high),
            CoordinateType::Limit => match self.limit_band(info) {
                Some(band) => band,
                None => normal_range(info),
            },
        };

        range.clamp_non_negative()
    }

    /// Reference price for the limit band: the explicit initial price, else the open.
    pub fn reference_price(&self, info: &PriceInfo) -> Option<f64> {
        self.initial_price
            .or(info.open)
            .filter(|price| price.is_finite() && *price > 0.0)
    }

    /// Limit band around the reference price, unavailable when there is no usable reference.
    pub fn limit_band(&self, info: &PriceInfo) -> Option<RangeSpec> {
        let reference = self.reference_price(info)?;
        let ratio = self.limit_percentage / 100.0;
        Some(RangeSpec::new(reference * (1.0 - ratio), reference * (1.0 + ratio)))
    }
}

fn normal_range(info: &PriceInfo) -> RangeSpec {
    let padding = (info.high - info.low) * NORMAL_PADDING_RATIO;
    RangeSpec::new(info.low - padding, info.high + padding)
}

/// Volume axis range: always anchored at zero.
pub fn volume_range(info: &PriceInfo) -> RangeSpec {
    RangeSpec::new(0.0, info.volume_max as f64)
}
