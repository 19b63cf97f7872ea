//! Tick values and the loosely-typed feed record they are validated from.
//!
//! A [`Tick`] can only be built through validating constructors, so everything held by the
//! [`DataStore`](crate::store::DataStore) is known to have a finite positive price and an
//! integral non-negative volume.

use crate::error::ChartError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Aggressor side of a trade, used to colour volume bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
    #[default]
    Neutral,
}

impl Direction {
    /// Convert to display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
            Direction::Neutral => "neutral",
        }
    }

    /// Check if this is a buyer-initiated trade
    pub fn is_buy(&self) -> bool {
        matches!(self, Direction::Buy)
    }

    /// Check if this is a seller-initiated trade
    pub fn is_sell(&self) -> bool {
        matches!(self, Direction::Sell)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Direction::Buy),
            "sell" => Ok(Direction::Sell),
            "neutral" | "" => Ok(Direction::Neutral),
            other => Err(ChartError::InvalidTick(format!(
                "unknown direction '{other}'"
            ))),
        }
    }
}

/// One timestamped trade observation. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    time: DateTime<Utc>,
    price: f64,
    volume: u64,
    direction: Direction,
}

impl Tick {
    /// Construct a validated tick.
    ///
    /// Fails with [`ChartError::InvalidTick`] if `price` is not finite or not strictly positive.
    pub fn new(
        time: DateTime<Utc>,
        price: f64,
        volume: u64,
        direction: Direction,
    ) -> Result<Self, ChartError> {
        if !price.is_finite() {
            return Err(ChartError::InvalidTick(format!(
                "price must be finite, got {price}"
            )));
        }
        if price <= 0.0 {
            return Err(ChartError::InvalidTick(format!(
                "price must be > 0, got {price}"
            )));
        }

        Ok(Self::from_parts(time, price, volume, direction))
    }

    /// Caller guarantees `price` is finite and > 0.
    pub(crate) fn from_parts(
        time: DateTime<Utc>,
        price: f64,
        volume: u64,
        direction: Direction,
    ) -> Self {
        debug_assert!(price.is_finite() && price > 0.0);
        Self {
            time,
            price,
            volume,
            direction,
        }
    }

    /// Parse and validate a single JSON feed record.
    pub fn from_json(input: &str) -> Result<Self, ChartError> {
        let raw = serde_json::from_str::<RawTick>(input)
            .map_err(|error| ChartError::InvalidTick(error.to_string()))?;
        Self::try_from(raw)
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn volume(&self) -> u64 {
        self.volume
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Traded amount (`price * volume`).
    pub fn amount(&self) -> f64 {
        self.price * self.volume as f64
    }
}

/// Feed-facing tick record, prior to validation.
///
/// Feed adapters are loose about types: times arrive as epoch milliseconds or RFC 3339 strings,
/// and numbers sometimes arrive quoted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawTick {
    pub time: RawTime,
    pub price: RawNumber,
    pub volume: RawNumber,
    #[serde(default)]
    pub direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawTime {
    Millis(i64),
    Text(String),
}

impl RawTime {
    fn parse(&self) -> Result<DateTime<Utc>, ChartError> {
        match self {
            RawTime::Millis(ms) => Utc.timestamp_millis_opt(*ms).single().ok_or_else(|| {
                ChartError::InvalidTick(format!("timestamp {ms}ms out of range"))
            }),
            RawTime::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|time| time.with_timezone(&Utc))
                .map_err(|error| ChartError::InvalidTick(format!("time '{text}': {error}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn as_f64(&self, field: &str) -> Result<f64, ChartError> {
        let value = match self {
            RawNumber::Number(value) => *value,
            RawNumber::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                ChartError::InvalidTick(format!("{field} '{text}' is not numeric"))
            })?,
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(ChartError::InvalidTick(format!("{field} must be finite")))
        }
    }
}

impl TryFrom<RawTick> for Tick {
    type Error = ChartError;

    fn try_from(raw: RawTick) -> Result<Self, Self::Error> {
        let time = raw.time.parse()?;
        let price = raw.price.as_f64("price")?;

        let volume = raw.volume.as_f64("volume")?;
        if volume < 0.0 || volume.fract() != 0.0 || volume > u64::MAX as f64 {
            return Err(ChartError::InvalidTick(format!(
                "volume must be a non-negative integer, got {volume}"
            )));
        }

        let direction = match raw.direction.as_deref() {
            Some(direction) => direction.parse()?,
            None => Direction::Neutral,
        };

        Tick::new(time, price, volume as u64, direction)
    }
}
