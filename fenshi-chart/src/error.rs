use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors generated in `fenshi-chart`.
///
/// Every variant is recoverable: the chart state is left untouched and the caller may retry
/// with corrected input.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Error)]
pub enum ChartError {
    #[error("invalid tick: {0}")]
    InvalidTick(String),

    #[error("invalid reference price: {0} (must be finite and > 0)")]
    InvalidPrice(f64),

    #[error("invalid chart options: {0}")]
    InvalidOptions(String),
}

impl ChartError {
    /// Determine if an error was caused by malformed feed data (as opposed to caller config).
    pub fn is_data_error(&self) -> bool {
        matches!(self, ChartError::InvalidTick(_))
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidOptions(value.to_string())
    }
}
