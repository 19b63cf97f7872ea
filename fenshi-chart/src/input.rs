//! Normalized input messages accepted by [`crate::chart::FenshiChart::handle`].

use serde::{Deserialize, Serialize};

/// Pane the pointer was over when a wheel event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pane {
    Price,
    Volume,
    TimeAxis,
}

/// Input gesture. Coordinates are price-pane local pixels; `AxisClick::x` shares the same
/// horizontal origin.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gesture {
    /// Horizontal drag by `dx` pixels since the previous delta.
    DragDelta { dx: f64 },
    Wheel {
        dx: f64,
        dy: f64,
        shift: bool,
        pane: Pane,
    },
    PointerMove {
        x: f64,
        y: f64,
        /// Host-side drag in progress: hit-testing is suppressed.
        dragging: bool,
    },
    PointerEnter,
    PointerLeave,
    AxisClick { x: f64 },
    Resize { width: f64, height: f64 },
}

impl Gesture {
    /// Horizontal scroll delta carried by a wheel event, if it scrolls at all.
    ///
    /// A horizontal delta always scrolls. A vertical delta scrolls only with shift held or over
    /// the time axis.
    pub fn wheel_scroll(dx: f64, dy: f64, shift: bool, pane: Pane) -> Option<f64> {
        if dx != 0.0 {
            Some(dx)
        } else if dy != 0.0 && (shift || pane == Pane::TimeAxis) {
            Some(dy)
        } else {
            None
        }
    }
}
