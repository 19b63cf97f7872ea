/// Fenshi Chart - Streaming Intraday Tick Chart Engine
///
/// Keeps a bounded window of ticks and everything needed to draw and inspect it:
/// - Running price statistics and the session VWAP series
/// - Normal, full and limit-band price axis policies
/// - Fixed-pitch horizontal layout with scroll state
/// - Nearest-point hit-testing for crosshair and tooltip
///
/// The engine never paints. [`FenshiChart::scene`] returns a declarative [`Scene`] that a
/// rendering backend turns into pixels, and [`FenshiChart::handle`] accepts normalized
/// [`Gesture`]s from the host.
pub mod chart;
pub mod config;
pub mod error;
pub mod format;
pub mod hit;
pub mod input;
pub mod mapper;
pub mod mock;
pub mod range;
pub mod scene;
pub mod stats;
pub mod store;
pub mod tick;
pub mod viewport;

// Re-export commonly used types for convenience
pub use chart::FenshiChart;
pub use config::{ChartConfig, ColorTokens, OptionsUpdate, Padding, Theme};
pub use error::ChartError;
pub use input::{Gesture, Pane};
pub use mapper::{CoordinateMapper, Geometry};
pub use mock::{MockSpec, MockWalk, generate_walk};
pub use range::{CoordinateType, RangePolicy, RangeSpec};
pub use scene::{
    ColorRole, CrosshairTarget, DrawCommand, InfoSummary, Point, Scene, Stroke, TextAlign,
    TooltipContent,
};
pub use stats::{DerivedSeries, PriceInfo, StatsEngine};
pub use store::DataStore;
pub use tick::{Direction, RawTick, Tick};
pub use viewport::{Viewport, VisibleRange};
