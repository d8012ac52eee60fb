//! Core data types for the pipeline.

mod bar;
mod order;
mod rows;
mod signal;
mod timeframe;

pub use bar::{Bar, GroupedBars, TickerSeries};
pub use order::{OrderAck, OrderRecord, OrderRequest, Side, TimeInForce};
pub use rows::{ReversionIndicatorRow, SignalRow, TrendIndicatorRow};
pub use signal::{Reversion, Trend};
pub use timeframe::Timeframe;
