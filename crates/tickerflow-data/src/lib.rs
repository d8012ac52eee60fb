//! Market-data providers.
//!
//! Two [`BarProvider`](tickerflow_core::traits::BarProvider)
//! implementations, Alpaca's historical bars API and local per-ticker
//! CSV files, plus the ticker universe loader that decides which
//! symbols a run covers.

mod alpaca;
mod csv_source;
mod universe;

pub use alpaca::AlpacaData;
pub use csv_source::CsvBars;
pub use universe::load_tickers;
