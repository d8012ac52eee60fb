//! Core traits for the pipeline.

mod broker;
mod provider;

pub use broker::Broker;
pub use provider::BarProvider;
