//! Brokerage gateways.

mod alpaca;
mod sim;

pub use alpaca::{AlpacaBroker, AlpacaConfig};
pub use sim::SimBroker;
