//! Simulated execution of detected opportunities.
//!
//! No orders leave the process: each opportunity is priced as a paired
//! buy/sell fill and folded into running P&L totals.

pub mod simulator;

pub use simulator::{Fill, SimulatorConfig, TradeSimulator, price_fill};
