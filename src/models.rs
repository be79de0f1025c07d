//! Shared data structures used throughout the application.

use std::time::SystemTime;

/// A normalized trade print from one venue, as delivered by the feed parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Canonical instrument, e.g. "BTC/USD".
    pub instrument: String,
    /// Venue tag, e.g. "BINANCE".
    pub venue: String,
    pub price: f64,
    pub timestamp: SystemTime,
}

/// Latest observed price for one instrument on one venue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub price: f64,
    pub timestamp: SystemTime,
}

/// Cross-venue spread found by one evaluation of the quote cache.
///
/// `buy_venue != sell_venue` and `sell_price > buy_price` always hold for
/// values produced by the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    pub instrument: String,
    pub buy_venue: String,
    pub sell_venue: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub spread_pct: f64,
    pub detected_at: SystemTime,
}

/// Running totals of the trade simulator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationState {
    pub cumulative_pnl: f64,
    pub trade_count: u64,
}

/// Result of simulating one paired buy/sell execution.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedTrade {
    pub instrument: String,
    pub buy_venue: String,
    pub sell_venue: String,
    pub spread_pct: f64,
    pub quantity: f64,
    /// Buy price after slippage.
    pub buy_price: f64,
    /// Sell price after slippage.
    pub sell_price: f64,
    pub buy_notional: f64,
    pub sell_notional: f64,
    pub fees: f64,
    pub pnl: f64,
    /// Totals after this trade was booked.
    pub cumulative_pnl: f64,
    pub trade_count: u64,
}
