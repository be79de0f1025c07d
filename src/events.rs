//! Observability sink for detected opportunities and simulated trades.
//!
//! The detector and simulator each take an `Arc<dyn EventSink>` at construction.

use crate::models::{Opportunity, SimulatedTrade};
use crate::utils::unix_millis;
use tracing::info;

pub trait EventSink: Send + Sync {
    fn on_opportunity(&self, opp: &Opportunity);
    fn on_trade(&self, trade: &SimulatedTrade);
}

/// Renders events as structured `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_opportunity(&self, opp: &Opportunity) {
        info!(
            instrument = %opp.instrument,
            buy_venue = %opp.buy_venue,
            sell_venue = %opp.sell_venue,
            buy_price = opp.buy_price,
            sell_price = opp.sell_price,
            spread_pct = opp.spread_pct,
            detected_at_ms = unix_millis(opp.detected_at),
            "[OPP] arbitrage opportunity detected"
        );
    }

    fn on_trade(&self, trade: &SimulatedTrade) {
        info!(
            instrument = %trade.instrument,
            buy_venue = %trade.buy_venue,
            sell_venue = %trade.sell_venue,
            buy_price = trade.buy_price,
            sell_price = trade.sell_price,
            spread_pct = trade.spread_pct,
            trade_qty = trade.quantity,
            fees = trade.fees,
            trade_pnl = trade.pnl,
            cum_pnl = trade.cumulative_pnl,
            trades = trade.trade_count,
            "[SIM] simulated arbitrage executed"
        );
    }
}

/// Sink that keeps every event in memory; test helper.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub opportunities: parking_lot::Mutex<Vec<Opportunity>>,
    pub trades: parking_lot::Mutex<Vec<SimulatedTrade>>,
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn on_opportunity(&self, opp: &Opportunity) {
        self.opportunities.lock().push(opp.clone());
    }

    fn on_trade(&self, trade: &SimulatedTrade) {
        self.trades.lock().push(trade.clone());
    }
}

