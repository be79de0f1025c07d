use crate::events::EventSink;
use crate::models::{Opportunity, SimulatedTrade, SimulationState};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Sizing and cost model for simulated fills
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Quote-currency notional per trade; `<= 0` disables the simulator.
    pub trade_size_notional: f64,
    /// Adverse price move applied to each leg, in percent.
    pub slippage_pct: f64,
    /// Fee charged on the combined notional of both legs, in percent.
    pub fees_pct: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            trade_size_notional: 1000.0,
            slippage_pct: 0.1,
            fees_pct: 0.2,
        }
    }
}

/// Economics of one paired fill, before it is booked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub quantity: f64,
    pub buy_price: f64,
    pub sell_price: f64,
    pub buy_notional: f64,
    pub sell_notional: f64,
    pub fees: f64,
    pub pnl: f64,
}

/// Price a simultaneous buy at `opp.buy_price` and sell at `opp.sell_price`
/// under a linear slippage and fee model.
pub fn price_fill(config: &SimulatorConfig, opp: &Opportunity) -> Fill {
    let quantity = config.trade_size_notional / opp.buy_price;

    let buy_price = opp.buy_price * (1.0 + config.slippage_pct / 100.0);
    let sell_price = opp.sell_price * (1.0 - config.slippage_pct / 100.0);

    let buy_notional = buy_price * quantity;
    let sell_notional = sell_price * quantity;
    let fees = (buy_notional + sell_notional) * (config.fees_pct / 100.0);
    let pnl = sell_notional - buy_notional - fees;

    Fill {
        quantity,
        buy_price,
        sell_price,
        buy_notional,
        sell_notional,
        fees,
        pnl,
    }
}

/// Paper executor that books every opportunity it is handed.
pub struct TradeSimulator {
    config: SimulatorConfig,
    state: Mutex<SimulationState>,
    sink: Arc<dyn EventSink>,
}

impl TradeSimulator {
    pub fn new(config: SimulatorConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            state: Mutex::new(SimulationState::default()),
            sink,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.trade_size_notional > 0.0
    }

    /// Simulate the paired trade for `opp` and add its P&L to the running
    /// totals. Returns `None` without touching state when disabled.
    pub fn execute(&self, opp: &Opportunity) -> Option<SimulatedTrade> {
        if !self.is_enabled() {
            return None;
        }
        if !(opp.buy_price.is_finite() && opp.buy_price > 0.0) {
            debug!(instrument = %opp.instrument, buy_price = opp.buy_price, "[SIM] unusable buy price, skipping");
            return None;
        }

        let fill = price_fill(&self.config, opp);
        let (cumulative_pnl, trade_count) = {
            let mut state = self.state.lock();
            state.cumulative_pnl += fill.pnl;
            state.trade_count += 1;
            (state.cumulative_pnl, state.trade_count)
        };

        let trade = SimulatedTrade {
            instrument: opp.instrument.clone(),
            buy_venue: opp.buy_venue.clone(),
            sell_venue: opp.sell_venue.clone(),
            spread_pct: opp.spread_pct,
            quantity: fill.quantity,
            buy_price: fill.buy_price,
            sell_price: fill.sell_price,
            buy_notional: fill.buy_notional,
            sell_notional: fill.sell_notional,
            fees: fill.fees,
            pnl: fill.pnl,
            cumulative_pnl,
            trade_count,
        };
        self.sink.on_trade(&trade);
        Some(trade)
    }

    pub fn state(&self) -> SimulationState {
        *self.state.lock()
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }
}
