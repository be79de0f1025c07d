//! Tick consumer that drives detection and simulated execution.

use crate::{
    arbitrage::Detector,
    execution::TradeSimulator,
    feed::TickQueue,
    models::{SimulatedTrade, Tick},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Feed one tick through the detector and, on an opportunity, the simulator.
pub fn process_tick(
    detector: &Detector,
    simulator: &TradeSimulator,
    tick: &Tick,
) -> Option<SimulatedTrade> {
    let opp = detector.update_quote(&tick.instrument, &tick.venue, tick.price, tick.timestamp)?;
    simulator.execute(&opp)
}

/// Spawn the consumer loop. Finishes once every queue handle is dropped and
/// yields the number of ticks processed.
pub fn spawn_tick_consumer(
    mut rx: mpsc::Receiver<Tick>,
    detector: Arc<Detector>,
    simulator: Arc<TradeSimulator>,
) -> tokio::task::JoinHandle<u64> {
    tokio::spawn(async move {
        let mut processed: u64 = 0;
        while let Some(tick) = rx.recv().await {
            processed += 1;
            process_tick(&detector, &simulator, &tick);
        }
        tracing::info!(processed, "[CONSUMER] tick queue closed");
        processed
    })
}

/// Periodically log cache size, simulated totals and queue drops.
pub fn spawn_heartbeat(
    interval: Duration,
    detector: Arc<Detector>,
    simulator: Arc<TradeSimulator>,
    queue: TickQueue,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // first tick fires immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let state = simulator.state();
            tracing::info!(
                tracked_quotes = detector.tracked_quotes(),
                trades = state.trade_count,
                cum_pnl = state.cumulative_pnl,
                dropped_ticks = queue.dropped(),
                "[HEARTBEAT]"
            );
        }
    })
}
