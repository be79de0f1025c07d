use anyhow::Result;
use std::sync::Arc;
use venue_arbitrage::{
    aggregator,
    arbitrage::Detector,
    config::AppConfig,
    events::{EventSink, TracingSink},
    execution::TradeSimulator,
    feed::{self, TickQueue},
    utils,
};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    let config = AppConfig::from_env()?;
    utils::init_logging(&config.log_level, config.log_json);

    if !dotenv_loaded {
        tracing::info!("[INIT] no .env file found, using process environment");
    }
    tracing::info!(
        symbols = ?config.symbols,
        threshold_pct = config.detector.threshold_pct,
        stale_after_ms = config.detector.stale_after.as_millis() as u64,
        trade_size_usd = config.simulator.trade_size_notional,
        slippage_pct = config.simulator.slippage_pct,
        fees_pct = config.simulator.fees_pct,
        "[INIT] venue-arbitrage starting"
    );

    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let detector = Arc::new(Detector::new(config.detector.clone(), sink.clone()));
    let simulator = Arc::new(TradeSimulator::new(config.simulator.clone(), sink));
    if !simulator.is_enabled() {
        tracing::info!("[INIT] trade simulator disabled (TRADE_SIZE_USD <= 0)");
    }

    // Consumer ---------------------------------------------------------------
    let (queue, tick_rx) = TickQueue::bounded(config.tick_queue_size);
    let consumer = aggregator::spawn_tick_consumer(tick_rx, detector.clone(), simulator.clone());
    let heartbeat = aggregator::spawn_heartbeat(
        config.heartbeat_interval,
        detector.clone(),
        simulator.clone(),
        queue.clone(),
    );

    // Producer ---------------------------------------------------------------
    let feed_task = feed::spawn_feed_watcher(config.feed_settings(), queue.clone());

    utils::shutdown_signal().await?;
    tracing::info!("[SHUTDOWN] signal received");

    feed_task.abort();
    let _ = feed_task.await;
    heartbeat.abort();
    let _ = heartbeat.await;
    let dropped_ticks = queue.dropped();
    drop(queue);

    let processed = consumer.await.unwrap_or_default();
    let state = simulator.state();
    tracing::info!(
        processed,
        dropped_ticks,
        trades = state.trade_count,
        cum_pnl = state.cumulative_pnl,
        "Shutdown complete"
    );
    Ok(())
}
