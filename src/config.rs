//! Configuration loader and application settings.

use crate::arbitrage::DetectorConfig;
use crate::errors::{AppError, Result};
use crate::execution::SimulatorConfig;
use crate::feed::FeedSettings;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_SYMBOLS: [&str; 6] = [
    "BINANCE:BTCUSDT",
    "COINBASE:BTC-USD",
    "KRAKEN:XBTUSD",
    "BITSTAMP:BTCUSD",
    "GEMINI:BTCUSD",
    "OKX:BTC-USD",
];

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Feed API token.
    pub api_key: String,
    /// Default log level when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit logs as JSON lines.
    pub log_json: bool,
    /// WebSocket endpoint of the trade feed.
    pub feed_url: String,
    /// Venue-qualified symbols to subscribe to.
    pub symbols: Vec<String>,
    /// Capacity of the tick hand-off queue.
    pub tick_queue_size: usize,
    pub heartbeat_interval: Duration,
    pub detector: DetectorConfig,
    pub simulator: SimulatorConfig,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let symbols: Vec<String> = match get("SYMBOLS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        };
        if symbols.is_empty() {
            return Err(AppError::Config("SYMBOLS must name at least one symbol".into()));
        }

        let tick_queue_size: usize = parse_or(&get, "TICK_QUEUE_SIZE", 1000)?;
        if tick_queue_size == 0 {
            return Err(AppError::Config("TICK_QUEUE_SIZE must be greater than zero".into()));
        }

        let threshold_pct: f64 = parse_or(&get, "THRESHOLD_PCT", 0.01)?;
        require(threshold_pct.is_finite(), "THRESHOLD_PCT", "must be finite")?;
        // <= 0 disables the simulator, so only non-finite sizes are rejected
        let trade_size_notional: f64 = parse_or(&get, "TRADE_SIZE_USD", 1000.0)?;
        require(trade_size_notional.is_finite(), "TRADE_SIZE_USD", "must be finite")?;
        let slippage_pct: f64 = parse_or(&get, "SLIPPAGE_PCT", 0.1)?;
        require(
            slippage_pct.is_finite() && slippage_pct >= 0.0,
            "SLIPPAGE_PCT",
            "must be finite and non-negative",
        )?;
        let fees_pct: f64 = parse_or(&get, "FEES_PCT", 0.2)?;
        require(
            fees_pct.is_finite() && fees_pct >= 0.0,
            "FEES_PCT",
            "must be finite and non-negative",
        )?;
        let stale_after_ms: u64 = parse_or(&get, "STALE_AFTER_MS", 2000)?;
        let heartbeat_secs: u64 = parse_or(&get, "HEARTBEAT_SECS", 30)?;

        Ok(Self {
            api_key: get("API_KEY").unwrap_or_else(|| "-".into()),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parse_or(&get, "LOG_JSON", false)?,
            feed_url: get("FEED_URL").unwrap_or_else(|| "wss://ws.finnhub.io".into()),
            symbols,
            tick_queue_size,
            heartbeat_interval: Duration::from_secs(heartbeat_secs.max(1)),
            detector: DetectorConfig {
                threshold_pct,
                stale_after: Duration::from_millis(stale_after_ms),
            },
            simulator: SimulatorConfig {
                trade_size_notional,
                slippage_pct,
                fees_pct,
            },
        })
    }

    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            url: self.feed_url.clone(),
            api_key: self.api_key.clone(),
            symbols: self.symbols.clone(),
        }
    }
}

fn require(ok: bool, key: &str, what: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(AppError::Config(format!("{key} {what}")))
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("{key}={raw:?}: {e}"))),
        None => Ok(default),
    }
}
