use crate::errors::Result;
use crate::models::Tick;
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Quote currencies collapsed into one `/USD` leg, longest first so that
/// "BUSD" is not read as "B" + "USD".
const USD_QUOTES: [&str; 4] = ["BUSD", "USDT", "USDC", "USD"];

const UNKNOWN_VENUE: &str = "UNKNOWN";

#[derive(Debug, Deserialize)]
struct FeedMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Vec<TradeEntry>,
}

#[derive(Debug, Deserialize)]
struct TradeEntry {
    /// "EXCHANGE:SYMBOL"
    s: String,
    p: f64,
    /// Epoch milliseconds.
    #[serde(default)]
    t: i64,
}

/// Turns one text frame into ticks. `received_at` stamps trades that carry
/// no usable exchange time.
pub fn parse_message(raw: &str, received_at: SystemTime) -> Result<Vec<Tick>> {
    let body = raw.trim();
    if !body.starts_with('{') {
        debug!(payload = body, "[FEED] non-JSON frame; skipping");
        return Ok(Vec::new());
    }

    let msg: FeedMessage = serde_json::from_str(body)?;
    if msg.kind != "trade" {
        return Ok(Vec::new());
    }

    let ticks = msg
        .data
        .into_iter()
        .filter_map(|entry| {
            if !(entry.p.is_finite() && entry.p > 0.0) {
                warn!(raw_sym = %entry.s, price = entry.p, "[FEED] dropping trade with unusable price");
                return None;
            }
            let (venue, instrument) = split_exchange_symbol(&entry.s);
            let timestamp = if entry.t > 0 {
                UNIX_EPOCH + Duration::from_millis(entry.t as u64)
            } else {
                received_at
            };
            debug!(
                exchange = %venue,
                symbol = %instrument,
                raw_sym = %entry.s,
                price = entry.p,
                ts_ms = entry.t,
                "[FEED] processed tick"
            );
            Some(Tick {
                instrument,
                venue,
                price: entry.p,
                timestamp,
            })
        })
        .collect();
    Ok(ticks)
}

/// Split "KRAKEN:XBTUSD" into ("KRAKEN", "BTC/USD").
///
/// Every USD-pegged quote currency maps onto the same "/USD" instrument, so
/// e.g. BTCUSDT and BTCUSDC are compared against each other.
pub fn split_exchange_symbol(symbol: &str) -> (String, String) {
    let Some((venue, raw)) = symbol.split_once(':') else {
        return (UNKNOWN_VENUE.to_string(), symbol.to_string());
    };

    let cleaned = raw.replace('-', "").replace("XBT", "BTC");
    for quote in USD_QUOTES {
        if let Some(base) = cleaned.strip_suffix(quote) {
            if !base.is_empty() {
                return (venue.to_string(), format!("{base}/USD"));
            }
        }
    }
    (venue.to_string(), cleaned)
}
