use super::parser::parse_message;
use super::queue::TickQueue;
use crate::errors::Result;
use futures::{SinkExt, StreamExt};
use std::time::{Duration, SystemTime};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};
use url::Url;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Where and what to subscribe.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// WebSocket endpoint, e.g. "wss://ws.finnhub.io".
    pub url: String,
    pub api_key: String,
    /// Venue-qualified symbols, e.g. "BINANCE:BTCUSDT".
    pub symbols: Vec<String>,
}

impl FeedSettings {
    /// Endpoint with the API token attached as a query parameter.
    pub fn endpoint(&self) -> Result<Url> {
        let url = Url::parse_with_params(&self.url, &[("token", self.api_key.as_str())])?;
        Ok(url)
    }
}

pub fn subscribe_frame(symbol: &str) -> String {
    serde_json::json!({ "type": "subscribe", "symbol": symbol }).to_string()
}

/// Run one connection until the server closes it or an error occurs.
///
/// Returns the number of ticks forwarded to `queue`.
pub async fn run_session(settings: &FeedSettings, queue: &TickQueue) -> Result<u64> {
    let (mut ws, _resp) = connect_async(settings.endpoint()?).await?;
    info!(url = %settings.url, symbols = settings.symbols.len(), "[FEED] connected");

    for symbol in &settings.symbols {
        ws.send(Message::Text(subscribe_frame(symbol))).await?;
        info!(symbol = %symbol, "[FEED] subscribed");
    }

    let mut forwarded = 0u64;
    while let Some(msg) = ws.next().await {
        match msg? {
            Message::Text(txt) => match parse_message(&txt, SystemTime::now()) {
                Ok(ticks) => {
                    for tick in ticks {
                        if queue.push(tick) {
                            forwarded += 1;
                        }
                    }
                }
                Err(e) => warn!(error = %e, raw = %txt, "[FEED] failed to parse market data"),
            },
            Message::Ping(payload) => ws.send(Message::Pong(payload)).await?,
            Message::Close(frame) => {
                info!(?frame, "[FEED] server closed connection");
                break;
            }
            _ => {}
        }
    }
    Ok(forwarded)
}

/// Spawn the feed reader: reconnects forever with exponential backoff,
/// reset whenever a session delivered ticks.
pub fn spawn_feed_watcher(settings: FeedSettings, queue: TickQueue) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut backoff = INITIAL_BACKOFF;
        loop {
            match run_session(&settings, &queue).await {
                Ok(forwarded) => {
                    warn!(forwarded, "[FEED] session ended");
                    if forwarded > 0 {
                        backoff = INITIAL_BACKOFF;
                    }
                }
                Err(e) => warn!(error = %e, "[FEED] session failed"),
            }
            info!(delay_ms = backoff.as_millis() as u64, "[FEED] reconnecting");
            tokio::time::sleep(backoff).await;
            backoff = next_backoff(backoff);
        }
    })
}

fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}
