//! Market data feed.
//!
//! Responsibilities:
//! • Maintain a WebSocket connection to a trade feed and subscribe to symbols.
//! • Normalize venue-qualified symbols into canonical instruments.
//! • Hand ticks to the consumer through a bounded, drop-on-full queue.
//! • Handle reconnection and backoff.

pub mod finnhub;
pub mod parser;
pub mod queue;

pub use finnhub::{FeedSettings, spawn_feed_watcher};
pub use parser::{parse_message, split_exchange_symbol};
pub use queue::TickQueue;
