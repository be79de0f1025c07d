use crate::models::Tick;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

/// Bounded hand-off between feed readers and the tick consumer.
///
/// Never blocks the producer: when the buffer is full the incoming tick is
/// dropped and counted.
#[derive(Debug, Clone)]
pub struct TickQueue {
    tx: mpsc::Sender<Tick>,
    dropped: Arc<AtomicU64>,
}

impl TickQueue {
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<Tick>) {
        let (tx, rx) = mpsc::channel(capacity);
        let queue = Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (queue, rx)
    }

    /// Enqueue `tick`; `false` if it was dropped or the consumer is gone.
    pub fn push(&self, tick: Tick) -> bool {
        match self.tx.try_send(tick) {
            Ok(()) => true,
            Err(TrySendError::Full(tick)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(instrument = %tick.instrument, venue = %tick.venue, dropped, "[FEED] tick dropped: queue full");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Ticks discarded because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn tick(venue: &str, price: f64) -> Tick {
        Tick {
            instrument: "BTC/USD".into(),
            venue: venue.into(),
            price,
            timestamp: SystemTime::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn full_queue_drops_newest() {
        let (queue, mut rx) = TickQueue::bounded(2);
        assert!(queue.push(tick("A", 1.0)));
        assert!(queue.push(tick("B", 2.0)));
        assert!(!queue.push(tick("C", 3.0)));
        assert_eq!(queue.dropped(), 1);

        assert_eq!(rx.recv().await.map(|t| t.venue), Some("A".to_string()));
        assert_eq!(rx.recv().await.map(|t| t.venue), Some("B".to_string()));

        // room again after draining
        assert!(queue.push(tick("D", 4.0)));
        assert_eq!(rx.recv().await.map(|t| t.venue), Some("D".to_string()));
        assert_eq!(queue.dropped(), 1);
    }

    #[tokio::test]
    async fn clones_share_drop_counter() {
        let (queue, _rx) = TickQueue::bounded(1);
        let other = queue.clone();
        assert!(queue.push(tick("A", 1.0)));
        assert!(!other.push(tick("B", 2.0)));
        assert_eq!(queue.dropped(), 1);
    }

    #[tokio::test]
    async fn closed_queue_is_not_a_drop() {
        let (queue, rx) = TickQueue::bounded(1);
        drop(rx);
        assert!(!queue.push(tick("A", 1.0)));
        assert_eq!(queue.dropped(), 0);
    }
}
