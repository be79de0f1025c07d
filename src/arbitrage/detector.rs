use super::cache::QuoteCache;
use super::evaluator::evaluate_spread;
use super::types::DetectorConfig;
use crate::events::EventSink;
use crate::models::{Opportunity, Quote};
use crate::utils::{Clock, SystemClock};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::SystemTime;

/// Quote cache plus the spread check that runs on every update.
///
/// Safe to share between feed tasks: store, scan and decide happen under a
/// single lock so concurrent updates never observe a half-applied quote.
pub struct Detector {
    cache: Mutex<QuoteCache>,
    config: DetectorConfig,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
}

impl Detector {
    pub fn new(config: DetectorConfig, sink: Arc<dyn EventSink>) -> Self {
        Self::with_clock(config, sink, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: DetectorConfig,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache: Mutex::new(QuoteCache::new()),
            config,
            sink,
            clock,
        }
    }

    /// Record the latest `price` for (`instrument`, `venue`) and check that
    /// instrument for a cross-venue spread.
    pub fn update_quote(
        &self,
        instrument: &str,
        venue: &str,
        price: f64,
        timestamp: SystemTime,
    ) -> Option<Opportunity> {
        let opportunity = {
            let mut cache = self.cache.lock();
            cache.upsert(instrument, venue, Quote { price, timestamp });
            let now = self.clock.now();
            evaluate_spread(instrument, cache.venues(instrument), now, &self.config)
        };

        if let Some(opp) = &opportunity {
            self.sink.on_opportunity(opp);
        }
        opportunity
    }

    /// Copy of the cached quote for one key, stale or not.
    pub fn quote(&self, instrument: &str, venue: &str) -> Option<Quote> {
        self.cache.lock().get(instrument, venue)
    }

    /// Number of cached (instrument, venue) entries.
    pub fn tracked_quotes(&self) -> usize {
        self.cache.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::utils::ManualClock;
    use std::time::Duration;

    fn t0() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    fn setup(threshold_pct: f64) -> (Detector, Arc<RecordingSink>, Arc<ManualClock>) {
        let sink = Arc::new(RecordingSink::default());
        let clock = Arc::new(ManualClock::new(t0()));
        let config = DetectorConfig {
            threshold_pct,
            stale_after: Duration::from_secs(2),
        };
        let detector = Detector::with_clock(config, sink.clone(), clock.clone());
        (detector, sink, clock)
    }

    #[test]
    fn two_fresh_venues_produce_opportunity() {
        let (detector, sink, _clock) = setup(0.01);

        assert!(detector.update_quote("BTC/USD", "A", 100.0, t0()).is_none());
        let opp = detector
            .update_quote("BTC/USD", "B", 100.5, t0())
            .expect("0.5% spread clears 0.01%");

        assert_eq!(opp.instrument, "BTC/USD");
        assert_eq!(opp.buy_venue, "A");
        assert_eq!(opp.sell_venue, "B");
        assert_eq!(opp.buy_price, 100.0);
        assert_eq!(opp.sell_price, 100.5);
        assert!((opp.spread_pct - 0.5).abs() < 1e-9);
        assert_eq!(opp.detected_at, t0());

        let seen = sink.opportunities.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], opp);
    }

    #[test]
    fn unrefreshed_quote_goes_stale() {
        let (detector, sink, clock) = setup(0.01);

        detector.update_quote("BTC/USD", "A", 100.0, t0());
        clock.advance(Duration::from_secs(3));
        let later = t0() + Duration::from_secs(3);

        assert!(detector.update_quote("BTC/USD", "B", 100.5, later).is_none());
        assert!(sink.opportunities.lock().is_empty());
        // stale entries stay cached
        assert_eq!(detector.quote("BTC/USD", "A").map(|q| q.price), Some(100.0));
    }

    #[test]
    fn refreshing_stale_venue_revives_spread() {
        let (detector, _sink, clock) = setup(0.01);

        detector.update_quote("BTC/USD", "A", 100.0, t0());
        clock.advance(Duration::from_secs(3));
        let later = t0() + Duration::from_secs(3);
        assert!(detector.update_quote("BTC/USD", "B", 100.5, later).is_none());

        let opp = detector
            .update_quote("BTC/USD", "A", 100.0, later)
            .expect("both fresh again");
        assert_eq!(opp.buy_venue, "A");
        assert_eq!(opp.sell_venue, "B");
        assert_eq!(opp.detected_at, later);
    }

    #[test]
    fn single_venue_never_triggers() {
        let (detector, sink, _clock) = setup(0.0);

        for price in [100.0, 200.0, 50.0, 300.0] {
            assert!(detector.update_quote("BTC/USD", "A", price, t0()).is_none());
        }
        assert_eq!(detector.tracked_quotes(), 1);
        assert_eq!(detector.quote("BTC/USD", "A").map(|q| q.price), Some(300.0));
        assert!(sink.opportunities.lock().is_empty());
    }

    #[test]
    fn spread_below_threshold_is_ignored() {
        let (detector, sink, _clock) = setup(1.0);

        detector.update_quote("BTC/USD", "A", 100.0, t0());
        assert!(detector.update_quote("BTC/USD", "B", 100.5, t0()).is_none());
        assert!(sink.opportunities.lock().is_empty());
    }

    #[test]
    fn other_instruments_do_not_mix() {
        let (detector, _sink, _clock) = setup(0.01);

        detector.update_quote("BTC/USD", "A", 100.0, t0());
        assert!(detector.update_quote("ETH/USD", "B", 200.0, t0()).is_none());
        assert!(detector.update_quote("ETH/USD", "C", 200.0, t0()).is_none());

        let opp = detector
            .update_quote("BTC/USD", "B", 101.0, t0())
            .expect("BTC spread");
        assert_eq!(opp.instrument, "BTC/USD");
        assert_eq!(detector.tracked_quotes(), 4);
    }

    #[test]
    fn non_positive_price_cannot_become_buy_side() {
        let (detector, _sink, _clock) = setup(0.01);

        detector.update_quote("BTC/USD", "A", 0.0, t0());
        assert!(detector.update_quote("BTC/USD", "B", 100.0, t0()).is_none());
        detector.update_quote("BTC/USD", "C", -3.0, t0());
        detector.update_quote("BTC/USD", "D", f64::NAN, t0());

        let opp = detector
            .update_quote("BTC/USD", "E", 101.0, t0())
            .expect("B/E spread");
        assert_eq!(opp.buy_venue, "B");
        assert_eq!(opp.sell_venue, "E");
    }

    #[test]
    fn replaying_updates_is_idempotent() {
        let ticks = [
            ("BTC/USD", "A", 100.0),
            ("BTC/USD", "B", 100.7),
            ("ETH/USD", "A", 10.0),
            ("BTC/USD", "A", 100.2),
        ];
        let (detector, _sink, _clock) = setup(0.01);
        for _ in 0..2 {
            for (instrument, venue, price) in ticks {
                detector.update_quote(instrument, venue, price, t0());
            }
            assert_eq!(detector.tracked_quotes(), 3);
            assert_eq!(detector.quote("BTC/USD", "A").map(|q| q.price), Some(100.2));
            assert_eq!(detector.quote("BTC/USD", "B").map(|q| q.price), Some(100.7));
            assert_eq!(detector.quote("ETH/USD", "A").map(|q| q.price), Some(10.0));
        }
    }

    #[test]
    fn concurrent_updates_keep_one_quote_per_key() {
        let (detector, _sink, _clock) = setup(0.01);
        let venues = ["A", "B", "C", "D"];

        std::thread::scope(|s| {
            for venue in venues {
                let detector = &detector;
                s.spawn(move || {
                    for i in 0..500 {
                        let price = 100.0 + (i % 7) as f64 * 0.1;
                        if let Some(opp) = detector.update_quote("BTC/USD", venue, price, t0()) {
                            assert_ne!(opp.buy_venue, opp.sell_venue);
                            assert!(opp.sell_price > opp.buy_price);
                        }
                    }
                    // last write from this thread
                    detector.update_quote("BTC/USD", venue, 42.0, t0());
                });
            }
        });

        assert_eq!(detector.tracked_quotes(), venues.len());
        for venue in venues {
            assert_eq!(detector.quote("BTC/USD", venue).map(|q| q.price), Some(42.0));
        }
    }
}
