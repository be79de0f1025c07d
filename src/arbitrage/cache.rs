use crate::models::Quote;
use std::collections::HashMap;

/// Latest quote per (instrument, venue).
///
/// Entries are overwritten, never appended, so the size is bounded by
/// instruments × venues. Nothing is evicted; staleness is a read-time concern.
#[derive(Debug, Default)]
pub struct QuoteCache {
    quotes: HashMap<String, HashMap<String, Quote>>,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `quote`, replacing whatever was cached for the same key.
    pub fn upsert(&mut self, instrument: &str, venue: &str, quote: Quote) {
        // Skip the key allocations on the hot path once both levels exist.
        if let Some(venues) = self.quotes.get_mut(instrument) {
            if let Some(slot) = venues.get_mut(venue) {
                *slot = quote;
            } else {
                venues.insert(venue.to_string(), quote);
            }
            return;
        }
        self.quotes
            .entry(instrument.to_string())
            .or_default()
            .insert(venue.to_string(), quote);
    }

    pub fn get(&self, instrument: &str, venue: &str) -> Option<Quote> {
        self.quotes.get(instrument)?.get(venue).copied()
    }

    /// Every cached venue quote for one instrument.
    pub fn venues(&self, instrument: &str) -> impl Iterator<Item = (&str, &Quote)> {
        self.quotes
            .get(instrument)
            .into_iter()
            .flat_map(|venues| venues.iter().map(|(venue, quote)| (venue.as_str(), quote)))
    }

    /// Number of cached (instrument, venue) entries.
    pub fn len(&self) -> usize {
        self.quotes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
