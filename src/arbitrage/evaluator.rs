use super::types::DetectorConfig;
use crate::models::{Opportunity, Quote};
use std::time::{Duration, SystemTime};

/// Find the widest fresh cross-venue spread for `instrument`.
///
/// `quotes` are the cached venue quotes for that instrument. Returns `None`
/// when fewer than two distinct venues are fresh or the spread misses the
/// configured threshold.
pub fn evaluate_spread<'a>(
    instrument: &str,
    quotes: impl IntoIterator<Item = (&'a str, &'a Quote)>,
    now: SystemTime,
    config: &DetectorConfig,
) -> Option<Opportunity> {
    let mut best: Option<(&str, f64, &str, f64)> = None;

    for (venue, quote) in quotes {
        if !is_fresh(quote, now, config.stale_after) || !is_usable_price(quote.price) {
            continue;
        }
        let price = quote.price;
        best = Some(match best {
            None => (venue, price, venue, price),
            // Strict comparisons: on ties the first venue scanned keeps the slot.
            Some((buy_venue, buy_price, sell_venue, sell_price)) => {
                let (buy_venue, buy_price) = if price < buy_price {
                    (venue, price)
                } else {
                    (buy_venue, buy_price)
                };
                let (sell_venue, sell_price) = if price > sell_price {
                    (venue, price)
                } else {
                    (sell_venue, sell_price)
                };
                (buy_venue, buy_price, sell_venue, sell_price)
            }
        });
    }

    let (buy_venue, buy_price, sell_venue, sell_price) = best?;
    if buy_venue == sell_venue {
        return None;
    }

    let spread_pct = spread_percent(buy_price, sell_price)?;
    // NaN threshold must reject, not accept
    if !(spread_pct >= config.threshold_pct) {
        return None;
    }

    Some(Opportunity {
        instrument: instrument.to_string(),
        buy_venue: buy_venue.to_string(),
        sell_venue: sell_venue.to_string(),
        buy_price,
        sell_price,
        spread_pct,
        detected_at: now,
    })
}

/// Percentage spread of `sell` over `buy`; `None` when `buy` cannot be divided by.
pub fn spread_percent(buy: f64, sell: f64) -> Option<f64> {
    if !is_usable_price(buy) || !sell.is_finite() {
        return None;
    }
    Some((sell - buy) / buy * 100.0)
}

/// A quote is fresh while its age does not exceed `stale_after`.
/// Timestamps ahead of `now` count as age zero.
pub fn is_fresh(quote: &Quote, now: SystemTime, stale_after: Duration) -> bool {
    match now.duration_since(quote.timestamp) {
        Ok(age) => age <= stale_after,
        Err(_) => true,
    }
}

fn is_usable_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}
