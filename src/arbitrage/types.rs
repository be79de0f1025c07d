use std::time::Duration;

/// Configuration for spread detection
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Minimum spread, in percent, for a quote pair to count as an opportunity.
    pub threshold_pct: f64,
    /// Quotes older than this at evaluation time are ignored.
    pub stale_after: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold_pct: 0.01,
            stale_after: Duration::from_secs(2),
        }
    }
}
