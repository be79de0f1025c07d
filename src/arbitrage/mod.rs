pub mod cache;
pub mod detector;
pub mod evaluator;
pub mod types;

pub use cache::QuoteCache;
pub use detector::Detector;
pub use evaluator::{evaluate_spread, is_fresh, spread_percent};
pub use types::DetectorConfig;
