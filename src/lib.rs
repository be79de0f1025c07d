//! Core library for the venue-arbitrage project.
//!
//! Quotes for the same instrument arrive from several venues; the
//! [`arbitrage::Detector`] keeps the latest one per venue and flags fresh
//! cross-venue spreads, and the [`execution::TradeSimulator`] books each
//! flagged spread as a paper trade. Feed, configuration and logging live in
//! their own modules and are wired together by the binary.

pub mod aggregator;
pub mod arbitrage;
pub mod config;
pub mod errors;
pub mod events;
pub mod execution;
pub mod feed;
pub mod models;
pub mod utils;
