//! SwingLab Core — engine, domain types, indicators.
//!
//! This crate contains the heart of the strategy evaluator:
//! - Domain types (bars, series, parameters, position state, trades)
//! - Single-pass bar replay with lookahead-safe signal arming
//! - Bracket exits (stop-loss / take-profit / hold period / MACD reversal)
//! - Indicator computations for the data-preparation layer
//! - The DataError / ConfigError / SimulationError taxonomy

pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
