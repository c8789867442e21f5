//! Simulation engine — single-pass bar replay with bracket-order exits.
//!
//! The engine consumes a validated [`MarketSeries`](crate::domain::MarketSeries)
//! with precomputed indicator columns and a
//! [`StrategyParams`](crate::domain::StrategyParams) candidate, and produces a
//! [`RunResult`]: trade log, equity curve, final equity.

pub mod replay;
pub mod state;

pub use replay::{run_simulation, STOP_LOSS_RATIO};
pub use state::{EngineConfig, RunResult};
