//! Error taxonomy for the core crate.
//!
//! Three layers, all fail-fast:
//! - `DataError` — the input series is unusable; aborts everything built on it
//! - `ConfigError` — invalid parameters or engine settings; caught before replay
//! - `SimulationError` — umbrella for a single simulation run, including the
//!   invariant-violation variant that signals an engine bug

use thiserror::Error;

/// Malformed or missing input series data. Never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("market series is empty")]
    EmptySeries,

    #[error("bar {index} ({date}) does not advance the date sequence")]
    NonMonotonicDates { index: usize, date: chrono::NaiveDate },

    #[error("bar {index} has invalid OHLC values")]
    InsaneBar { index: usize },

    #[error("no bar carries a complete indicator set")]
    NoIndicatorData,

    #[error("indicator gap at bar {index} inside the replay window")]
    IndicatorGap { index: usize },

    #[error("series too short: need {required} indicator-ready bars, have {actual}")]
    InsufficientLength { required: usize, actual: usize },
}

/// Invalid strategy parameters or engine settings. Caught before any bar is replayed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("hold_period must be positive")]
    NonPositiveHoldPeriod,

    #[error("rsi_thresh must be within 0-100, got {0}")]
    RsiThreshOutOfRange(f64),

    #[error("tp_percent must be positive and finite, got {0}")]
    InvalidTakeProfit(f64),

    #[error("starting_cash must be positive, got {0}")]
    NonPositiveCash(f64),

    #[error("commission_rate must be in [0, 1), got {0}")]
    CommissionOutOfRange(f64),

    #[error("candidate range for '{0}' is empty")]
    EmptyRange(&'static str),
}

/// Failure of a single simulation run.
///
/// `InvariantViolated` means the engine reached a state its own rules forbid
/// (e.g. a second entry while a position is open). It is fatal and never
/// recovered; the other variants wrap the pre-replay checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("engine invariant violated: {0}")]
    InvariantViolated(String),
}
