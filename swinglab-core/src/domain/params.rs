//! StrategyParams — the tunable knobs of the swing strategy.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One candidate parameter set. Immutable value object; the optimizer creates
/// one per trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Maximum bars a position may be held before a forced exit.
    pub hold_period: usize,
    /// RSI must be below this to arm an entry signal (0-100).
    pub rsi_thresh: f64,
    /// CCI must be below this to arm an entry signal.
    pub cci_thresh: f64,
    /// MACD histogram below this forces an exit.
    pub macd_hist_thresh: f64,
    /// Take-profit distance as a fraction of entry price (0.30 = +30%).
    pub tp_percent: f64,
    /// Bars to wait between the armed signal and the entry fill.
    pub entry_delay: usize,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            hold_period: 16,
            rsi_thresh: 30.0,
            cci_thresh: -100.0,
            macd_hist_thresh: 0.0,
            tp_percent: 0.30,
            entry_delay: 5,
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hold_period == 0 {
            return Err(ConfigError::NonPositiveHoldPeriod);
        }
        if !(0.0..=100.0).contains(&self.rsi_thresh) {
            return Err(ConfigError::RsiThreshOutOfRange(self.rsi_thresh));
        }
        if !self.tp_percent.is_finite() || self.tp_percent <= 0.0 {
            return Err(ConfigError::InvalidTakeProfit(self.tp_percent));
        }
        Ok(())
    }
}
