//! Parameter grid — the candidate space of the search.
//!
//! One ordered candidate vector per strategy parameter. The full space is
//! their Cartesian product; candidates are addressed by a flat lexicographic
//! index over the declared parameter order (hold_period outermost,
//! entry_delay varying fastest), which keeps exhaustive enumeration and
//! sampling reproducible without materializing the product.

use serde::{Deserialize, Serialize};

use swinglab_core::domain::StrategyParams;
use swinglab_core::error::ConfigError;

/// Per-parameter candidate values, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub hold_periods: Vec<usize>,
    pub rsi_threshs: Vec<f64>,
    pub cci_threshs: Vec<f64>,
    pub macd_hist_threshs: Vec<f64>,
    pub tp_percents: Vec<f64>,
    pub entry_delays: Vec<usize>,
}

impl ParamGrid {
    /// The stock swing-strategy grid: 18 hold periods × 20 RSI × 10 CCI ×
    /// 32 MACD-histogram × 50 take-profit × 15 delay candidates.
    pub fn swing_default() -> Self {
        Self {
            hold_periods: (10..100).step_by(5).collect(),
            rsi_threshs: (10..50).step_by(2).map(|v| v as f64).collect(),
            cci_threshs: (-300..-100).step_by(20).map(|v| v as f64).collect(),
            macd_hist_threshs: (-400..400).step_by(25).map(|v| v as f64 / 10.0).collect(),
            tp_percents: (50..5000).step_by(100).map(|v| v as f64 / 100.0).collect(),
            entry_delays: (0..30).step_by(2).collect(),
        }
    }

    /// Fails on any empty candidate vector or out-of-domain candidate value,
    /// before a single trial runs. After this check, every decodable
    /// combination is a valid parameter set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hold_periods.is_empty() {
            return Err(ConfigError::EmptyRange("hold_period"));
        }
        if self.rsi_threshs.is_empty() {
            return Err(ConfigError::EmptyRange("rsi_thresh"));
        }
        if self.cci_threshs.is_empty() {
            return Err(ConfigError::EmptyRange("cci_thresh"));
        }
        if self.macd_hist_threshs.is_empty() {
            return Err(ConfigError::EmptyRange("macd_hist_thresh"));
        }
        if self.tp_percents.is_empty() {
            return Err(ConfigError::EmptyRange("tp_percent"));
        }
        if self.entry_delays.is_empty() {
            return Err(ConfigError::EmptyRange("entry_delay"));
        }
        if self.hold_periods.contains(&0) {
            return Err(ConfigError::NonPositiveHoldPeriod);
        }
        if let Some(&bad) = self
            .rsi_threshs
            .iter()
            .find(|t| !(0.0..=100.0).contains(*t))
        {
            return Err(ConfigError::RsiThreshOutOfRange(bad));
        }
        if let Some(&bad) = self
            .tp_percents
            .iter()
            .find(|t| !t.is_finite() || **t <= 0.0)
        {
            return Err(ConfigError::InvalidTakeProfit(bad));
        }
        Ok(())
    }

    /// Total number of candidate combinations.
    pub fn size(&self) -> u128 {
        self.hold_periods.len() as u128
            * self.rsi_threshs.len() as u128
            * self.cci_threshs.len() as u128
            * self.macd_hist_threshs.len() as u128
            * self.tp_percents.len() as u128
            * self.entry_delays.len() as u128
    }

    /// Decode a flat lexicographic index into a parameter set.
    ///
    /// Panics if `index >= self.size()`; callers sample or enumerate within
    /// bounds.
    pub fn nth(&self, index: u128) -> StrategyParams {
        debug_assert!(index < self.size());
        let mut rest = index;

        let delay_len = self.entry_delays.len() as u128;
        let entry_delay = self.entry_delays[(rest % delay_len) as usize];
        rest /= delay_len;

        let tp_len = self.tp_percents.len() as u128;
        let tp_percent = self.tp_percents[(rest % tp_len) as usize];
        rest /= tp_len;

        let macd_len = self.macd_hist_threshs.len() as u128;
        let macd_hist_thresh = self.macd_hist_threshs[(rest % macd_len) as usize];
        rest /= macd_len;

        let cci_len = self.cci_threshs.len() as u128;
        let cci_thresh = self.cci_threshs[(rest % cci_len) as usize];
        rest /= cci_len;

        let rsi_len = self.rsi_threshs.len() as u128;
        let rsi_thresh = self.rsi_threshs[(rest % rsi_len) as usize];
        rest /= rsi_len;

        let hold_period = self.hold_periods[rest as usize];

        StrategyParams {
            hold_period,
            rsi_thresh,
            cci_thresh,
            macd_hist_thresh,
            tp_percent,
            entry_delay,
        }
    }
}
