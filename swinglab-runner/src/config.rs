//! Serializable search configuration.
//!
//! A `SearchConfig` captures everything needed to reproduce a search: the
//! per-parameter candidate ranges, the try budget, the sampling seed, and the
//! account settings. Configs load from TOML and hash to a deterministic run
//! id, so two searches with identical configs are directly comparable.

use serde::{Deserialize, Serialize};

use swinglab_core::engine::EngineConfig;
use swinglab_core::error::ConfigError;

use crate::grid::ParamGrid;
use crate::search::SearchSettings;

/// Half-open arithmetic range `[start, stop)` with a positive step —
/// the shape the candidate grids are declared in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl StepRange {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// Expand into the ordered candidate values. A non-positive step yields
    /// an empty list, which grid validation then rejects by name.
    pub fn values(&self) -> Vec<f64> {
        let mut out = Vec::new();
        if self.step <= 0.0 || !self.step.is_finite() {
            return out;
        }
        let mut i = 0u32;
        loop {
            let value = self.start + f64::from(i) * self.step;
            // Exclusive stop, with a fuzz guard against float accumulation.
            if value >= self.stop - 1e-9 {
                break;
            }
            out.push(value);
            i += 1;
        }
        out
    }

    fn values_usize(&self) -> Vec<usize> {
        self.values().into_iter().map(|v| v.round() as usize).collect()
    }
}

/// Full search configuration. TOML-serializable; all fields have defaults
/// mirroring the stock swing grid, so a config file only needs to override
/// what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub hold_period: StepRange,
    pub rsi_thresh: StepRange,
    pub cci_thresh: StepRange,
    pub macd_hist_thresh: StepRange,
    pub tp_percent: StepRange,
    pub entry_delay: StepRange,

    pub max_tries: usize,
    pub seed: u64,
    pub starting_cash: f64,
    pub commission_rate: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            hold_period: StepRange::new(10.0, 100.0, 5.0),
            rsi_thresh: StepRange::new(10.0, 50.0, 2.0),
            cci_thresh: StepRange::new(-300.0, -100.0, 20.0),
            macd_hist_thresh: StepRange::new(-40.0, 40.0, 2.5),
            tp_percent: StepRange::new(0.5, 50.0, 1.0),
            entry_delay: StepRange::new(0.0, 30.0, 2.0),
            max_tries: 10_000,
            seed: 42,
            starting_cash: 10_000.0,
            commission_rate: 0.002,
        }
    }
}

impl SearchConfig {
    /// Expand the declared ranges into the candidate grid.
    pub fn to_grid(&self) -> ParamGrid {
        ParamGrid {
            hold_periods: self.hold_period.values_usize(),
            rsi_threshs: self.rsi_thresh.values(),
            cci_threshs: self.cci_thresh.values(),
            macd_hist_threshs: self.macd_hist_thresh.values(),
            tp_percents: self.tp_percent.values(),
            entry_delays: self.entry_delay.values_usize(),
        }
    }

    pub fn settings(&self) -> SearchSettings {
        SearchSettings {
            max_tries: self.max_tries,
            seed: self.seed,
            engine: EngineConfig::new(self.starting_cash, self.commission_rate),
        }
    }

    /// Validate ranges and account settings before any simulation runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_grid().validate()?;
        self.settings().engine.validate()
    }

    /// Deterministic content hash of this configuration.
    ///
    /// Two searches with the same config (and series) produce the same id
    /// and are directly comparable.
    pub fn run_id(&self) -> String {
        let toml = toml::to_string(self).expect("SearchConfig serialization failed");
        blake3::hash(toml.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_range_expands_like_half_open_interval() {
        let values = StepRange::new(10.0, 50.0, 2.0).values();
        assert_eq!(values.len(), 20);
        assert_eq!(values[0], 10.0);
        assert_eq!(values[19], 48.0);
    }

    #[test]
    fn step_range_excludes_stop() {
        let values = StepRange::new(0.0, 30.0, 2.0).values();
        assert_eq!(*values.last().unwrap(), 28.0);
    }

    #[test]
    fn step_range_fractional_step() {
        let values = StepRange::new(-40.0, 40.0, 2.5).values();
        assert_eq!(values.len(), 32);
        assert_eq!(values[0], -40.0);
        assert_eq!(values[31], 37.5);
    }

    #[test]
    fn non_positive_step_yields_empty() {
        assert!(StepRange::new(0.0, 10.0, 0.0).values().is_empty());
        assert!(StepRange::new(0.0, 10.0, -1.0).values().is_empty());
    }

    #[test]
    fn default_config_expands_to_stock_grid() {
        let grid = SearchConfig::default().to_grid();
        assert_eq!(grid, ParamGrid::swing_default());
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn toml_roundtrip() {
        let config = SearchConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: SearchConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let parsed: SearchConfig = toml::from_str(
            r#"
            max_tries = 500
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(parsed.max_tries, 500);
        assert_eq!(parsed.seed, 7);
        assert_eq!(parsed.starting_cash, 10_000.0);
    }

    #[test]
    fn run_id_is_deterministic_and_content_sensitive() {
        let config = SearchConfig::default();
        assert_eq!(config.run_id(), config.run_id());

        let mut changed = SearchConfig::default();
        changed.seed = 43;
        assert_ne!(config.run_id(), changed.run_id());
    }
}
