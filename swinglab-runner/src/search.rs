//! Brute-force parameter search over the candidate grid.
//!
//! If the grid fits within the try budget the search is exhaustive, in flat
//! lexicographic order. Otherwise it evaluates a seeded sample drawn without
//! replacement, so oversized grids stay reproducible. Trials run on rayon
//! workers sharing the series by reference; the best result is found with a
//! commutative, associative merge — greater score wins, lower trial index
//! wins ties — so thread scheduling cannot change the outcome.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use swinglab_core::domain::{MarketSeries, StrategyParams};
use swinglab_core::engine::{run_simulation, EngineConfig, RunResult};
use swinglab_core::error::{ConfigError, SimulationError};

use crate::grid::ParamGrid;
use crate::metrics::PerformanceMetrics;

/// Errors from a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("trial {trial} ({params:?}) failed: {source}")]
    Trial {
        trial: usize,
        params: Box<StrategyParams>,
        #[source]
        source: SimulationError,
    },

    #[error("search aborted before any trial completed")]
    Aborted,
}

/// Knobs shared by every trial of one search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Budget: exhaustive when the grid fits, sampled otherwise.
    pub max_tries: usize,
    /// Seed for the sampled mode. Exhaustive mode never draws from it.
    pub seed: u64,
    pub engine: EngineConfig,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_tries: 10_000,
            seed: 42,
            engine: EngineConfig::default(),
        }
    }
}

/// One evaluated trial: the run, its metrics, and its objective score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRun {
    /// Position in the evaluation order (ties break toward lower values).
    pub trial: usize,
    /// Objective: total return over the run, percent.
    pub score: f64,
    pub metrics: PerformanceMetrics,
    pub result: RunResult,
}

/// The retained summary of a finished search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub best: ScoredRun,
    pub evaluated: usize,
    pub total_candidates: u128,
    /// True when the grid exceeded the budget and a seeded sample was used.
    pub sampled: bool,
}

/// Run a search to completion.
pub fn search(
    series: &MarketSeries,
    grid: &ParamGrid,
    settings: &SearchSettings,
) -> Result<SearchOutcome, SearchError> {
    let never = AtomicBool::new(false);
    search_with_abort(series, grid, settings, &never)
}

/// Run a search, checking `abort` before each trial.
///
/// Trials skipped by an abort contribute nothing; no partial result is ever
/// merged. If every trial was skipped the search reports
/// [`SearchError::Aborted`].
pub fn search_with_abort(
    series: &MarketSeries,
    grid: &ParamGrid,
    settings: &SearchSettings,
    abort: &AtomicBool,
) -> Result<SearchOutcome, SearchError> {
    grid.validate()?;
    settings.engine.validate()?;

    let total = grid.size();
    let sampled = total > settings.max_tries as u128;
    let indices: Vec<u128> = if sampled {
        sample_without_replacement(total, settings.max_tries, settings.seed)
    } else {
        (0..total).collect()
    };

    let (best, evaluated) = indices
        .par_iter()
        .enumerate()
        .map(|(trial, &flat_index)| -> Result<_, SearchError> {
            if abort.load(Ordering::Relaxed) {
                return Ok((None, 0usize));
            }
            let params = grid.nth(flat_index);
            let result =
                run_simulation(series, &params, &settings.engine).map_err(|source| {
                    SearchError::Trial {
                        trial,
                        params: Box::new(params.clone()),
                        source,
                    }
                })?;
            let metrics = PerformanceMetrics::compute(&result);
            let run = ScoredRun {
                trial,
                score: metrics.total_return_pct,
                metrics,
                result,
            };
            Ok((Some(run), 1))
        })
        .try_reduce(
            || (None, 0),
            |(a, n), (b, m)| Ok((merge_best(a, b), n + m)),
        )?;

    let best = best.ok_or(SearchError::Aborted)?;
    Ok(SearchOutcome {
        best,
        evaluated,
        total_candidates: total,
        sampled,
    })
}

/// Strictly greater score wins; equal scores fall back to the earlier trial.
fn merge_best(a: Option<ScoredRun>, b: Option<ScoredRun>) -> Option<ScoredRun> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if b.score > a.score || (b.score == a.score && b.trial < a.trial) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, None) => a,
        (None, b) => b,
    }
}

/// Draw `count` distinct flat indices from `[0, total)` with a seeded RNG.
///
/// Rejection sampling; only called when `total > count`, and the try budget
/// is small relative to realistic grids, so collisions stay cheap.
fn sample_without_replacement(total: u128, count: usize, seed: u64) -> Vec<u128> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::with_capacity(count);
    let mut indices = Vec::with_capacity(count);
    while indices.len() < count {
        let candidate = rng.gen_range(0..total);
        if seen.insert(candidate) {
            indices.push(candidate);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_deterministic_for_a_seed() {
        let a = sample_without_replacement(1_000_000, 100, 42);
        let b = sample_without_replacement(1_000_000, 100, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_draw_different_samples() {
        let a = sample_without_replacement(1_000_000, 100, 42);
        let b = sample_without_replacement(1_000_000, 100, 43);
        assert_ne!(a, b);
    }

    #[test]
    fn sample_has_no_duplicates() {
        let sample = sample_without_replacement(500, 400, 7);
        let mut unique: Vec<u128> = sample.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), sample.len());
        assert_eq!(sample.len(), 400);
    }

    #[test]
    fn merge_prefers_higher_score() {
        let better = scored(3, 10.0);
        let worse = scored(1, 5.0);
        let merged = merge_best(Some(worse), Some(better)).unwrap();
        assert_eq!(merged.trial, 3);
    }

    #[test]
    fn merge_breaks_ties_toward_earlier_trial() {
        let first = scored(1, 10.0);
        let second = scored(4, 10.0);
        let merged = merge_best(Some(second), Some(first)).unwrap();
        assert_eq!(merged.trial, 1);
        // Symmetric argument order must agree.
        let merged = merge_best(Some(scored(1, 10.0)), Some(scored(4, 10.0))).unwrap();
        assert_eq!(merged.trial, 1);
    }

    fn scored(trial: usize, score: f64) -> ScoredRun {
        use swinglab_core::domain::StrategyParams;
        let result = RunResult {
            params: StrategyParams::default(),
            trades: vec![],
            equity_curve: vec![10_000.0],
            starting_cash: 10_000.0,
            final_equity: 10_000.0,
        };
        ScoredRun {
            trial,
            score,
            metrics: PerformanceMetrics::compute(&result),
            result,
        }
    }
}
