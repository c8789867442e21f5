//! Integration tests for the parameter search.
//!
//! Tests:
//! 1. Exhaustive mode: deterministic, covers the whole grid
//! 2. Sampled mode: seed-deterministic, distinct candidates, budget respected
//! 3. Selection: the best score wins, degenerate grids score zero
//! 4. Failure modes: empty ranges, pre-aborted searches

use std::sync::atomic::AtomicBool;

use chrono::NaiveDate;
use swinglab_core::domain::{Bar, MarketSeries};
use swinglab_core::engine::EngineConfig;
use swinglab_core::error::ConfigError;
use swinglab_runner::{search, search_with_abort, ParamGrid, SearchError, SearchSettings};

/// Helper: a neutral bar (no signal, no forced exit) at `close`.
fn neutral_bar(day_offset: i64, close: f64) -> Bar {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bar = Bar::from_ohlcv(
        base + chrono::Duration::days(day_offset),
        close,
        close + 1.0,
        close - 1.0,
        close,
        1000,
    );
    bar.rsi = 50.0;
    bar.cci = 0.0;
    bar.macd = 0.0;
    bar.macd_signal = 0.0;
    bar.macd_hist = 0.0;
    bar
}

/// Helper: a wavy series with periodic entry signals.
fn busy_series(n: usize) -> MarketSeries {
    let bars: Vec<Bar> = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.35).sin() * 9.0;
            let mut bar = neutral_bar(i as i64, close);
            bar.high = close + 2.5;
            bar.low = close - 2.5;
            if i % 4 == 0 {
                bar.rsi = 20.0;
                bar.cci = -150.0;
            }
            bar
        })
        .collect();
    MarketSeries::new(bars).unwrap()
}

/// A small grid: 2 × 2 × 1 × 1 × 3 × 2 = 24 combinations.
fn small_grid() -> ParamGrid {
    ParamGrid {
        hold_periods: vec![5, 10],
        rsi_threshs: vec![25.0, 35.0],
        cci_threshs: vec![-100.0],
        macd_hist_threshs: vec![-1.0],
        tp_percents: vec![0.05, 0.10, 0.30],
        entry_delays: vec![0, 2],
    }
}

fn settings(max_tries: usize, seed: u64) -> SearchSettings {
    SearchSettings {
        max_tries,
        seed,
        engine: EngineConfig::default(),
    }
}

// ──────────────────────────────────────────────
// Exhaustive mode
// ──────────────────────────────────────────────

#[test]
fn exhaustive_mode_covers_the_whole_grid() {
    let series = busy_series(150);
    let outcome = search(&series, &small_grid(), &settings(10_000, 42)).unwrap();

    assert!(!outcome.sampled);
    assert_eq!(outcome.evaluated, 24);
    assert_eq!(outcome.total_candidates, 24);
}

#[test]
fn exhaustive_mode_is_deterministic() {
    let series = busy_series(150);
    let grid = small_grid();

    let first = search(&series, &grid, &settings(10_000, 42)).unwrap();
    let second = search(&series, &grid, &settings(10_000, 42)).unwrap();

    assert_eq!(first.best.trial, second.best.trial);
    assert_eq!(first.best.score, second.best.score);
    assert_eq!(first.best.result.params, second.best.result.params);
    assert_eq!(first.best.result.final_equity, second.best.result.final_equity);
}

#[test]
fn exhaustive_mode_ignores_the_seed() {
    let series = busy_series(150);
    let grid = small_grid();

    let a = search(&series, &grid, &settings(10_000, 1)).unwrap();
    let b = search(&series, &grid, &settings(10_000, 999)).unwrap();

    assert_eq!(a.best.result.params, b.best.result.params);
    assert_eq!(a.best.score, b.best.score);
}

#[test]
fn budget_exactly_equal_to_grid_stays_exhaustive() {
    let series = busy_series(150);
    let grid = small_grid();

    let exact = search(&series, &grid, &settings(24, 42)).unwrap();
    let roomy = search(&series, &grid, &settings(10_000, 42)).unwrap();

    assert!(!exact.sampled);
    assert_eq!(exact.evaluated, 24);
    assert_eq!(exact.best.result.params, roomy.best.result.params);
    assert_eq!(exact.best.score, roomy.best.score);
}

// ──────────────────────────────────────────────
// Sampled mode
// ──────────────────────────────────────────────

#[test]
fn sampled_mode_respects_the_budget() {
    let series = busy_series(150);
    let outcome = search(&series, &small_grid(), &settings(10, 42)).unwrap();

    assert!(outcome.sampled);
    assert_eq!(outcome.evaluated, 10);
    assert_eq!(outcome.total_candidates, 24);
}

#[test]
fn sampled_mode_is_deterministic_for_a_seed() {
    let series = busy_series(150);
    let grid = small_grid();

    let first = search(&series, &grid, &settings(10, 42)).unwrap();
    let second = search(&series, &grid, &settings(10, 42)).unwrap();

    assert_eq!(first.best.trial, second.best.trial);
    assert_eq!(first.best.score, second.best.score);
    assert_eq!(first.best.result.params, second.best.result.params);
}

// ──────────────────────────────────────────────
// Selection
// ──────────────────────────────────────────────

#[test]
fn best_candidate_wins_on_score() {
    // Signal at bar 0, a spike through 105 at bar 3, then flat. A 5% target
    // banks the spike; a 30% target never fills and the trade decays to a
    // hold-period exit at the entry price, losing only commission.
    let mut bars: Vec<Bar> = (0..30).map(|i| neutral_bar(i, 100.0)).collect();
    bars[0].rsi = 20.0;
    bars[0].cci = -150.0;
    bars[3].high = 110.0;
    let series = MarketSeries::new(bars).unwrap();

    let grid = ParamGrid {
        hold_periods: vec![10],
        rsi_threshs: vec![30.0],
        cci_threshs: vec![-100.0],
        macd_hist_threshs: vec![-1.0],
        tp_percents: vec![0.05, 0.30],
        entry_delays: vec![0],
    };

    let outcome = search(&series, &grid, &settings(10_000, 42)).unwrap();

    assert_eq!(outcome.best.result.params.tp_percent, 0.05);
    assert!(outcome.best.score > 0.0);
    // Filled at the target price.
    assert!((outcome.best.result.trades[0].exit_price - 105.0).abs() < 1e-9);
}

#[test]
fn never_qualifying_grid_scores_zero() {
    let series = busy_series(100);
    let grid = ParamGrid {
        // RSI is never below zero: no bar can qualify.
        rsi_threshs: vec![0.0],
        cci_threshs: vec![-10_000.0],
        ..small_grid()
    };

    let outcome = search(&series, &grid, &settings(10_000, 42)).unwrap();

    assert_eq!(outcome.best.score, 0.0);
    assert!(outcome.best.result.trades.is_empty());
    // First-seen wins among all-tied candidates.
    assert_eq!(outcome.best.trial, 0);
}

// ──────────────────────────────────────────────
// Failure modes
// ──────────────────────────────────────────────

#[test]
fn empty_range_fails_before_any_trial() {
    let series = busy_series(100);
    let mut grid = small_grid();
    grid.cci_threshs.clear();

    let err = search(&series, &grid, &settings(10_000, 42)).unwrap_err();

    assert!(matches!(
        err,
        SearchError::Config(ConfigError::EmptyRange("cci_thresh"))
    ));
}

#[test]
fn invalid_engine_settings_fail_before_any_trial() {
    let series = busy_series(100);
    let bad = SearchSettings {
        engine: EngineConfig::new(-5.0, 0.002),
        ..settings(10_000, 42)
    };

    let err = search(&series, &small_grid(), &bad).unwrap_err();

    assert!(matches!(err, SearchError::Config(_)));
}

#[test]
fn pre_aborted_search_reports_aborted() {
    let series = busy_series(100);
    let abort = AtomicBool::new(true);

    let err =
        search_with_abort(&series, &small_grid(), &settings(10_000, 42), &abort).unwrap_err();

    assert!(matches!(err, SearchError::Aborted));
}

#[test]
fn data_error_on_the_shared_series_aborts_the_search() {
    // An indicator gap inside the replay window poisons every trial.
    let mut bars: Vec<Bar> = (0..60).map(|i| neutral_bar(i, 100.0)).collect();
    bars[30].macd_hist = f64::NAN;
    let series = MarketSeries::new(bars).unwrap();

    let err = search(&series, &small_grid(), &settings(10_000, 42)).unwrap_err();

    assert!(matches!(err, SearchError::Trial { .. }));
}
