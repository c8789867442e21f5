//! Performance metrics — pure functions that compute strategy statistics.
//!
//! Every metric is a pure function: equity curve and/or trade list in,
//! scalar out. The search objective is total return; the rest is reporting.

use serde::{Deserialize, Serialize};
use swinglab_core::domain::TradeRecord;
use swinglab_core::engine::RunResult;

/// Aggregate performance metrics for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Total return as a percentage of starting cash — the search objective.
    pub total_return_pct: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub trade_count: usize,
}

impl PerformanceMetrics {
    pub fn compute(result: &RunResult) -> Self {
        Self {
            total_return_pct: result.total_return_pct(),
            max_drawdown: max_drawdown(&result.equity_curve),
            win_rate: win_rate(&result.trades),
            profit_factor: profit_factor(&result.trades),
            trade_count: result.trades.len(),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Maximum drawdown as a negative fraction (e.g., -0.15 = 15% drawdown).
///
/// Returns 0.0 if equity is constant or monotonically increasing.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let mut peak = equity_curve[0];
    let mut max_dd = 0.0_f64;

    for &eq in equity_curve {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Fraction of trades with positive net pnl. Zero trades → 0.0.
pub fn win_rate(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

/// Gross profit / gross loss. No losses → 0.0 (undefined), no trades → 0.0.
pub fn profit_factor(trades: &[TradeRecord]) -> f64 {
    let gross_profit: f64 = trades.iter().filter(|t| t.net_pnl > 0.0).map(|t| t.net_pnl).sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.net_pnl < 0.0)
        .map(|t| -t.net_pnl)
        .sum();
    if gross_loss < 1e-15 {
        return 0.0;
    }
    gross_profit / gross_loss
}
