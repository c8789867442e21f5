//! TradeRecord — a completed round-trip trade.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// The bar's low reached the stop-loss level.
    StopLoss,
    /// The bar's high reached the take-profit level.
    TakeProfit,
    /// The hold period elapsed (includes the forced close at series end).
    HoldExpired,
    /// The MACD histogram dropped below its threshold.
    MacdReversal,
}

/// A complete entry → exit round trip.
///
/// `commission` covers both legs; `net_pnl = gross_pnl - commission`.
/// The exit bar is always strictly after the entry bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,

    pub exit_bar: usize,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub exit_reason: ExitReason,

    pub quantity: f64,
    pub gross_pnl: f64,
    pub commission: f64,
    pub net_pnl: f64,
}

impl TradeRecord {
    pub fn bars_held(&self) -> usize {
        self.exit_bar - self.entry_bar
    }

    /// Return on the trade as a fraction of entry cost.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 || self.quantity == 0.0 {
            return 0.0;
        }
        self.net_pnl / (self.entry_price * self.quantity)
    }

    pub fn is_winner(&self) -> bool {
        self.net_pnl > 0.0
    }
}
