//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single day, extended with precomputed indicator columns.
///
/// The engine never computes indicators during replay; the five indicator
/// fields are filled by `indicators::enrich_bars` (or arrive precomputed from
/// the data layer) and are NaN for bars inside the warmup window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,

    /// Relative Strength Index, 0-100.
    pub rsi: f64,
    /// Commodity Channel Index, unbounded.
    pub cci: f64,
    /// MACD line (fast EMA - slow EMA).
    pub macd: f64,
    /// Signal line (EMA of the MACD line).
    pub macd_signal: f64,
    /// MACD histogram (macd - signal).
    pub macd_hist: f64,
}

impl Bar {
    /// A bar with price columns only; indicator fields start as NaN.
    pub fn from_ohlcv(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            rsi: f64::NAN,
            cci: f64::NAN,
            macd: f64::NAN,
            macd_signal: f64::NAN,
            macd_hist: f64::NAN,
        }
    }

    /// Returns true if any price field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, range contains open and close,
    /// prices positive.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }

    /// Returns true if every indicator column has a value.
    pub fn has_indicators(&self) -> bool {
        !self.rsi.is_nan()
            && !self.cci.is_nan()
            && !self.macd.is_nan()
            && !self.macd_signal.is_nan()
            && !self.macd_hist.is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        let mut bar = Bar::from_ohlcv(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            100.0,
            105.0,
            98.0,
            103.0,
            50_000,
        );
        bar.rsi = 45.0;
        bar.cci = -20.0;
        bar.macd = 0.5;
        bar.macd_signal = 0.3;
        bar.macd_hist = 0.2;
        bar
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn fresh_bar_has_no_indicators() {
        let bar = Bar::from_ohlcv(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            100.0,
            101.0,
            99.0,
            100.5,
            1000,
        );
        assert!(!bar.has_indicators());
        assert!(bar.is_sane());
    }

    #[test]
    fn full_indicator_set_detected() {
        assert!(sample_bar().has_indicators());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar.date, deser.date);
        assert_eq!(bar.close, deser.close);
        assert_eq!(bar.cci, deser.cci);
    }
}
