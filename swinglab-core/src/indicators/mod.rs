//! Indicator computations for the data-preparation layer.
//!
//! Pure series-in, series-out functions with the NaN-warmup convention:
//! values are NaN until the lookback window is full. The engine itself never
//! calls these — it consumes bars whose indicator columns are already filled,
//! either by [`enrich_bars`] or by an upstream data source.

pub mod cci;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use cci::cci;
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use rsi::rsi;

use crate::domain::Bar;

/// RSI lookback period.
pub const RSI_PERIOD: usize = 14;
/// MACD fast EMA period.
pub const MACD_FAST: usize = 12;
/// MACD slow EMA period.
pub const MACD_SLOW: usize = 26;
/// MACD signal EMA period.
pub const MACD_SIGNAL: usize = 9;
/// CCI lookback period.
pub const CCI_PERIOD: usize = 20;

/// Fill the indicator columns of plain OHLCV bars.
///
/// Uses the standard parameter set: RSI(14), MACD(12, 26, 9), CCI(20).
/// Bars inside the warmup window keep NaN indicator values.
pub fn enrich_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

    let rsi_values = rsi(&closes, RSI_PERIOD);
    let macd_values = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let cci_values = cci(&highs, &lows, &closes, CCI_PERIOD);

    for (i, bar) in bars.iter_mut().enumerate() {
        bar.rsi = rsi_values[i];
        bar.cci = cci_values[i];
        bar.macd = macd_values.macd[i];
        bar.macd_signal = macd_values.signal[i];
        bar.macd_hist = macd_values.histogram[i];
    }

    bars
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
