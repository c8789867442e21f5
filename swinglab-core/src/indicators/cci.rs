//! Commodity Channel Index (CCI).
//!
//! CCI = (TP - SMA(TP, period)) / (0.015 * mean |TP - SMA|), where
//! TP = (high + low + close) / 3 is the typical price and the mean absolute
//! deviation is taken over the same window.
//! Lookback: period - 1. Zero deviation (flat window) → CCI = 0.

/// Compute CCI over high/low/close triples. Slices must be equal length.
pub fn cci(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    debug_assert_eq!(highs.len(), n);
    debug_assert_eq!(lows.len(), n);

    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let typical: Vec<f64> = (0..n)
        .map(|i| (highs[i] + lows[i] + closes[i]) / 3.0)
        .collect();

    for i in (period - 1)..n {
        let window = &typical[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let sma = window.iter().sum::<f64>() / period as f64;
        let mad = window.iter().map(|v| (v - sma).abs()).sum::<f64>() / period as f64;
        result[i] = if mad == 0.0 {
            0.0
        } else {
            (typical[i] - sma) / (0.015 * mad)
        };
    }

    result
}
