//! Moving Average Convergence Divergence (MACD).
//!
//! MACD line = EMA(fast) - EMA(slow); signal = EMA(signal_period) of the
//! MACD line; histogram = macd - signal. Lookback of the full stack:
//! slow + signal_period - 2.

use super::ema::ema;

/// The three MACD output series, index-aligned with the input.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute MACD over close prices.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    let n = closes.len();
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let mut macd_line = vec![f64::NAN; n];
    for i in 0..n {
        if !fast_ema[i].is_nan() && !slow_ema[i].is_nan() {
            macd_line[i] = fast_ema[i] - slow_ema[i];
        }
    }

    // The MACD line starts with NaN warmup values; the signal EMA is seeded
    // from the first valid index and spliced back at the right offset.
    let mut signal = vec![f64::NAN; n];
    if let Some(first_valid) = macd_line.iter().position(|v| !v.is_nan()) {
        let tail_signal = ema(&macd_line[first_valid..], signal_period);
        for (offset, value) in tail_signal.into_iter().enumerate() {
            signal[first_valid + offset] = value;
        }
    }

    let mut histogram = vec![f64::NAN; n];
    for i in 0..n {
        if !macd_line[i].is_nan() && !signal[i].is_nan() {
            histogram[i] = macd_line[i] - signal[i];
        }
    }

    MacdSeries {
        macd: macd_line,
        signal,
        histogram,
    }
}
