//! MarketSeries — validated, ordered bar container.
//!
//! Built once by the data layer, then read-only for the lifetime of a search.
//! Validation happens at construction so every simulation trial can assume a
//! clean series and only re-check the replay window for its own entry delay.

use serde::{Deserialize, Serialize};

use super::bar::Bar;
use crate::error::DataError;

/// An ordered sequence of bars with strictly increasing dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSeries {
    bars: Vec<Bar>,
}

impl MarketSeries {
    /// Validate and wrap a bar sequence.
    ///
    /// Rejects empty input, non-advancing dates, and bars that fail the OHLC
    /// sanity check. Indicator gaps are not checked here — they depend on the
    /// replay window, see [`MarketSeries::replay_start`].
    pub fn new(bars: Vec<Bar>) -> Result<Self, DataError> {
        if bars.is_empty() {
            return Err(DataError::EmptySeries);
        }
        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_sane() {
                return Err(DataError::InsaneBar { index: i });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(DataError::NonMonotonicDates {
                    index: i,
                    date: bar.date,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Index of the first bar whose indicator columns are all present.
    pub fn first_ready(&self) -> Option<usize> {
        self.bars.iter().position(Bar::has_indicators)
    }

    /// Validate the replay window for a given entry delay and return its
    /// start index.
    ///
    /// The window runs from the first indicator-ready bar to the end of the
    /// series. Within it, every bar must carry a full indicator set (the
    /// engine does not interpolate), and it must hold at least
    /// `entry_delay + 1` bars so a signal on the first bar can reach entry.
    pub fn replay_start(&self, entry_delay: usize) -> Result<usize, DataError> {
        let start = self.first_ready().ok_or(DataError::NoIndicatorData)?;
        for (offset, bar) in self.bars[start..].iter().enumerate() {
            if !bar.has_indicators() {
                return Err(DataError::IndicatorGap {
                    index: start + offset,
                });
            }
        }
        let available = self.bars.len() - start;
        let required = entry_delay + 1;
        if available < required {
            return Err(DataError::InsufficientLength {
                required,
                actual: available,
            });
        }
        Ok(start)
    }
}
