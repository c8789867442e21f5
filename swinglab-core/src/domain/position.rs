//! PositionState — the per-run strategy state machine.
//!
//! Exactly one state is live at any bar index. Transitions:
//! Flat → AwaitingEntry (signal fires) → Open (delay elapsed) → Flat (exit).
//! The armed signal bar is locked: further qualifying bars while awaiting do
//! not reset it, and it only clears on entry or at series end.

use serde::{Deserialize, Serialize};

/// Strategy position state during a single replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PositionState {
    /// No position, no armed signal.
    Flat,
    /// Entry signal armed at `signal_bar`, waiting out the entry delay.
    AwaitingEntry { signal_bar: usize },
    /// Long position with its bracket levels.
    Open {
        entry_bar: usize,
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
        quantity: f64,
    },
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, PositionState::Open { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_predicates() {
        assert!(PositionState::Flat.is_flat());
        assert!(!PositionState::Flat.is_open());

        let awaiting = PositionState::AwaitingEntry { signal_bar: 3 };
        assert!(!awaiting.is_flat());
        assert!(!awaiting.is_open());

        let open = PositionState::Open {
            entry_bar: 8,
            entry_price: 100.0,
            stop_loss: 90.0,
            take_profit: 130.0,
            quantity: 100.0,
        };
        assert!(open.is_open());
    }
}
