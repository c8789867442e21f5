//! Bar replay loop — applies the swing strategy to a series, one pass,
//! chronological order.
//!
//! Per bar, three stages run in sequence: arm the entry signal (Flat),
//! fill the entry once the delay elapses (AwaitingEntry), then evaluate
//! exits (Open). Exits are only evaluated on bars strictly after the entry
//! bar, so a trade's exit index always exceeds its entry index. Intrabar
//! bracket checks use the worst-case ordering: stop-loss before take-profit.

use crate::domain::{ExitReason, MarketSeries, PositionState, StrategyParams, TradeRecord};
use crate::engine::state::{EngineConfig, RunResult};
use crate::error::SimulationError;

/// Stop-loss level as a fraction of entry price.
pub const STOP_LOSS_RATIO: f64 = 0.9;

/// Replay `series` under `params` and return the trade log and equity curve.
///
/// The series is never mutated; each call is a pure function of its inputs,
/// so concurrent trials can share one series by reference.
pub fn run_simulation(
    series: &MarketSeries,
    params: &StrategyParams,
    config: &EngineConfig,
) -> Result<RunResult, SimulationError> {
    params.validate()?;
    config.validate()?;
    let start = series.replay_start(params.entry_delay)?;

    let bars = series.bars();
    let last = bars.len() - 1;
    let mut cash = config.starting_cash;
    let mut state = PositionState::Flat;
    let mut trades: Vec<TradeRecord> = Vec::new();
    let mut equity_curve = Vec::with_capacity(bars.len() - start);

    for i in start..bars.len() {
        let bar = &bars[i];

        // Arm the entry signal. The signal bar is locked once set; later
        // qualifying bars while awaiting do not reset the countdown.
        if state.is_flat() && bar.rsi < params.rsi_thresh && bar.cci < params.cci_thresh {
            state = PositionState::AwaitingEntry { signal_bar: i };
        }

        // Fill the entry at the close once the delay has elapsed. Entries on
        // the final bar are skipped — the exit must land on a later bar.
        if let PositionState::AwaitingEntry { signal_bar } = state {
            if i - signal_bar >= params.entry_delay && i < last {
                let entry_price = bar.close;
                let stop_loss = entry_price * STOP_LOSS_RATIO;
                let take_profit = entry_price * (1.0 + params.tp_percent);
                // Bracket sanity guard; the signal stays armed if violated.
                if stop_loss < entry_price && entry_price < take_profit {
                    let quantity = cash / entry_price;
                    state = PositionState::Open {
                        entry_bar: i,
                        entry_price,
                        stop_loss,
                        take_profit,
                        quantity,
                    };
                }
            }
        }

        // Exit checks, only for positions opened on an earlier bar.
        if let PositionState::Open {
            entry_bar,
            entry_price,
            stop_loss,
            take_profit,
            quantity,
        } = state
        {
            if entry_bar > i {
                return Err(SimulationError::InvariantViolated(format!(
                    "position entered at bar {entry_bar} observed at bar {i}"
                )));
            }
            if entry_bar < i {
                let exit = if bar.low <= stop_loss {
                    Some((stop_loss, ExitReason::StopLoss))
                } else if bar.high >= take_profit {
                    Some((take_profit, ExitReason::TakeProfit))
                } else if i - entry_bar >= params.hold_period {
                    Some((bar.close, ExitReason::HoldExpired))
                } else if bar.macd_hist < params.macd_hist_thresh {
                    Some((bar.close, ExitReason::MacdReversal))
                } else {
                    None
                };

                if let Some((exit_price, exit_reason)) = exit {
                    let trade = close_trade(
                        bars,
                        entry_bar,
                        entry_price,
                        quantity,
                        i,
                        exit_price,
                        exit_reason,
                        config.commission_rate,
                    );
                    cash += trade.net_pnl;
                    trades.push(trade);
                    state = PositionState::Flat;
                }
            }
        }

        equity_curve.push(mark_equity(cash, &state, bar.close, config.commission_rate));
    }

    // Series end: force-close an open position at the last close; a pending
    // signal is discarded without penalty.
    if let PositionState::Open {
        entry_bar,
        entry_price,
        quantity,
        ..
    } = state
    {
        let trade = close_trade(
            bars,
            entry_bar,
            entry_price,
            quantity,
            last,
            bars[last].close,
            ExitReason::HoldExpired,
            config.commission_rate,
        );
        cash += trade.net_pnl;
        trades.push(trade);
        if let Some(final_mark) = equity_curve.last_mut() {
            *final_mark = cash;
        }
    }

    Ok(RunResult {
        params: params.clone(),
        trades,
        equity_curve,
        starting_cash: config.starting_cash,
        final_equity: cash,
    })
}

/// Settle a round trip: gross pnl on the price delta, commission on the
/// notional of each leg.
#[allow(clippy::too_many_arguments)]
fn close_trade(
    bars: &[crate::domain::Bar],
    entry_bar: usize,
    entry_price: f64,
    quantity: f64,
    exit_bar: usize,
    exit_price: f64,
    exit_reason: ExitReason,
    commission_rate: f64,
) -> TradeRecord {
    let gross_pnl = quantity * (exit_price - entry_price);
    let commission = commission_rate * quantity * (entry_price + exit_price);
    TradeRecord {
        entry_bar,
        entry_date: bars[entry_bar].date,
        entry_price,
        exit_bar,
        exit_date: bars[exit_bar].date,
        exit_price,
        exit_reason,
        quantity,
        gross_pnl,
        commission,
        net_pnl: gross_pnl - commission,
    }
}

/// Mark the account at the bar close. An open position carries its
/// entry-leg commission from the moment it is filled.
fn mark_equity(cash: f64, state: &PositionState, close: f64, commission_rate: f64) -> f64 {
    match *state {
        PositionState::Open {
            entry_price,
            quantity,
            ..
        } => cash + quantity * (close - entry_price) - commission_rate * quantity * entry_price,
        _ => cash,
    }
}
