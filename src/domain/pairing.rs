//! Pairs the flagged series into non-overlapping trades.
//!
//! A strict single forward pass over the rows in period order: each entry is
//! matched with the next qualifying exit after it, never an earlier one, and
//! at most one position is open at any time. The position state lives only
//! here, never in the per-row records.

use chrono::NaiveDate;

use crate::domain::signal::SignaledRow;

/// A matched entry/exit pair, or an entry still awaiting its exit.
/// Closed exactly once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_period: NaiveDate,
    pub entry_price: f64,
    pub exit_period: Option<NaiveDate>,
    pub exit_price: Option<f64>,
    pub return_pct: Option<f64>,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.exit_period.is_some()
    }

    pub fn status(&self) -> &'static str {
        if self.is_closed() { "closed" } else { "open" }
    }
}

/// All trades of one run, in entry order. Rebuilt from scratch every run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeLedger {
    pub trades: Vec<Trade>,
}

impl TradeLedger {
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn closed(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.is_closed())
    }

    pub fn open_trade(&self) -> Option<&Trade> {
        self.trades.iter().find(|t| !t.is_closed())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PositionState {
    Flat,
    InTrade {
        entry_period: NaiveDate,
        entry_price: f64,
    },
}

/// Single pass, O(rows), no backtracking.
///
/// Flat + entry flag opens a trade; in-trade + exit flag closes it. An entry
/// while in a trade is ignored (no pyramiding), an exit while flat is ignored
/// (nothing to close). If the series ends in a trade, that trade stays in the
/// ledger as open.
pub fn pair_trades(rows: &[SignaledRow]) -> TradeLedger {
    let mut ledger = TradeLedger::default();
    let mut state = PositionState::Flat;

    for row in rows {
        match state {
            PositionState::Flat => {
                if row.entry {
                    state = PositionState::InTrade {
                        entry_period: row.period(),
                        entry_price: row.price(),
                    };
                }
            }
            PositionState::InTrade {
                entry_period,
                entry_price,
            } => {
                if row.exit {
                    let exit_price = row.price();
                    ledger.trades.push(Trade {
                        entry_period,
                        entry_price,
                        exit_period: Some(row.period()),
                        exit_price: Some(exit_price),
                        return_pct: Some((exit_price - entry_price) / entry_price * 100.0),
                    });
                    state = PositionState::Flat;
                }
            }
        }
    }

    if let PositionState::InTrade {
        entry_period,
        entry_price,
    } = state
    {
        ledger.trades.push(Trade {
            entry_period,
            entry_price,
            exit_period: None,
            exit_price: None,
            return_pct: None,
        });
    }

    ledger
}
