//! Level-triggered entry/exit flag policies.
//!
//! Flag generation is memoryless: each row is evaluated on its score and
//! strength alone, with no notion of "currently in a trade". All
//! order-dependent state lives in the trade pairing pass.

use crate::domain::scoring::{ScoredRow, Strength};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalPolicy {
    /// Entry when `score >= entry_score`, exit when `score < exit_score`.
    /// Requires `entry_score >= exit_score` so one row never flags both.
    Threshold { entry_score: u32, exit_score: u32 },
    /// Entry when `score >= entry_score` and strength is Strong, exit when
    /// `score <= exit_score` and strength is None.
    Edge { entry_score: u32, exit_score: u32 },
}

impl SignalPolicy {
    pub fn threshold() -> Self {
        SignalPolicy::Threshold {
            entry_score: 2,
            exit_score: 2,
        }
    }

    pub fn edge() -> Self {
        SignalPolicy::Edge {
            entry_score: 4,
            exit_score: 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SignalPolicy::Threshold { .. } => "threshold",
            SignalPolicy::Edge { .. } => "edge",
        }
    }

    pub fn entry(&self, row: &ScoredRow) -> bool {
        match self {
            SignalPolicy::Threshold { entry_score, .. } => row.score >= *entry_score,
            SignalPolicy::Edge { entry_score, .. } => {
                row.score >= *entry_score && row.strength == Strength::Strong
            }
        }
    }

    pub fn exit(&self, row: &ScoredRow) -> bool {
        match self {
            SignalPolicy::Threshold { exit_score, .. } => row.score < *exit_score,
            SignalPolicy::Edge { exit_score, .. } => {
                row.score <= *exit_score && row.strength == Strength::None
            }
        }
    }

    /// Flag every row. Stateless, order-preserving; one row never carries
    /// both flags under a valid policy.
    pub fn apply(&self, rows: &[ScoredRow]) -> Vec<SignaledRow> {
        rows.iter()
            .map(|scored| {
                let entry = self.entry(scored);
                let exit = self.exit(scored);
                debug_assert!(!(entry && exit), "policy flagged entry and exit on one row");
                SignaledRow {
                    scored: scored.clone(),
                    entry,
                    exit,
                }
            })
            .collect()
    }
}

/// A scored row together with its entry/exit flags.
#[derive(Debug, Clone, PartialEq)]
pub struct SignaledRow {
    pub scored: ScoredRow,
    pub entry: bool,
    pub exit: bool,
}

impl SignaledRow {
    pub fn period(&self) -> chrono::NaiveDate {
        self.scored.row.period
    }

    pub fn price(&self) -> f64 {
        self.scored.row.price
    }
}
