//! One full scoring run: threshold → scores → flags → pairing → summary.
//!
//! A run is a pure batch computation over the loaded frame. Nothing is kept
//! between runs: the confidence threshold, the flag series, the ledger, and
//! the summary are all rebuilt from the current frame every time, so the
//! same frame and configuration always produce the same result.

use crate::domain::frame::IndicatorFrame;
use crate::domain::pairing::{pair_trades, TradeLedger};
use crate::domain::scoring::{score_rows, RuleSet, ScoreContext};
use crate::domain::signal::{SignalPolicy, SignaledRow};
use crate::domain::summary::PerformanceSummary;

/// Everything a run needs, passed explicitly rather than held in module
/// state.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub ruleset: RuleSet,
    pub policy: SignalPolicy,
    pub confidence_quantile: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            ruleset: RuleSet::standard(),
            policy: SignalPolicy::threshold(),
            confidence_quantile: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub config: RunConfig,
    pub rows: Vec<SignaledRow>,
    pub ledger: TradeLedger,
    pub summary: PerformanceSummary,
    pub confidence_threshold: Option<f64>,
}

impl RunResult {
    /// The most recent period's score, strength, and flags.
    pub fn latest(&self) -> Option<&SignaledRow> {
        self.rows.last()
    }
}

pub fn run(frame: &IndicatorFrame, config: &RunConfig) -> RunResult {
    let confidence_threshold = frame.confidence_quantile(config.confidence_quantile);
    let ctx = ScoreContext {
        confidence_threshold,
    };

    let scored = score_rows(frame.rows(), &config.ruleset, &ctx);
    let rows = config.policy.apply(&scored);
    let ledger = pair_trades(&rows);
    let summary = PerformanceSummary::compute(&ledger, &frame.prices());

    RunResult {
        config: config.clone(),
        rows,
        ledger,
        summary,
        confidence_threshold,
    }
}
