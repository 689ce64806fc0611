//! Realized-return statistics over the trade ledger.

use crate::domain::pairing::TradeLedger;

/// Statistics over the closed trades of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeStats {
    pub closed: usize,
    pub won: usize,
    pub lost: usize,
    pub avg_return_pct: f64,
    pub win_rate_pct: f64,
    /// The most negative single-trade return. A different measure from the
    /// price-path drawdown; the two are reported under separate names.
    pub worst_trade_return_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    /// `None` while no trade has closed; "no data" is not a zero return.
    pub trade_stats: Option<TradeStats>,
    /// Largest peak-to-trough decline of the raw price series over the whole
    /// history (not just periods spent in a trade), as a positive percent.
    pub price_path_max_drawdown_pct: f64,
}

impl PerformanceSummary {
    pub fn compute(ledger: &TradeLedger, prices: &[f64]) -> Self {
        PerformanceSummary {
            trade_stats: compute_trade_stats(ledger),
            price_path_max_drawdown_pct: price_path_max_drawdown(prices),
        }
    }
}

fn compute_trade_stats(ledger: &TradeLedger) -> Option<TradeStats> {
    let returns: Vec<f64> = ledger.closed().filter_map(|t| t.return_pct).collect();
    if returns.is_empty() {
        return None;
    }

    let closed = returns.len();
    let won = returns.iter().filter(|&&r| r > 0.0).count();
    let lost = returns.iter().filter(|&&r| r < 0.0).count();
    let avg_return_pct = returns.iter().sum::<f64>() / closed as f64;
    let worst_trade_return_pct = returns.iter().copied().fold(f64::INFINITY, f64::min);

    Some(TradeStats {
        closed,
        won,
        lost,
        avg_return_pct,
        win_rate_pct: won as f64 / closed as f64 * 100.0,
        worst_trade_return_pct,
    })
}

/// Maximum decline from the running maximum of the price series, percent.
/// Zero for an empty or never-declining series.
pub fn price_path_max_drawdown(prices: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for &price in prices {
        if price > peak {
            peak = price;
        }
        if peak > 0.0 {
            let dd = (peak - price) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
