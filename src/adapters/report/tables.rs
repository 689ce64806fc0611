//! Table formatting for reports.
//!
//! Generates Typst markup for the run-configuration block, the
//! current-status block, the performance summary, the trade log, and the
//! recent-signals table.

use crate::domain::pairing::TradeLedger;
use crate::domain::run::RunResult;
use crate::domain::signal::SignaledRow;
use crate::domain::summary::PerformanceSummary;

pub fn render_config_summary(result: &RunResult) -> String {
    let config = &result.config;
    let mut out = String::from("#table(\n  columns: 2,\n");
    out.push_str(&format!("  [*Rule set*], [{}],\n", config.ruleset.name));
    out.push_str(&format!("  [*Policy*], [{}],\n", config.policy.name()));
    out.push_str(&format!(
        "  [*Confidence quantile*], [{:.2}],\n",
        config.confidence_quantile
    ));
    out.push_str(&format!(
        "  [*Confidence threshold*], [{}],\n",
        result
            .confidence_threshold
            .map(|t| format!("{t:.2}"))
            .unwrap_or_else(|| "n/a".to_string())
    ));
    if let (Some(first), Some(last)) = (result.rows.first(), result.rows.last()) {
        out.push_str(&format!(
            "  [*Periods*], [{} to {} ({} rows)],\n",
            first.period().format("%Y-%m"),
            last.period().format("%Y-%m"),
            result.rows.len()
        ));
    }
    out.push_str(")\n\n");
    out
}

pub fn render_current_status(result: &RunResult) -> String {
    let Some(latest) = result.latest() else {
        return "_No data loaded._\n\n".to_string();
    };

    let position = match result.ledger.open_trade() {
        Some(trade) => format!(
            "in trade since {} at {:.2}",
            trade.entry_period.format("%Y-%m"),
            trade.entry_price
        ),
        None => "flat".to_string(),
    };

    let mut out = String::from("#table(\n  columns: 2,\n");
    out.push_str(&format!(
        "  [*Latest period*], [{}],\n",
        latest.period().format("%Y-%m")
    ));
    out.push_str(&format!("  [*Price*], [{:.2}],\n", latest.price()));
    out.push_str(&format!("  [*Score*], [{}],\n", latest.scored.score));
    out.push_str(&format!("  [*Strength*], [{}],\n", latest.scored.strength));
    out.push_str(&format!(
        "  [*Entry flag*], [{}],\n",
        if latest.entry { "yes" } else { "no" }
    ));
    out.push_str(&format!(
        "  [*Exit flag*], [{}],\n",
        if latest.exit { "yes" } else { "no" }
    ));
    out.push_str(&format!("  [*Position*], [{position}],\n"));
    out.push_str(")\n\n");
    out
}

pub fn render_summary_table(summary: &PerformanceSummary) -> String {
    let mut out = String::from("#table(\n  columns: 2,\n");

    match &summary.trade_stats {
        Some(stats) => {
            out.push_str(&format!(
                "  [*Average return*], [{:.2}%],\n",
                stats.avg_return_pct
            ));
            out.push_str(&format!("  [*Win rate*], [{:.1}%],\n", stats.win_rate_pct));
            out.push_str(&format!(
                "  [*Worst trade*], [{:.2}%],\n",
                stats.worst_trade_return_pct
            ));
            out.push_str(&format!(
                "  [*Closed trades*], [{} ({} won, {} lost)],\n",
                stats.closed, stats.won, stats.lost
            ));
        }
        None => {
            out.push_str("  [*Closed trades*], [none yet],\n");
        }
    }

    out.push_str(&format!(
        "  [*Price-path max drawdown*], [-{:.2}%],\n",
        summary.price_path_max_drawdown_pct
    ));
    out.push_str(")\n\n");
    out
}

pub fn render_trade_log(ledger: &TradeLedger) -> String {
    if ledger.is_empty() {
        return "// No trades recorded\n".to_string();
    }

    let mut out = String::from("#table(\n  columns: 7,\n");
    out.push_str("  [*#*], [*Entry*], [*Entry Price*], [*Exit*], [*Exit Price*], ");
    out.push_str("[*Return*], [*Status*],\n");

    for (i, trade) in ledger.trades.iter().enumerate() {
        let exit_period = trade
            .exit_period
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_else(|| "-".to_string());
        let exit_price = trade
            .exit_price
            .map(|p| format!("{p:.2}"))
            .unwrap_or_else(|| "-".to_string());
        let return_cell = match trade.return_pct {
            Some(ret) => {
                let color = if ret >= 0.0 { "green" } else { "red" };
                format!("text(fill: {color}, [{ret:.2}%])")
            }
            None => "[-]".to_string(),
        };

        out.push_str(&format!(
            "  [{}], [{}], [{:.2}], [{}], [{}], {}, [{}],\n",
            i + 1,
            trade.entry_period.format("%Y-%m"),
            trade.entry_price,
            exit_period,
            exit_price,
            return_cell,
            trade.status()
        ));
    }

    out.push_str(")\n\n");
    out
}

pub fn render_recent_signals(rows: &[SignaledRow], count: usize) -> String {
    if rows.is_empty() {
        return "// No signal data\n".to_string();
    }

    let start = rows.len().saturating_sub(count);
    let mut out = String::from("#table(\n  columns: 6,\n");
    out.push_str("  [*Period*], [*Price*], [*Score*], [*Strength*], [*Entry*], [*Exit*],\n");

    for row in &rows[start..] {
        out.push_str(&format!(
            "  [{}], [{:.2}], [{}], [{}], [{}], [{}],\n",
            row.period().format("%Y-%m"),
            row.price(),
            row.scored.score,
            row.scored.strength,
            if row.entry { "yes" } else { "" },
            if row.exit { "yes" } else { "" },
        ));
    }

    out.push_str(")\n\n");
    out
}
