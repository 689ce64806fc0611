//! Typst-based report generation.
//!
//! Orchestrates placeholder resolution: reads a Typst template (either the
//! built-in default or a custom one), resolves all `{{PLACEHOLDER}}` markers
//! by calling helpers from `chart` and `tables`, and writes the final
//! `.typ` file through [`ReportPort`].

pub mod chart;
pub mod default_template;
pub mod tables;

use std::fs;

use crate::domain::error::MacrosigError;
use crate::domain::run::RunResult;
use crate::ports::report_port::ReportPort;

/// Resolve all `{{PLACEHOLDER}}`s in the template and return the final
/// Typst markup ready to be written to a `.typ` file.
pub fn resolve(template: &str, result: &RunResult) -> String {
    let mut output = template.to_string();

    output = output.replace(
        "{{CONFIG_SUMMARY}}",
        &tables::render_config_summary(result),
    );
    output = output.replace(
        "{{CURRENT_STATUS}}",
        &tables::render_current_status(result),
    );
    output = output.replace(
        "{{SUMMARY_TABLE}}",
        &tables::render_summary_table(&result.summary),
    );
    output = output.replace("{{PRICE_CHART}}", &chart::format_price_chart(&result.rows));
    output = output.replace(
        "{{DRAWDOWN_CHART}}",
        &chart::format_drawdown_chart(&result.rows),
    );
    output = output.replace("{{TRADE_LOG}}", &tables::render_trade_log(&result.ledger));
    output = output.replace(
        "{{RECENT_SIGNALS}}",
        &tables::render_recent_signals(&result.rows, 12),
    );

    output
}

/// Writes the resolved report to disk. Holds a custom template when the
/// config points at one, otherwise uses the built-in default.
#[derive(Default)]
pub struct TypstReportAdapter {
    template: Option<String>,
}

impl TypstReportAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(template: String) -> Self {
        Self {
            template: Some(template),
        }
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(&self, result: &RunResult, output_path: &str) -> Result<(), MacrosigError> {
        let template = self
            .template
            .as_deref()
            .unwrap_or_else(|| default_template::template());
        let content = resolve(template, result);
        fs::write(output_path, content)?;
        Ok(())
    }
}
