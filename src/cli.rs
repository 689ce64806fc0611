//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::{self, CsvFrameAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::report::TypstReportAdapter;
use crate::domain::config_validation::{validate_data_config, validate_signals_config};
use crate::domain::error::MacrosigError;
use crate::domain::run::{run as run_signals, RunConfig, RunResult};
use crate::domain::scoring::RuleSet;
use crate::domain::signal::SignalPolicy;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "macrosig",
    about = "Macro-conditions signal scorer and trade-ledger builder"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score the series, pair trades, and write a report
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the latest period's score, strength, and flags
    Status {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Write the frame augmented with score/strength/entry/exit columns
    Export {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the stored data range
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            output,
            csv,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, csv.as_ref())
            } else {
                run_report(&config, output.as_ref(), csv.as_ref())
            }
        }
        Command::Status { config, csv } => run_status(&config, csv.as_ref()),
        Command::Export {
            config,
            output,
            csv,
        } => run_export(&config, output.as_ref(), csv.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, csv } => run_info(&config, csv.as_ref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = MacrosigError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Assemble the run configuration from the `[signals]` section. Score
/// defaults follow the chosen policy.
pub fn build_run_config(adapter: &dyn ConfigPort) -> Result<RunConfig, MacrosigError> {
    let ruleset_name = adapter
        .get_string("signals", "ruleset")
        .unwrap_or_else(|| "standard".to_string());
    let ruleset = RuleSet::by_name(&ruleset_name).ok_or_else(|| MacrosigError::ConfigInvalid {
        section: "signals".into(),
        key: "ruleset".into(),
        reason: format!("unknown rule set '{ruleset_name}'"),
    })?;

    let policy_name = adapter
        .get_string("signals", "policy")
        .unwrap_or_else(|| "threshold".to_string());
    let policy = match policy_name.as_str() {
        "threshold" => SignalPolicy::Threshold {
            entry_score: adapter.get_int("signals", "entry_score", 2) as u32,
            exit_score: adapter.get_int("signals", "exit_score", 2) as u32,
        },
        "edge" => SignalPolicy::Edge {
            entry_score: adapter.get_int("signals", "entry_score", 4) as u32,
            exit_score: adapter.get_int("signals", "exit_score", 2) as u32,
        },
        other => {
            return Err(MacrosigError::ConfigInvalid {
                section: "signals".into(),
                key: "policy".into(),
                reason: format!("unknown policy '{other}'"),
            });
        }
    };

    Ok(RunConfig {
        ruleset,
        policy,
        confidence_quantile: adapter.get_double("signals", "confidence_quantile", 0.3),
    })
}

/// Resolve the CSV data adapter from `[data]`, honoring a `--csv` override.
pub fn build_data_adapter(
    adapter: &dyn ConfigPort,
    csv_override: Option<&PathBuf>,
) -> Result<CsvFrameAdapter, MacrosigError> {
    let path = match csv_override {
        Some(path) => path.clone(),
        None => adapter
            .get_string("data", "csv_path")
            .map(PathBuf::from)
            .ok_or_else(|| MacrosigError::ConfigMissing {
                section: "data".into(),
                key: "csv_path".into(),
            })?,
    };

    let mut data_port = CsvFrameAdapter::new(path);
    if let Some(column) = adapter.get_string("data", "price_column") {
        data_port = data_port.with_price_column(&column);
    }
    Ok(data_port)
}

fn validate_all(
    adapter: &FileConfigAdapter,
    csv_override: Option<&PathBuf>,
) -> Result<(), ExitCode> {
    if csv_override.is_none() {
        if let Err(e) = validate_data_config(adapter) {
            eprintln!("error: {e}");
            return Err(ExitCode::from(&e));
        }
    }
    if let Err(e) = validate_signals_config(adapter) {
        eprintln!("error: {e}");
        return Err(ExitCode::from(&e));
    }
    Ok(())
}

fn prepare(
    config_path: &PathBuf,
    csv_override: Option<&PathBuf>,
) -> Result<(FileConfigAdapter, RunConfig, CsvFrameAdapter), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_all(&adapter, csv_override)?;

    let run_config = build_run_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    let data_port = build_data_adapter(&adapter, csv_override).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;

    Ok((adapter, run_config, data_port))
}

fn fetch_and_run(data_port: &dyn DataPort, run_config: &RunConfig) -> Result<RunResult, ExitCode> {
    let frame = data_port.fetch_frame().map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    eprintln!("Loaded {} periods", frame.len());
    Ok(run_signals(&frame, run_config))
}

fn print_console_summary(result: &RunResult) {
    eprintln!("\n=== Signal Summary ===");
    eprintln!(
        "Rule set:          {} ({})",
        result.config.ruleset.name,
        result.config.policy.name()
    );
    if let Some(threshold) = result.confidence_threshold {
        eprintln!("Conf. threshold:   {threshold:.2}");
    }
    eprintln!(
        "Trades:            {} ({} closed, {} open)",
        result.ledger.len(),
        result.ledger.closed().count(),
        result.ledger.len() - result.ledger.closed().count()
    );

    match &result.summary.trade_stats {
        Some(stats) => {
            eprintln!("Avg Return:        {:.2}%", stats.avg_return_pct);
            eprintln!("Win Rate:          {:.1}%", stats.win_rate_pct);
            eprintln!("Worst Trade:       {:.2}%", stats.worst_trade_return_pct);
        }
        None => eprintln!("No closed trades yet."),
    }
    eprintln!(
        "Max Drawdown:      -{:.2}% (price path)",
        result.summary.price_path_max_drawdown_pct
    );
}

/// Stages shared by `run` after config resolution; split out so tests can
/// drive it with a mock data port.
pub fn run_report_pipeline(
    data_port: &dyn DataPort,
    run_config: &RunConfig,
    report_port: &dyn ReportPort,
    output_path: &str,
) -> ExitCode {
    let result = match fetch_and_run(data_port, run_config) {
        Ok(r) => r,
        Err(code) => return code,
    };

    print_console_summary(&result);

    match report_port.write(&result, output_path) {
        Ok(()) => {
            eprintln!("\nReport written to: {output_path}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_report(
    config_path: &PathBuf,
    output: Option<&PathBuf>,
    csv_override: Option<&PathBuf>,
) -> ExitCode {
    let (adapter, run_config, data_port) = match prepare(config_path, csv_override) {
        Ok(parts) => parts,
        Err(code) => return code,
    };

    let output_path = output
        .map(|p| p.display().to_string())
        .or_else(|| adapter.get_string("report", "output"))
        .unwrap_or_else(|| "report.typ".to_string());

    let report_port = match adapter.get_string("report", "template_path") {
        Some(path) => match fs::read_to_string(&path) {
            Ok(template) => TypstReportAdapter::with_template(template),
            Err(e) => {
                eprintln!("error: failed to read template {path}: {e}");
                return ExitCode::from(1);
            }
        },
        None => TypstReportAdapter::new(),
    };

    run_report_pipeline(&data_port, &run_config, &report_port, &output_path)
}

fn run_dry_run(config_path: &PathBuf, csv_override: Option<&PathBuf>) -> ExitCode {
    let (adapter, run_config, _) = match prepare(config_path, csv_override) {
        Ok(parts) => parts,
        Err(code) => return code,
    };

    let csv_path = csv_override
        .map(|p| p.display().to_string())
        .or_else(|| adapter.get_string("data", "csv_path"))
        .unwrap_or_default();

    eprintln!("Dry run: config is valid");
    eprintln!("  data:     {csv_path}");
    eprintln!(
        "  signals:  ruleset={} policy={} quantile={:.2}",
        run_config.ruleset.name,
        run_config.policy.name(),
        run_config.confidence_quantile
    );
    ExitCode::SUCCESS
}

fn run_status(config_path: &PathBuf, csv_override: Option<&PathBuf>) -> ExitCode {
    let (_, run_config, data_port) = match prepare(config_path, csv_override) {
        Ok(parts) => parts,
        Err(code) => return code,
    };

    let result = match fetch_and_run(&data_port, &run_config) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let Some(latest) = result.latest() else {
        println!("no data");
        return ExitCode::SUCCESS;
    };

    println!("period:   {}", latest.period().format("%Y-%m"));
    println!("price:    {:.2}", latest.price());
    println!("score:    {}/{}", latest.scored.score, result.config.ruleset.max_score());
    println!("strength: {}", latest.scored.strength);
    println!("entry:    {}", if latest.entry { "yes" } else { "no" });
    println!("exit:     {}", if latest.exit { "yes" } else { "no" });
    match result.ledger.open_trade() {
        Some(trade) => println!(
            "position: open since {} at {:.2}",
            trade.entry_period.format("%Y-%m"),
            trade.entry_price
        ),
        None => println!("position: flat"),
    }

    ExitCode::SUCCESS
}

fn run_export(
    config_path: &PathBuf,
    output: Option<&PathBuf>,
    csv_override: Option<&PathBuf>,
) -> ExitCode {
    let (adapter, run_config, data_port) = match prepare(config_path, csv_override) {
        Ok(parts) => parts,
        Err(code) => return code,
    };

    let result = match fetch_and_run(&data_port, &run_config) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let output_path = output
        .cloned()
        .or_else(|| adapter.get_string("report", "export_path").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("signals.csv"));

    match csv_adapter::write_signal_csv(&output_path, &result) {
        Ok(()) => {
            eprintln!("Signals written to: {}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(code) = validate_all(&adapter, None) {
        return code;
    }
    if let Err(e) = build_run_config(&adapter) {
        eprintln!("error: {e}");
        return ExitCode::from(&e);
    }
    eprintln!("Config OK: {}", config_path.display());
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, csv_override: Option<&PathBuf>) -> ExitCode {
    let (_, _, data_port) = match prepare(config_path, csv_override) {
        Ok(parts) => parts,
        Err(code) => return code,
    };

    match data_port.data_range() {
        Ok(Some((first, last, rows))) => {
            println!("{first} to {last} ({rows} periods)");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("no data");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}
