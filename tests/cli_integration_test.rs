//! CLI integration tests: config assembly, validation, and the report and
//! export pipelines driven end-to-end with real files on disk.

mod common;

use common::*;
use macrosig::adapters::file_config_adapter::FileConfigAdapter;
use macrosig::adapters::report::TypstReportAdapter;
use macrosig::cli::{self, Cli, Command};
use macrosig::domain::config_validation::{validate_data_config, validate_signals_config};
use macrosig::domain::error::MacrosigError;
use macrosig::domain::scoring::Strength;
use macrosig::domain::signal::SignalPolicy;
use std::fs;
use std::path::PathBuf;

const VALID_INI: &str = r#"
[data]
csv_path = bkx_data.csv

[signals]
ruleset = standard
policy = threshold
entry_score = 2
exit_score = 2
confidence_quantile = 0.3

[report]
output = report.typ
"#;

const SAMPLE_CSV: &str = "\
Date,BKX_Price,CCI,PMI,Claims,Yield_Curve,CCI_Change_1M,Claims_YoY\n\
2023-01-01,100.0,55.0,48.0,210000,-0.2,,1.5\n\
2023-02-01,110.0,56.0,52.0,208000,0.4,1.0,-2.0\n\
2023-03-01,120.0,58.0,53.0,205000,0.5,2.0,-2.5\n\
2023-04-01,90.0,90.0,45.0,230000,-0.5,32.0,5.0\n";

mod config_loading {
    use super::*;

    #[test]
    fn build_run_config_defaults() {
        let adapter = FileConfigAdapter::from_string("[signals]\n").unwrap();
        let config = cli::build_run_config(&adapter).unwrap();

        assert_eq!(config.ruleset.name, "standard");
        assert_eq!(
            config.policy,
            SignalPolicy::Threshold {
                entry_score: 2,
                exit_score: 2
            }
        );
        assert_eq!(config.confidence_quantile, 0.3);
    }

    #[test]
    fn build_run_config_full() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_run_config(&adapter).unwrap();
        assert_eq!(config.ruleset.name, "standard");
        assert_eq!(config.policy.name(), "threshold");
    }

    #[test]
    fn build_run_config_edge_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[signals]\npolicy = edge\n").unwrap();
        let config = cli::build_run_config(&adapter).unwrap();
        assert_eq!(
            config.policy,
            SignalPolicy::Edge {
                entry_score: 4,
                exit_score: 2
            }
        );
    }

    #[test]
    fn build_run_config_strict_ruleset() {
        let adapter =
            FileConfigAdapter::from_string("[signals]\nruleset = strict\n").unwrap();
        let config = cli::build_run_config(&adapter).unwrap();
        assert_eq!(config.ruleset.name, "strict");
        assert_eq!(config.ruleset.medium_score, 3);
    }

    #[test]
    fn build_run_config_rejects_unknown_names() {
        let adapter =
            FileConfigAdapter::from_string("[signals]\nruleset = bogus\n").unwrap();
        let err = cli::build_run_config(&adapter).unwrap_err();
        assert!(matches!(err, MacrosigError::ConfigInvalid { key, .. } if key == "ruleset"));

        let adapter =
            FileConfigAdapter::from_string("[signals]\npolicy = bogus\n").unwrap();
        let err = cli::build_run_config(&adapter).unwrap_err();
        assert!(matches!(err, MacrosigError::ConfigInvalid { key, .. } if key == "policy"));
    }

    #[test]
    fn build_data_adapter_requires_csv_path() {
        let adapter = FileConfigAdapter::from_string("[data]\n").unwrap();
        let err = cli::build_data_adapter(&adapter, None).unwrap_err();
        assert!(matches!(err, MacrosigError::ConfigMissing { key, .. } if key == "csv_path"));
    }

    #[test]
    fn build_data_adapter_honors_override() {
        let adapter = FileConfigAdapter::from_string("[data]\n").unwrap();
        let override_path = PathBuf::from("/tmp/other.csv");
        assert!(cli::build_data_adapter(&adapter, Some(&override_path)).is_ok());
    }

    #[test]
    fn validate_accepts_valid_ini() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        assert!(validate_data_config(&adapter).is_ok());
        assert!(validate_signals_config(&adapter).is_ok());
    }
}

mod pipeline {
    use super::*;
    use macrosig::cli::run_report_pipeline;

    #[test]
    fn report_pipeline_with_mock_port_writes_report() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("report.typ");

        let port = MockDataPort::new().with_rows(monthly(
            2023,
            5,
            &[100.0, 110.0, 120.0, 130.0, 90.0],
            &[1, 2, 4, 4, 1],
        ));
        let run_config = macrosig::domain::run::RunConfig::default();
        let report = TypstReportAdapter::new();

        run_report_pipeline(&port, &run_config, &report, output.to_str().unwrap());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("Macro Signal Report"));
        assert!(content.contains("[closed]"));
        assert!(content.contains("Average return"));
    }

    #[test]
    fn report_pipeline_with_failing_port_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("report.typ");

        let port = MockDataPort::new().with_error("backend unavailable");
        let run_config = macrosig::domain::run::RunConfig::default();
        let report = TypstReportAdapter::new();

        run_report_pipeline(&port, &run_config, &report, output.to_str().unwrap());
        assert!(!output.exists());
    }

    #[test]
    fn report_pipeline_no_closed_trades() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("report.typ");

        // entries only, the position never closes
        let port =
            MockDataPort::new().with_rows(monthly(2023, 3, &[100.0, 105.0, 110.0], &[2, 3, 4]));
        let run_config = macrosig::domain::run::RunConfig::default();
        let report = TypstReportAdapter::new();

        run_report_pipeline(&port, &run_config, &report, output.to_str().unwrap());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("none yet"));
        assert!(content.contains("[open]"));
    }
}

mod end_to_end {
    use super::*;

    struct Workspace {
        dir: tempfile::TempDir,
        config: PathBuf,
        csv: PathBuf,
    }

    fn workspace() -> Workspace {
        let dir = tempfile::TempDir::new().unwrap();
        let csv = dir.path().join("bkx_data.csv");
        fs::write(&csv, SAMPLE_CSV).unwrap();

        let config = dir.path().join("macrosig.ini");
        let ini = format!(
            "[data]\ncsv_path = {}\n\n[signals]\nruleset = standard\npolicy = threshold\n",
            csv.display()
        );
        fs::write(&config, ini).unwrap();

        Workspace { dir, config, csv }
    }

    #[test]
    fn run_command_writes_report() {
        let ws = workspace();
        let output = ws.dir.path().join("out.typ");

        let _ = cli::run(Cli {
            command: Command::Run {
                config: ws.config.clone(),
                output: Some(output.clone()),
                csv: None,
                dry_run: false,
            },
        });

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("Macro Signal Report"));
        assert!(!content.contains("{{"));
    }

    #[test]
    fn run_command_dry_run_writes_nothing() {
        let ws = workspace();
        let output = ws.dir.path().join("out.typ");

        let _ = cli::run(Cli {
            command: Command::Run {
                config: ws.config.clone(),
                output: Some(output.clone()),
                csv: None,
                dry_run: true,
            },
        });

        assert!(!output.exists());
    }

    #[test]
    fn export_command_writes_signal_csv() {
        let ws = workspace();
        let output = ws.dir.path().join("signals.csv");

        let _ = cli::run(Cli {
            command: Command::Export {
                config: ws.config.clone(),
                output: Some(output.clone()),
                csv: None,
            },
        });

        let content = fs::read_to_string(&output).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("Signal_Score"));
        assert!(header.contains("Signal_Strength"));
        assert_eq!(lines.count(), 4);
    }

    #[test]
    fn csv_override_replaces_config_path() {
        let ws = workspace();
        let other_csv = ws.dir.path().join("other.csv");
        fs::write(&other_csv, SAMPLE_CSV).unwrap();

        // config with a bogus csv_path still works when --csv points at data
        let config = ws.dir.path().join("bad_data.ini");
        fs::write(&config, "[data]\ncsv_path = /nonexistent.csv\n[signals]\n").unwrap();

        let output = ws.dir.path().join("out.typ");
        let _ = cli::run(Cli {
            command: Command::Run {
                config,
                output: Some(output.clone()),
                csv: Some(other_csv),
                dry_run: false,
            },
        });

        assert!(output.exists());
    }

    #[test]
    fn scored_export_matches_expected_flags() {
        // CSV scores by hand: row1 scores 1 (change only from derivation? none)
        // verified through the domain: load the same file and compare
        let ws = workspace();
        let adapter = macrosig::adapters::csv_adapter::CsvFrameAdapter::new(ws.csv.clone());
        let frame = {
            use macrosig::ports::data_port::DataPort;
            adapter.fetch_frame().unwrap()
        };
        let result = macrosig::domain::run::run(
            &frame,
            &macrosig::domain::run::RunConfig::default(),
        );

        // 2023-02: confidence 56 above threshold (q30 of 55,56,58,90 ≈ 55.9
        // → 55 below only for Jan), change +1, pmi 52, curve 0.4, claims -2
        let feb = &result.rows[1];
        assert_eq!(feb.scored.score, 4);
        assert_eq!(feb.scored.strength, Strength::Strong);
        assert!(feb.entry);

        // 2023-04: everything deteriorates, claims up, curve negative
        let apr = &result.rows[3];
        assert!(apr.scored.score < 2);
        assert!(apr.exit);

        // one closed trade: Feb entry, Apr exit
        assert_eq!(result.ledger.closed().count(), 1);
        let trade = &result.ledger.trades[0];
        assert_eq!(trade.entry_period, date(2023, 2, 1));
        assert_eq!(trade.exit_period, Some(date(2023, 4, 1)));
    }
}
