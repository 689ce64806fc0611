//! Pre-flight validation of configuration values, run before any data is
//! loaded.

use crate::domain::error::MacrosigError;
use crate::domain::scoring::RuleSet;
use crate::ports::config_port::ConfigPort;

const RULESET_NAMES: [&str; 2] = ["standard", "strict"];
const POLICY_NAMES: [&str; 2] = ["threshold", "edge"];

/// Validate the `[data]` section: a csv_path must be present.
pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), MacrosigError> {
    match config.get_string("data", "csv_path") {
        Some(path) if !path.trim().is_empty() => Ok(()),
        _ => Err(MacrosigError::ConfigMissing {
            section: "data".into(),
            key: "csv_path".into(),
        }),
    }
}

/// Validate the `[signals]` section: known names, sane thresholds.
pub fn validate_signals_config(config: &dyn ConfigPort) -> Result<(), MacrosigError> {
    let ruleset_name = config
        .get_string("signals", "ruleset")
        .unwrap_or_else(|| "standard".to_string());
    if !RULESET_NAMES.contains(&ruleset_name.as_str()) {
        return Err(MacrosigError::ConfigInvalid {
            section: "signals".into(),
            key: "ruleset".into(),
            reason: format!("unknown rule set '{ruleset_name}' (expected standard or strict)"),
        });
    }

    let policy_name = config
        .get_string("signals", "policy")
        .unwrap_or_else(|| "threshold".to_string());
    if !POLICY_NAMES.contains(&policy_name.as_str()) {
        return Err(MacrosigError::ConfigInvalid {
            section: "signals".into(),
            key: "policy".into(),
            reason: format!("unknown policy '{policy_name}' (expected threshold or edge)"),
        });
    }

    let quantile = config.get_double("signals", "confidence_quantile", 0.3);
    if !(0.0..=1.0).contains(&quantile) {
        return Err(MacrosigError::ConfigInvalid {
            section: "signals".into(),
            key: "confidence_quantile".into(),
            reason: format!("{quantile} is outside [0, 1]"),
        });
    }

    // by_name cannot fail here, the name was checked above
    let ruleset = RuleSet::by_name(&ruleset_name).expect("validated rule set name");
    let max_score = ruleset.max_score() as i64;

    let (default_entry, default_exit) = match policy_name.as_str() {
        "edge" => (4, 2),
        _ => (2, 2),
    };
    let entry_score = config.get_int("signals", "entry_score", default_entry);
    let exit_score = config.get_int("signals", "exit_score", default_exit);

    for (key, value) in [("entry_score", entry_score), ("exit_score", exit_score)] {
        if value < 0 || value > max_score {
            return Err(MacrosigError::ConfigInvalid {
                section: "signals".into(),
                key: key.into(),
                reason: format!("{value} is outside [0, {max_score}]"),
            });
        }
    }

    // a threshold policy with entry below exit would flag both on one row
    if policy_name == "threshold" && entry_score < exit_score {
        return Err(MacrosigError::ConfigInvalid {
            section: "signals".into(),
            key: "entry_score".into(),
            reason: format!("entry_score {entry_score} is below exit_score {exit_score}"),
        });
    }

    Ok(())
}
