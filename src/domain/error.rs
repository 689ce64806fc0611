//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for macrosig.
#[derive(Debug, thiserror::Error)]
pub enum MacrosigError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("periods out of order: {next} does not follow {prev}")]
    NonMonotonicPeriods { prev: NaiveDate, next: NaiveDate },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MacrosigError> for std::process::ExitCode {
    fn from(err: &MacrosigError) -> Self {
        let code: u8 = match err {
            MacrosigError::Io(_) => 1,
            MacrosigError::ConfigParse { .. }
            | MacrosigError::ConfigMissing { .. }
            | MacrosigError::ConfigInvalid { .. } => 2,
            MacrosigError::Data { .. } => 3,
            MacrosigError::NonMonotonicPeriods { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
