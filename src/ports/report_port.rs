//! Report generation port trait.

use crate::domain::error::MacrosigError;
use crate::domain::run::RunResult;

/// Port for rendering a run: the flagged frame, the trade ledger, and the
/// performance summary.
pub trait ReportPort {
    fn write(&self, result: &RunResult, output_path: &str) -> Result<(), MacrosigError>;
}
