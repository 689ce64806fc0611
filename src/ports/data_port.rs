//! Data access port trait.
//!
//! The ingestion collaborator joins the price history with the macro series
//! and persists one record per period; implementations of this port load
//! that persisted series as an ordered frame.

use crate::domain::error::MacrosigError;
use crate::domain::frame::IndicatorFrame;
use chrono::NaiveDate;

pub trait DataPort {
    fn fetch_frame(&self) -> Result<IndicatorFrame, MacrosigError>;

    /// First period, last period, and row count of the stored series.
    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacrosigError>;
}
