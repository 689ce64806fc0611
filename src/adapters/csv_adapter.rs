//! CSV file data adapter.
//!
//! Reads the per-period CSV the ingestion collaborator persists (one record
//! per month: asset price plus macro indicators) and writes the augmented
//! signal export. Columns are resolved by header name because the ingestion
//! file carries extra research columns that are tolerated and ignored here.
//! Empty fields mean "no value" and load as `None`.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::error::MacrosigError;
use crate::domain::frame::{IndicatorFrame, IndicatorRow};
use crate::domain::run::RunResult;
use crate::ports::data_port::DataPort;

const DATE_COLUMN: &str = "Date";
const DEFAULT_PRICE_COLUMN: &str = "BKX_Price";
const CONFIDENCE_COLUMN: &str = "CCI";
const CONFIDENCE_CHANGE_COLUMN: &str = "CCI_Change_1M";
const PMI_COLUMN: &str = "PMI";
const CLAIMS_COLUMN: &str = "Claims";
const CLAIMS_YOY_COLUMN: &str = "Claims_YoY";
const YIELD_CURVE_COLUMN: &str = "Yield_Curve";

#[derive(Debug)]
pub struct CsvFrameAdapter {
    path: PathBuf,
    price_column: String,
}

impl CsvFrameAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            price_column: DEFAULT_PRICE_COLUMN.to_string(),
        }
    }

    pub fn with_price_column(mut self, name: &str) -> Self {
        self.price_column = name.to_string();
        self
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn required_index(headers: &StringRecord, name: &str) -> Result<usize, MacrosigError> {
    column_index(headers, name).ok_or_else(|| MacrosigError::Data {
        reason: format!("missing column '{name}'"),
    })
}

fn optional_field(
    record: &StringRecord,
    index: Option<usize>,
    name: &str,
    line: usize,
) -> Result<Option<f64>, MacrosigError> {
    let Some(index) = index else {
        return Ok(None);
    };
    match record.get(index).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<f64>().map(Some).map_err(|e| MacrosigError::Data {
            reason: format!("line {line}: invalid {name} value '{raw}': {e}"),
        }),
    }
}

impl DataPort for CsvFrameAdapter {
    fn fetch_frame(&self) -> Result<IndicatorFrame, MacrosigError> {
        let content = fs::read_to_string(&self.path).map_err(|e| MacrosigError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| MacrosigError::Data {
                reason: format!("CSV header error: {e}"),
            })?
            .clone();

        let date_idx = required_index(&headers, DATE_COLUMN)?;
        let price_idx = required_index(&headers, &self.price_column)?;
        let confidence_idx = column_index(&headers, CONFIDENCE_COLUMN);
        let confidence_change_idx = column_index(&headers, CONFIDENCE_CHANGE_COLUMN);
        let pmi_idx = column_index(&headers, PMI_COLUMN);
        let claims_idx = column_index(&headers, CLAIMS_COLUMN);
        let claims_yoy_idx = column_index(&headers, CLAIMS_YOY_COLUMN);
        let yield_curve_idx = column_index(&headers, YIELD_CURVE_COLUMN);

        let mut rows = Vec::new();

        for (i, result) in rdr.records().enumerate() {
            let line = i + 2; // header is line 1
            let record = result.map_err(|e| MacrosigError::Data {
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str = record.get(date_idx).unwrap_or("").trim();
            let period =
                NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| MacrosigError::Data {
                    reason: format!("line {line}: invalid date '{date_str}': {e}"),
                })?;

            let price_str = record.get(price_idx).unwrap_or("").trim();
            let price: f64 = price_str.parse().map_err(|e| MacrosigError::Data {
                reason: format!("line {line}: invalid price '{price_str}': {e}"),
            })?;
            if price <= 0.0 {
                return Err(MacrosigError::Data {
                    reason: format!("line {line}: price {price} is not positive"),
                });
            }

            rows.push(IndicatorRow {
                period,
                price,
                confidence: optional_field(&record, confidence_idx, CONFIDENCE_COLUMN, line)?,
                confidence_change: optional_field(
                    &record,
                    confidence_change_idx,
                    CONFIDENCE_CHANGE_COLUMN,
                    line,
                )?,
                pmi: optional_field(&record, pmi_idx, PMI_COLUMN, line)?,
                claims: optional_field(&record, claims_idx, CLAIMS_COLUMN, line)?,
                claims_yoy: optional_field(&record, claims_yoy_idx, CLAIMS_YOY_COLUMN, line)?,
                yield_curve: optional_field(&record, yield_curve_idx, YIELD_CURVE_COLUMN, line)?,
            });
        }

        // no sorting here: out-of-order input is a data-quality failure
        IndicatorFrame::new(rows)
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacrosigError> {
        let frame = self.fetch_frame()?;
        Ok(frame
            .period_range()
            .map(|(first, last)| (first, last, frame.len())))
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the frame augmented with score/strength/entry/exit columns, the
/// layout the downstream dashboard reads. Flags are 1/0, absent values are
/// empty fields.
pub fn write_signal_csv(path: &std::path::Path, result: &RunResult) -> Result<(), MacrosigError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| MacrosigError::Data {
        reason: format!("failed to open {}: {}", path.display(), e),
    })?;

    wtr.write_record([
        DATE_COLUMN,
        DEFAULT_PRICE_COLUMN,
        CONFIDENCE_COLUMN,
        CONFIDENCE_CHANGE_COLUMN,
        PMI_COLUMN,
        CLAIMS_COLUMN,
        CLAIMS_YOY_COLUMN,
        YIELD_CURVE_COLUMN,
        "Signal_Score",
        "Signal_Strength",
        "Entry_Signal",
        "Exit_Signal",
    ])
    .map_err(|e| MacrosigError::Data {
        reason: format!("CSV write error: {e}"),
    })?;

    for row in &result.rows {
        let r = &row.scored.row;
        wtr.write_record([
            r.period.format("%Y-%m-%d").to_string(),
            r.price.to_string(),
            format_optional(r.confidence),
            format_optional(r.confidence_change),
            format_optional(r.pmi),
            format_optional(r.claims),
            format_optional(r.claims_yoy),
            format_optional(r.yield_curve),
            row.scored.score.to_string(),
            row.scored.strength.to_string(),
            u8::from(row.entry).to_string(),
            u8::from(row.exit).to_string(),
        ])
        .map_err(|e| MacrosigError::Data {
            reason: format!("CSV write error: {e}"),
        })?;
    }

    wtr.flush().map_err(|e| MacrosigError::Data {
        reason: format!("CSV flush error: {e}"),
    })?;
    Ok(())
}
