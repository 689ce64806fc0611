#![allow(dead_code)]

use chrono::NaiveDate;
use macrosig::domain::error::MacrosigError;
use macrosig::domain::frame::{IndicatorFrame, IndicatorRow};
use macrosig::ports::data_port::DataPort;

pub struct MockDataPort {
    pub rows: Vec<IndicatorRow>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            error: None,
        }
    }

    pub fn with_rows(mut self, rows: Vec<IndicatorRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_frame(&self) -> Result<IndicatorFrame, MacrosigError> {
        if let Some(reason) = &self.error {
            return Err(MacrosigError::Data {
                reason: reason.clone(),
            });
        }
        IndicatorFrame::new(self.rows.clone())
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacrosigError> {
        let frame = self.fetch_frame()?;
        Ok(frame
            .period_range()
            .map(|(first, last)| (first, last, frame.len())))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn bare_row(period: NaiveDate, price: f64) -> IndicatorRow {
    IndicatorRow {
        period,
        price,
        confidence: None,
        confidence_change: None,
        pmi: None,
        claims: None,
        claims_yoy: None,
        yield_curve: None,
    }
}

/// A row whose standard-rule score is controlled exactly.
///
/// The confidence level is pinned to one constant for every row, so the
/// strict below-threshold comparison never fires; the remaining four rules
/// are toggled individually. Reachable scores are therefore 0 through 4.
pub fn row_with_score(period: NaiveDate, price: f64, score: u32) -> IndicatorRow {
    assert!(score <= 4, "helper drives at most 4 of the 5 rules");
    let mut row = bare_row(period, price);
    row.confidence = Some(1_000.0);
    if score >= 1 {
        row.confidence_change = Some(1.0);
    }
    if score >= 2 {
        row.pmi = Some(55.0);
    }
    if score >= 3 {
        row.yield_curve = Some(0.5);
    }
    if score >= 4 {
        row.claims_yoy = Some(-2.0);
    }
    row
}

pub fn monthly(start_year: i32, count: usize, prices: &[f64], scores: &[u32]) -> Vec<IndicatorRow> {
    assert_eq!(prices.len(), count);
    assert_eq!(scores.len(), count);
    (0..count)
        .map(|i| {
            let month = (i % 12) as u32 + 1;
            let year = start_year + (i / 12) as i32;
            row_with_score(date(year, month, 1), prices[i], scores[i])
        })
        .collect()
}
