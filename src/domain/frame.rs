//! Monthly indicator observations and the ordered frame they form.

use chrono::NaiveDate;

use crate::domain::error::MacrosigError;

/// One period's observation: the asset price plus whatever macro indicators
/// the ingestion produced for that month. `None` means "no value", distinct
/// from zero: a missing indicator simply never satisfies a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub period: NaiveDate,
    pub price: f64,
    pub confidence: Option<f64>,
    pub confidence_change: Option<f64>,
    pub pmi: Option<f64>,
    pub claims: Option<f64>,
    pub claims_yoy: Option<f64>,
    pub yield_curve: Option<f64>,
}

/// An ordered sequence of rows with unique, strictly increasing periods.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    /// Build a frame from rows already in period order.
    ///
    /// Out-of-order or duplicate periods are rejected, never sorted.
    ///
    /// Rows missing the 1-period confidence change get it derived from the
    /// previous row's confidence level where both levels are present.
    pub fn new(rows: Vec<IndicatorRow>) -> Result<Self, MacrosigError> {
        for pair in rows.windows(2) {
            if pair[1].period <= pair[0].period {
                return Err(MacrosigError::NonMonotonicPeriods {
                    prev: pair[0].period,
                    next: pair[1].period,
                });
            }
        }
        let mut frame = IndicatorFrame { rows };
        frame.derive_confidence_changes();
        Ok(frame)
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.price).collect()
    }

    pub fn period_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some((first.period, last.period)),
            _ => None,
        }
    }

    fn derive_confidence_changes(&mut self) {
        for i in 1..self.rows.len() {
            if self.rows[i].confidence_change.is_none() {
                if let (Some(curr), Some(prev)) =
                    (self.rows[i].confidence, self.rows[i - 1].confidence)
                {
                    self.rows[i].confidence_change = Some(curr - prev);
                }
            }
        }
    }

    /// Quantile of the confidence series over the entire loaded history,
    /// with linear interpolation between order statistics. Rows without a
    /// confidence value are skipped; `None` if no row has one.
    ///
    /// Note this is a whole-history statistic: appending new periods can
    /// shift the threshold applied to earlier rows on the next run.
    pub fn confidence_quantile(&self, q: f64) -> Option<f64> {
        let mut values: Vec<f64> = self.rows.iter().filter_map(|r| r.confidence).collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let q = q.clamp(0.0, 1.0);
        let pos = q * (values.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        if lo == hi {
            return Some(values[lo]);
        }
        let frac = pos - lo as f64;
        Some(values[lo] + (values[hi] - values[lo]) * frac)
    }
}
