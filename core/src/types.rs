//! Shared primitive types used across the analytics core.

use crate::error::{DashboardError, DashboardResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A national supervisory authority code identifying a reporting
/// institution/jurisdiction (e.g. "DE", "FR").
pub type BankCode = String;

/// The long-form name of a reported regulatory quantity.
pub type MetricLabel = String;

/// A reporting period, pinned to the first day of its month.
///
/// The canonical wire form is an integer in `YYYYMM` layout (the EBA
/// transparency exports use `202306` for June 2023). Ordering is the
/// natural calendar ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period(NaiveDate);

impl Period {
    /// Build a period from a `YYYYMM` integer.
    pub fn from_yyyymm(value: i64) -> DashboardResult<Self> {
        let year = value / 100;
        let month = value % 100;
        let year: i32 = year
            .try_into()
            .map_err(|_| DashboardError::period_format(value.to_string()))?;
        NaiveDate::from_ymd_opt(year, month as u32, 1)
            .map(Period)
            .ok_or_else(|| DashboardError::period_format(value.to_string()))
    }

    /// Parse a period from text. Accepts `YYYYMM` and `YYYY-MM`.
    pub fn parse(value: &str) -> DashboardResult<Self> {
        let trimmed = value.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::from_yyyymm(n);
        }
        if let Some((y, m)) = trimmed.split_once('-') {
            if let (Ok(year), Ok(month)) = (y.parse::<i32>(), m.parse::<u32>()) {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) {
                    return Ok(Period(date));
                }
            }
        }
        Err(DashboardError::period_format(trimmed.to_string()))
    }

    /// The `YYYYMM` integer form.
    pub fn yyyymm(&self) -> i64 {
        self.0.year() as i64 * 100 + self.0.month() as i64
    }

    /// Zero-padded `YYYYMM` string. Lexical order equals temporal order,
    /// which is what the aggregation layer relies on for pivot row keys.
    pub fn key(&self) -> String {
        format!("{:06}", self.yyyymm())
    }

    /// Human-readable label, e.g. "Jun 2023".
    pub fn label(&self) -> String {
        self.0.format("%b %Y").to_string()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// One row of the fact table: a single reported amount for a
/// (bank, metric, period, category) combination.
///
/// `(bank_code, metric_label, period)` is not unique — multiple portfolios
/// can report under the same label — so every consumer sums duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
    pub bank_code: BankCode,
    pub metric_label: MetricLabel,
    pub period: Period,
    pub category: String,
    /// Missing is distinct from zero everywhere in the pipeline.
    pub amount: Option<f64>,
}
