//! The fact table: an immutable, in-memory view of the loaded dataset.
//!
//! Loading:
//!   1. Resolve the required logical columns against the CSV header
//!      (canonical names or the EBA source names: NSA, Label, Period,
//!      Sheet, Amount).
//!   2. Fail with `MissingColumns` if any required column is absent.
//!   3. Parse every row; any unparseable period or non-empty non-numeric
//!      amount fails the whole load with the offending value and line.
//!
//! After load the table is never mutated. Filtering and aggregation hand
//! out new owned values.

use crate::error::{DashboardError, DashboardResult};
use crate::types::{BankCode, FactRow, MetricLabel, Period};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

// ── Column resolution ────────────────────────────────────────────────────────

/// Required logical columns and the header names each accepts. The first
/// entry is the canonical name; the second is the EBA export name.
const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("bank_code", &["bank_code", "NSA"]),
    ("metric_label", &["metric_label", "Label"]),
    ("period", &["period", "Period"]),
    ("category", &["category", "Sheet"]),
    ("amount", &["amount", "Amount"]),
];

struct ColumnMap {
    bank_code: usize,
    metric_label: usize,
    period: usize,
    category: usize,
    amount: usize,
}

fn resolve_columns(headers: &csv::StringRecord) -> DashboardResult<ColumnMap> {
    let find = |aliases: &[&str]| {
        headers
            .iter()
            .position(|h| aliases.iter().any(|a| a.eq_ignore_ascii_case(h.trim())))
    };

    let mut missing = Vec::new();
    let mut resolved = [0usize; 5];
    for (i, (logical, aliases)) in REQUIRED_COLUMNS.iter().enumerate() {
        match find(aliases) {
            Some(idx) => resolved[i] = idx,
            None => missing.push((*logical).to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(DashboardError::MissingColumns { columns: missing });
    }
    Ok(ColumnMap {
        bank_code: resolved[0],
        metric_label: resolved[1],
        period: resolved[2],
        category: resolved[3],
        amount: resolved[4],
    })
}

// ── Dataset ──────────────────────────────────────────────────────────────────

/// Summary statistics over a dataset, as shown on the data-info view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    pub bank_count: usize,
    pub period_count: usize,
    pub metric_count: usize,
    pub period_min: Option<Period>,
    pub period_max: Option<Period>,
    /// Sum over non-missing amounts.
    pub total_amount: f64,
    /// Mean over non-missing amounts; `None` when every amount is missing.
    pub mean_amount: Option<f64>,
    pub missing_amounts: usize,
}

/// The immutable fact table plus derived lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<FactRow>,
}

impl Dataset {
    /// Build a dataset directly from rows (tests, generators).
    pub fn from_rows(rows: Vec<FactRow>) -> Self {
        Self { rows }
    }

    /// Load a dataset from a delimited file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DashboardError::NotFound {
                path: path.display().to_string(),
            });
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let columns = resolve_columns(reader.headers()?)?;

        let mut rows = Vec::new();
        let mut missing_amounts = 0usize;
        for (i, result) in reader.records().enumerate() {
            let line = i + 1; // 1-based data line, excluding the header
            let record = result?;

            let field = |idx: usize| record.get(idx).unwrap_or("").trim();

            let period = Period::parse(field(columns.period)).map_err(|_| {
                DashboardError::PeriodFormat {
                    value: field(columns.period).to_string(),
                    line: Some(line),
                }
            })?;
            let amount = parse_amount(field(columns.amount), line)?;
            if amount.is_none() {
                missing_amounts += 1;
            }

            rows.push(FactRow {
                bank_code: field(columns.bank_code).to_string(),
                metric_label: field(columns.metric_label).to_string(),
                period,
                category: field(columns.category).to_string(),
                amount,
            });
        }

        log::debug!(
            "loaded {} fact rows from {}",
            rows.len(),
            path.display()
        );
        if missing_amounts > 0 {
            log::warn!(
                "{missing_amounts} of {} rows have a missing amount",
                rows.len()
            );
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[FactRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // ── Derived lookups ──────────────────────────────────────────────────────

    pub fn distinct_banks(&self) -> Vec<BankCode> {
        self.distinct(|r| r.bank_code.clone())
    }

    pub fn distinct_metrics(&self) -> Vec<MetricLabel> {
        self.distinct(|r| r.metric_label.clone())
    }

    pub fn distinct_categories(&self) -> Vec<String> {
        self.distinct(|r| r.category.clone())
    }

    /// Distinct periods in ascending calendar order.
    pub fn distinct_periods(&self) -> Vec<Period> {
        let set: BTreeSet<Period> = self.rows.iter().map(|r| r.period).collect();
        set.into_iter().collect()
    }

    fn distinct<F: Fn(&FactRow) -> String>(&self, key: F) -> Vec<String> {
        let set: BTreeSet<String> = self.rows.iter().map(key).collect();
        set.into_iter().collect()
    }

    /// Metric labels grouped by category, sorted within each group.
    pub fn metrics_by_category(&self) -> BTreeMap<String, Vec<MetricLabel>> {
        let mut map: BTreeMap<String, BTreeSet<MetricLabel>> = BTreeMap::new();
        for row in &self.rows {
            map.entry(row.category.clone())
                .or_default()
                .insert(row.metric_label.clone());
        }
        map.into_iter()
            .map(|(k, v)| (k, v.into_iter().collect()))
            .collect()
    }

    pub fn summary(&self) -> DatasetSummary {
        let periods = self.distinct_periods();
        let mut total = 0.0;
        let mut present = 0usize;
        for row in &self.rows {
            if let Some(amount) = row.amount {
                total += amount;
                present += 1;
            }
        }
        DatasetSummary {
            row_count: self.rows.len(),
            bank_count: self.distinct_banks().len(),
            period_count: periods.len(),
            metric_count: self.distinct_metrics().len(),
            period_min: periods.first().copied(),
            period_max: periods.last().copied(),
            total_amount: total,
            mean_amount: (present > 0).then(|| total / present as f64),
            missing_amounts: self.rows.len() - present,
        }
    }
}

/// Empty cell means missing; thousands separators are tolerated.
fn parse_amount(raw: &str, line: usize) -> DashboardResult<Option<f64>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let cleaned = raw.replace(',', "");
    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|_| DashboardError::AmountFormat {
            value: raw.to_string(),
            line,
        })
}
