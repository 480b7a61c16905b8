//! Aggregation: grouped sums/means, pivoting, and top-N rankings.
//!
//! Missing amounts never contribute to a sum; they are counted separately
//! for data-quality reporting. A group whose amounts are all missing still
//! appears, with a total of 0.0, matching the reference aggregation.

use crate::dataset::Dataset;
use crate::types::FactRow;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// ── Dimensions ───────────────────────────────────────────────────────────────

/// A groupable dimension of the fact table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Bank,
    Metric,
    Period,
    Category,
}

impl Dimension {
    /// The grouping key of a row along this dimension. Periods key as
    /// zero-padded `YYYYMM`, so lexical order equals temporal order.
    pub fn key(&self, row: &FactRow) -> String {
        match self {
            Dimension::Bank => row.bank_code.clone(),
            Dimension::Metric => row.metric_label.clone(),
            Dimension::Period => row.period.key(),
            Dimension::Category => row.category.clone(),
        }
    }
}

// ── Grouped reductions ───────────────────────────────────────────────────────

/// Per-group totals plus the count of rows excluded for missing amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub totals: BTreeMap<String, f64>,
    pub missing_amounts: usize,
}

/// Sum amounts per group along a dimension.
pub fn sum_by(dataset: &Dataset, dimension: Dimension) -> GroupTotals {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut missing = 0usize;
    for row in dataset.rows() {
        let entry = totals.entry(dimension.key(row)).or_insert(0.0);
        match row.amount {
            Some(amount) => *entry += amount,
            None => missing += 1,
        }
    }
    GroupTotals {
        totals,
        missing_amounts: missing,
    }
}

/// Mean of non-missing amounts per group. Groups with no non-missing
/// amounts are omitted (a mean of nothing is undefined, not 0).
pub fn mean_by(dataset: &Dataset, dimension: Dimension) -> BTreeMap<String, f64> {
    let mut acc: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for row in dataset.rows() {
        if let Some(amount) = row.amount {
            let entry = acc.entry(dimension.key(row)).or_insert((0.0, 0));
            entry.0 += amount;
            entry.1 += 1;
        }
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Top `n` groups by summed amount, descending; ties break by ascending
/// key so repeated calls are reproducible. `n = 0` yields an empty ranking.
pub fn top_n(dataset: &Dataset, dimension: Dimension, n: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = sum_by(dataset, dimension).totals.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(n);
    ranked
}

// ── Pivoting ─────────────────────────────────────────────────────────────────

/// How duplicate (row, col) combinations are reduced before placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Sum,
    Mean,
}

/// Missing-cell policy. Time series keep gaps (`Gaps`); heatmaps and
/// correlation input need a dense matrix (`Zero`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    Gaps,
    Zero,
}

/// A 2D table: ordered row keys × ordered column keys, `Option<f64>` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    pub row_keys: Vec<String>,
    pub col_keys: Vec<String>,
    /// Row-major; `cells[r][c]` pairs with `(row_keys[r], col_keys[c])`.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn col_index(&self, key: &str) -> Option<usize> {
        self.col_keys.iter().position(|k| k == key)
    }

    /// One column as an ordered series (rows stay in row-key order).
    pub fn column(&self, col: usize) -> Vec<Option<f64>> {
        self.cells.iter().map(|r| r.get(col).copied().flatten()).collect()
    }

    pub fn column_by_key(&self, key: &str) -> Option<Vec<Option<f64>>> {
        self.col_index(key).map(|c| self.column(c))
    }

    /// Sum of all non-missing cells.
    pub fn total(&self) -> f64 {
        self.cells
            .iter()
            .flatten()
            .filter_map(|c| *c)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty() || self.col_keys.is_empty()
    }

    /// Same shape, every non-missing cell mapped through `f`.
    pub(crate) fn map_cells<F: Fn(f64) -> Option<f64>>(&self, f: F) -> PivotTable {
        PivotTable {
            row_keys: self.row_keys.clone(),
            col_keys: self.col_keys.clone(),
            cells: self
                .cells
                .iter()
                .map(|row| row.iter().map(|c| c.and_then(&f)).collect())
                .collect(),
        }
    }

    /// Iterator over non-missing cell values.
    pub(crate) fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().flatten().filter_map(|c| *c)
    }
}

/// Reshape the long-format fact table into a 2D table.
///
/// Duplicate (row, col) combinations are reduced by `agg` first; a
/// combination whose amounts are all missing stays missing (then subject
/// to the fill policy).
pub fn pivot(
    dataset: &Dataset,
    row_dim: Dimension,
    col_dim: Dimension,
    agg: Aggregation,
    fill: FillPolicy,
) -> PivotTable {
    let mut acc: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
    for row in dataset.rows() {
        let key = (row_dim.key(row), col_dim.key(row));
        let entry = acc.entry(key).or_insert((0.0, 0));
        if let Some(amount) = row.amount {
            entry.0 += amount;
            entry.1 += 1;
        }
    }

    let mut row_keys: Vec<String> = acc.keys().map(|(r, _)| r.clone()).collect();
    let mut col_keys: Vec<String> = acc.keys().map(|(_, c)| c.clone()).collect();
    row_keys.sort();
    row_keys.dedup();
    col_keys.sort();
    col_keys.dedup();

    let empty_cell = match fill {
        FillPolicy::Gaps => None,
        FillPolicy::Zero => Some(0.0),
    };

    let cells = row_keys
        .iter()
        .map(|rk| {
            col_keys
                .iter()
                .map(|ck| match acc.get(&(rk.clone(), ck.clone())) {
                    Some((sum, n)) if *n > 0 => match agg {
                        Aggregation::Sum => Some(*sum),
                        Aggregation::Mean => Some(sum / *n as f64),
                    },
                    _ => empty_cell,
                })
                .collect()
        })
        .collect();

    log::debug!(
        "pivot {:?}×{:?}: {}×{} table",
        row_dim,
        col_dim,
        row_keys.len(),
        col_keys.len()
    );
    PivotTable {
        row_keys,
        col_keys,
        cells,
    }
}
