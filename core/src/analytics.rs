//! Derived computations on aggregated data.
//!
//! Every function here is a pure function of its inputs and returns
//! representable values for degenerate cases: undefined divisions become
//! `None`, never a panic, an error, or an infinity.
//!
//! Numeric conventions (see DESIGN.md):
//!   - `std` is the sample standard deviation (ddof = 1); undefined for
//!     fewer than two values.
//!   - Quantiles interpolate linearly between order statistics.
//!   - Normalization is computed over the whole table, not per column.

use crate::aggregate::PivotTable;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// ── Series ───────────────────────────────────────────────────────────────────

/// Period-over-period percentage change of an ordered series.
///
/// The first slot is always `None`; a slot is `None` whenever the previous
/// value is missing or zero, or the current value is missing.
pub fn percent_change(series: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(series.len());
    for (i, curr) in series.iter().enumerate() {
        let change = if i == 0 {
            None
        } else {
            match (series[i - 1], curr) {
                (Some(prev), Some(curr)) if prev != 0.0 => Some((curr - prev) / prev * 100.0),
                _ => None,
            }
        };
        out.push(change);
    }
    out
}

/// Column-wise percent change of a period-by-key pivot table. Row keys are
/// assumed period-ordered, which `pivot` guarantees for period rows.
pub fn percent_change_table(table: &PivotTable) -> PivotTable {
    let cells = (0..table.col_keys.len())
        .map(|c| percent_change(&table.column(c)))
        .collect::<Vec<_>>();
    PivotTable {
        row_keys: table.row_keys.clone(),
        col_keys: table.col_keys.clone(),
        // transpose back to row-major
        cells: (0..table.row_keys.len())
            .map(|r| cells.iter().map(|col| col[r]).collect())
            .collect(),
    }
}

// ── Descriptive statistics ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` for a single value.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: usize,
}

/// Descriptive statistics of a set of values; `None` for empty input.
pub fn descriptive_stats(values: &[f64]) -> Option<Stats> {
    if values.is_empty() {
        return None;
    }
    let n = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / n as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    let std = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    Some(Stats {
        mean,
        median,
        std,
        min: sorted[0],
        max: sorted[n - 1],
        sum,
        count: n,
    })
}

/// Linearly interpolated quantile (`0.0 ≤ q ≤ 1.0`); `None` for empty input.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + frac * (sorted[upper] - sorted[lower]))
}

// ── Correlation ──────────────────────────────────────────────────────────────

/// Pearson correlation matrix between the columns of a pivot table.
///
/// Pairwise-complete: each pair uses only the rows where both columns have
/// a value. The diagonal is exactly 1.0; a cell is `None` when a pair
/// shares fewer than two complete rows or either side is constant.
pub fn correlation_matrix(table: &PivotTable) -> PivotTable {
    let columns: Vec<Vec<Option<f64>>> = (0..table.col_keys.len())
        .map(|c| table.column(c))
        .collect();

    let cells = (0..columns.len())
        .map(|i| {
            (0..columns.len())
                .map(|j| {
                    if i == j {
                        Some(1.0)
                    } else {
                        pearson(&columns[i], &columns[j])
                    }
                })
                .collect()
        })
        .collect();

    PivotTable {
        row_keys: table.col_keys.clone(),
        col_keys: table.col_keys.clone(),
        cells,
    }
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some(cov / denom)
}

// ── Normalization ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMethod {
    MinMax,
    ZScore,
    Percentage,
}

/// Normalize a table over all of its non-missing cells.
///
/// Whole-table scope: a heatmap spanning metrics of different magnitudes is
/// rescaled on one shared scale. A zero denominator (constant table, zero
/// total) yields all-`None` cells. Missing cells stay missing.
pub fn normalize(table: &PivotTable, method: NormalizeMethod) -> PivotTable {
    let values: Vec<f64> = table.values().collect();
    match method {
        NormalizeMethod::MinMax => {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let range = max - min;
            table.map_cells(move |x| {
                (range != 0.0 && range.is_finite()).then(|| (x - min) / range)
            })
        }
        NormalizeMethod::ZScore => match descriptive_stats(&values) {
            Some(Stats {
                mean,
                std: Some(std),
                ..
            }) if std != 0.0 => table.map_cells(move |x| Some((x - mean) / std)),
            _ => table.map_cells(|_| None),
        },
        NormalizeMethod::Percentage => {
            let sum: f64 = values.iter().sum();
            table.map_cells(move |x| (sum != 0.0).then(|| x / sum * 100.0))
        }
    }
}

// ── Size buckets ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeBucket {
    Large,
    Medium,
    Small,
}

/// Classify each key by where its total falls against the 33rd/67th
/// percentiles of the given totals. Relative to the current selection:
/// recompute whenever the selection changes.
pub fn quantile_buckets(totals: &BTreeMap<String, f64>) -> BTreeMap<String, SizeBucket> {
    let values: Vec<f64> = totals.values().copied().collect();
    let (Some(q33), Some(q67)) = (quantile(&values, 0.33), quantile(&values, 0.67)) else {
        return BTreeMap::new();
    };
    totals
        .iter()
        .map(|(key, &total)| {
            let bucket = if total >= q67 {
                SizeBucket::Large
            } else if total >= q33 {
                SizeBucket::Medium
            } else {
                SizeBucket::Small
            };
            (key.clone(), bucket)
        })
        .collect()
}

// ── Outliers ─────────────────────────────────────────────────────────────────

/// Minimum sample size for the Tukey fence to be meaningful.
const OUTLIER_MIN_COUNT: usize = 10;

/// Values outside `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]`, in input order.
/// Skipped (empty result) for fewer than ten values, where the fence is
/// statistically meaningless.
pub fn outliers(values: &[f64]) -> Vec<f64> {
    if values.len() < OUTLIER_MIN_COUNT {
        return Vec::new();
    }
    let (Some(q1), Some(q3)) = (quantile(values, 0.25), quantile(values, 0.75)) else {
        return Vec::new();
    };
    let iqr = q3 - q1;
    let low = q1 - 1.5 * iqr;
    let high = q3 + 1.5 * iqr;
    values
        .iter()
        .copied()
        .filter(|v| *v < low || *v > high)
        .collect()
}
