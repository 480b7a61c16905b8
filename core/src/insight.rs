//! Rule-based insight generation.
//!
//! Five independent rules run in a fixed order over the filtered data:
//!   1. Highest-exposure bank
//!   2. Latest-vs-previous period trend
//!   3. Regional leader (needs ≥ 2 selected banks)
//!   4. Missing-value data quality
//!   5. Tukey-fence outlier count
//!
//! A rule whose preconditions fail contributes nothing — no placeholder,
//! no error.

use crate::aggregate::{sum_by, top_n, Dimension};
use crate::analytics::outliers;
use crate::catalog::{bank_display_name, region_for_bank};
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::filter::Selection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Info,
    Success,
    Warning,
}

/// A structured finding surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

/// Generate the ordered insight sequence for a selection.
pub fn generate_insights(
    dataset: &Dataset,
    selection: &Selection,
    config: &DashboardConfig,
) -> Vec<Insight> {
    let filtered = dataset.filter(selection);
    let mut insights = Vec::new();

    if let Some(insight) = highest_exposure(&filtered, config) {
        insights.push(insight);
    }
    if let Some(insight) = period_trend(&filtered) {
        insights.push(insight);
    }
    if let Some(insight) = regional_leader(&filtered, selection, config) {
        insights.push(insight);
    }
    if let Some(insight) = data_quality(&filtered) {
        insights.push(insight);
    }
    if let Some(insight) = outlier_count(&filtered) {
        insights.push(insight);
    }

    log::debug!("{} insights for current selection", insights.len());
    insights
}

fn highest_exposure(filtered: &Dataset, config: &DashboardConfig) -> Option<Insight> {
    if filtered.rows().iter().all(|r| r.amount.is_none()) {
        return None;
    }
    let (code, total) = top_n(filtered, Dimension::Bank, 1).into_iter().next()?;
    Some(Insight {
        kind: InsightKind::Info,
        title: "Highest Exposure".to_string(),
        message: format!(
            "{} ({}) has the highest total exposure: {:.0}",
            bank_display_name(config, &code),
            code,
            total
        ),
    })
}

fn period_trend(filtered: &Dataset) -> Option<Insight> {
    let periods = filtered.distinct_periods();
    if periods.len() < 2 {
        return None;
    }
    let latest = periods[periods.len() - 1];
    let previous = periods[periods.len() - 2];

    let total_for = |p| -> f64 {
        filtered
            .rows()
            .iter()
            .filter(|r| r.period == p)
            .filter_map(|r| r.amount)
            .sum()
    };
    let latest_total = total_for(latest);
    let previous_total = total_for(previous);
    if previous_total == 0.0 {
        return None;
    }

    let change_pct = (latest_total - previous_total) / previous_total * 100.0;
    let direction = if change_pct > 0.0 { "increased" } else { "decreased" };
    Some(Insight {
        kind: if change_pct > 0.0 {
            InsightKind::Success
        } else {
            InsightKind::Warning
        },
        title: "Period Trend".to_string(),
        message: format!(
            "Total exposure {} by {:.2}% from {} to {}",
            direction,
            change_pct.abs(),
            previous.label(),
            latest.label()
        ),
    })
}

fn regional_leader(
    filtered: &Dataset,
    selection: &Selection,
    config: &DashboardConfig,
) -> Option<Insight> {
    let banks = selection.banks.as_ref()?;
    if banks.len() < 2 {
        return None;
    }

    let bank_totals = sum_by(filtered, Dimension::Bank).totals;
    let mut regional: BTreeMap<&str, f64> = BTreeMap::new();
    for bank in banks {
        let total = bank_totals.get(bank).copied().unwrap_or(0.0);
        *regional.entry(region_for_bank(config, bank)).or_insert(0.0) += total;
    }

    // Strict comparison keeps the first region in alphabetical order on ties.
    let (leader, _) = regional
        .into_iter()
        .fold(None::<(&str, f64)>, |best, (region, total)| match best {
            Some((_, best_total)) if total <= best_total => best,
            _ => Some((region, total)),
        })?;
    Some(Insight {
        kind: InsightKind::Info,
        title: "Regional Leader".to_string(),
        message: format!(
            "{leader} region shows the highest total exposure among selected banks"
        ),
    })
}

fn data_quality(filtered: &Dataset) -> Option<Insight> {
    let missing = filtered.rows().iter().filter(|r| r.amount.is_none()).count();
    if missing == 0 {
        return None;
    }
    let pct = missing as f64 / filtered.len() as f64 * 100.0;
    Some(Insight {
        kind: InsightKind::Warning,
        title: "Data Quality".to_string(),
        message: format!("Found {missing} missing values in selected data ({pct:.1}%)"),
    })
}

fn outlier_count(filtered: &Dataset) -> Option<Insight> {
    if filtered.len() <= 10 {
        return None;
    }
    let amounts: Vec<f64> = filtered.rows().iter().filter_map(|r| r.amount).collect();
    let found = outliers(&amounts);
    if found.is_empty() {
        return None;
    }
    let pct = found.len() as f64 / filtered.len() as f64 * 100.0;
    Some(Insight {
        kind: InsightKind::Info,
        title: "Outliers Detected".to_string(),
        message: format!(
            "Found {} outlier values ({pct:.1}% of data)",
            found.len()
        ),
    })
}
