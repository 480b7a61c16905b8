//! Bank and metric catalog helpers — display names, regional lookup, and
//! keyword classification of free-text metric labels.
//!
//! The tag classifier is a presentation convenience, not a correctness-
//! critical computation, but it is deterministic and total: every label
//! gets at least one tag.

use crate::config::DashboardConfig;
use serde::{Deserialize, Serialize};

// ── Banks ────────────────────────────────────────────────────────────────────

/// Full display name for a bank code, falling back to the code itself.
pub fn bank_display_name<'a>(config: &'a DashboardConfig, code: &'a str) -> &'a str {
    config
        .bank_names
        .get(code)
        .map(String::as_str)
        .unwrap_or(code)
}

/// The region a bank code belongs to, `"Other"` when the code is unmapped.
pub fn region_for_bank<'a>(config: &'a DashboardConfig, code: &str) -> &'a str {
    for (region, codes) in &config.regions {
        if codes.iter().any(|c| c == code) {
            return region;
        }
    }
    "Other"
}

/// Member bank codes of a region, empty for an unknown region.
pub fn banks_in_region<'a>(config: &'a DashboardConfig, region: &str) -> &'a [String] {
    config
        .regions
        .get(region)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

// ── Metrics ──────────────────────────────────────────────────────────────────

/// Display category for a source sheet name, matched by configured sheet
/// prefix. Unmatched sheets fall back to "Other Metrics".
pub fn metric_category_for_sheet<'a>(config: &'a DashboardConfig, sheet: &str) -> &'a str {
    for (category, prefix) in &config.metric_categories {
        if sheet.contains(prefix.as_str()) {
            return category;
        }
    }
    "Other Metrics"
}

/// Redundant long-form prefixes stripped for display. Only the first match
/// is removed.
const DISPLAY_PREFIXES: &[&str] = &[
    "Original Exposure - ",
    "Exposure value - ",
    "Risk exposure amount - ",
    "Value adjustments and provisions - ",
    "Exposures with forbearance measures - ",
    "Gross carrying amount on ",
    "Accumulated impairment, accumulated changes in fair value due to credit risk and provisions on ",
    "Collaterals and financial guarantees received on non-performing exposures on ",
];

/// Shortened metric name for display.
pub fn metric_short_name(label: &str) -> &str {
    for prefix in DISPLAY_PREFIXES {
        if let Some(rest) = label.strip_prefix(prefix) {
            return rest;
        }
    }
    label
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricTag {
    Exposure,
    Risk,
    Impairment,
    Collateral,
    General,
}

/// Classify a metric label by keyword. Total: an unmatched label is tagged
/// `General`.
pub fn metric_tags(label: &str) -> Vec<MetricTag> {
    let lower = label.to_lowercase();
    let mut tags = Vec::new();
    if lower.contains("exposure") {
        tags.push(MetricTag::Exposure);
    }
    if lower.contains("risk") || lower.contains("npe") || lower.contains("non-performing") || lower.contains("defaulted") {
        tags.push(MetricTag::Risk);
    }
    if lower.contains("impairment") || lower.contains("provision") {
        tags.push(MetricTag::Impairment);
    }
    if lower.contains("collateral") || lower.contains("guarantee") {
        tags.push(MetricTag::Collateral);
    }
    if tags.is_empty() {
        tags.push(MetricTag::General);
    }
    tags
}

/// Case-insensitive substring search over metric labels. An empty search
/// term matches everything.
pub fn search_metrics<'a>(labels: &'a [String], term: &str) -> Vec<&'a String> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return labels.iter().collect();
    }
    labels
        .iter()
        .filter(|l| l.to_lowercase().contains(&term))
        .collect()
}
