//! transparency-core: the analytics layer of the European Banking
//! Transparency dashboard.
//!
//! The crate turns a flat fact table of regulatory metrics
//! (bank × metric × period × category → amount) into the derived views the
//! presentation layer renders: filtered subsets, grouped totals, pivoted
//! tables, rankings, descriptive statistics, correlation matrices,
//! normalized heatmap data, size buckets, and rule-based insights.
//!
//! Everything is a pure function of `(dataset, selection)`: the dataset is
//! immutable after load, derived values are owned, and no module holds
//! state. Undefined arithmetic (zero denominators, statistics of too-small
//! samples) produces `None`, never an error or an infinity.

pub mod aggregate;
pub mod analytics;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod insight;
pub mod types;

pub use aggregate::{pivot, sum_by, top_n, Aggregation, Dimension, FillPolicy, PivotTable};
pub use analytics::{
    correlation_matrix, descriptive_stats, normalize, outliers, percent_change,
    quantile_buckets, NormalizeMethod, SizeBucket, Stats,
};
pub use config::DashboardConfig;
pub use dataset::{Dataset, DatasetSummary};
pub use error::{DashboardError, DashboardResult};
pub use filter::Selection;
pub use insight::{generate_insights, Insight, InsightKind};
pub use types::{FactRow, Period};
