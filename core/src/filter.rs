//! Request-scoped selection and filtering.
//!
//! Convention, applied uniformly: a selector that is `None` *or* an
//! explicit empty list places no restriction on its dimension — clearing a
//! multiselect restores the full population. Selectors compose by AND.

use crate::dataset::Dataset;
use crate::types::{FactRow, Period};
use serde::{Deserialize, Serialize};

/// A selection of banks × metrics × periods × categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub banks: Option<Vec<String>>,
    pub metrics: Option<Vec<String>>,
    pub periods: Option<Vec<Period>>,
    pub categories: Option<Vec<String>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_banks<I, S>(mut self, banks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.banks = Some(banks.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = Some(metrics.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_periods<I>(mut self, periods: I) -> Self
    where
        I: IntoIterator<Item = Period>,
    {
        self.periods = Some(periods.into_iter().collect());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    /// True when the row passes every provided selector.
    pub fn matches(&self, row: &FactRow) -> bool {
        fn selected<T: PartialEq>(selector: &Option<Vec<T>>, value: &T) -> bool {
            match selector {
                Some(values) if !values.is_empty() => values.contains(value),
                _ => true,
            }
        }
        selected(&self.banks, &row.bank_code)
            && selected(&self.metrics, &row.metric_label)
            && selected(&self.periods, &row.period)
            && selected(&self.categories, &row.category)
    }
}

impl Dataset {
    /// A new owned subset containing the rows matching the selection.
    /// Zero matching rows is a valid empty dataset, not an error.
    pub fn filter(&self, selection: &Selection) -> Dataset {
        let rows: Vec<FactRow> = self
            .rows()
            .iter()
            .filter(|r| selection.matches(r))
            .cloned()
            .collect();
        Dataset::from_rows(rows)
    }
}
