use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Unparseable period value '{value}'{}", line.map(|l| format!(" on data line {l}")).unwrap_or_default())]
    PeriodFormat {
        value: String,
        /// 1-based data line when raised by the loader, `None` for direct
        /// `Period` parsing.
        line: Option<usize>,
    },

    #[error("Unparseable amount value '{value}' on data line {line}")]
    AmountFormat { value: String, line: usize },

    #[error("Data file not found: {path}")]
    NotFound { path: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    /// Period format error without line context (direct `Period` parsing).
    pub fn period_format(value: String) -> Self {
        DashboardError::PeriodFormat { value, line: None }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
