use thiserror::Error;

/// Failures surfaced by the dataset store and the view transformations.
///
/// Transformations never swallow these: a view either succeeds completely
/// or returns one of the variants below and the UI decides the fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashError {
    /// The source file is missing, unreadable or malformed. Fatal at startup.
    #[error("failed to load dataset from {path}: {reason}")]
    DataLoad { path: String, reason: String },

    /// A requested column is absent, or is not numeric where numeric is required.
    #[error("unknown column '{column}'{}", numeric_suffix(.numeric_required))]
    UnknownColumn {
        column: String,
        numeric_required: bool,
    },

    /// Not enough rows or columns to compute a statistic.
    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

impl DashError {
    pub fn unknown_column(column: &str) -> Self {
        DashError::UnknownColumn {
            column: column.to_string(),
            numeric_required: false,
        }
    }

    pub fn non_numeric_column(column: &str) -> Self {
        DashError::UnknownColumn {
            column: column.to_string(),
            numeric_required: true,
        }
    }

    /// Wrap a loader failure, keeping the whole `anyhow` context chain.
    pub fn data_load(path: impl std::fmt::Display, err: &anyhow::Error) -> Self {
        DashError::DataLoad {
            path: path.to_string(),
            reason: format!("{err:#}"),
        }
    }
}

fn numeric_suffix(numeric_required: &bool) -> &'static str {
    if *numeric_required {
        " (numeric column required)"
    } else {
        ""
    }
}

pub type DashResult<T> = Result<T, DashError>;
