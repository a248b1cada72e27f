// src/error.rs

use thiserror::Error;

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;

/// Everything that can abort a run. There are no recoverable variants:
/// the report is all-or-nothing.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("table `{table_id}` not found in page")]
    NotFound { table_id: String },

    #[error("table `{table_id}` is malformed: {reason}")]
    MalformedTable { table_id: String, reason: String },

    #[error("table `{table_id}` has no column `{column}`")]
    MissingColumn { table_id: String, column: String },

    #[error("column `{column}` of table `{table_id}` is not numeric")]
    NonNumericColumn { table_id: String, column: String },

    #[error("no rows in `{table_id}` qualify for `{what}`")]
    EmptyResult { table_id: String, what: String },
}

impl ScrapeError {
    pub(crate) fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        ScrapeError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
