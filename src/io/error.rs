use crate::feature_list::FeatureListError;

/// Errors that can occur while reading or writing feature tables
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// I/O error on the underlying file
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the header
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A cell could not be parsed
    #[error("Invalid value '{value}' in column '{column}' at line {line}")]
    InvalidValue {
        /// 1-based line number in the file
        line: u64,
        /// Column name
        column: String,
        /// Offending cell content
        value: String,
    },

    /// JSON export failed
    #[error("Feature list error: {0}")]
    FeatureList(#[from] FeatureListError),
}
