/// Errors that can occur while handling feature lists
#[derive(Debug, thiserror::Error)]
pub enum FeatureListError {
    /// I/O error reading or writing a feature list file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Two rows share the same id
    #[error("Duplicate row id {0} in feature list")]
    DuplicateRowId(i64),

    /// A list with this name is already registered
    #[error("Feature list '{0}' already exists")]
    DuplicateName(String),
}
