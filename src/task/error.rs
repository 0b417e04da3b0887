use crate::feature_list::FeatureListError;
use crate::grouper::GrouperError;

/// Errors that fail a grouping job
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The grouper rejected its configuration or input
    #[error("Grouping error: {0}")]
    Grouper(#[from] GrouperError),

    /// The result could not be registered
    #[error("Feature list error: {0}")]
    FeatureList(#[from] FeatureListError),
}
