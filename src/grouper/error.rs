use crate::tolerance::ToleranceError;

/// Errors that reject a grouping run before it starts
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GrouperError {
    /// The highest charge state must be at least one
    #[error("Maximum charge must be at least 1 (got {0})")]
    InvalidMaxCharge(i32),

    /// The isotope spacing must be a positive finite mass
    #[error("Isotope spacing must be positive and finite (got {0})")]
    InvalidIsotopeSpacing(f64),

    /// A tolerance is malformed
    #[error("Invalid tolerance: {0}")]
    Tolerance(#[from] ToleranceError),

    /// There were no features to group
    #[error("No features to group")]
    EmptyInput,
}
