//! # Feature Data Model
//!
//! Detected chromatographic features ("peaks") of a single sample and the
//! feature-list rows that carry them.
//!
//! A [`FeatureRow`] owns exactly one [`Feature`] plus the row-level metadata
//! that downstream steps attach (comment, identification, fragment scans).
//! After deisotoping, a merged row also owns the [`IsotopePattern`] that was
//! assembled from its isotopic siblings, and every row a grouping pass emits
//! carries a [`GroupingTag`] naming the input rows it came from.

mod pattern;
mod types;


pub use pattern::{IsotopeEntry, IsotopePattern, PatternStatus};
pub use types::{Feature, FeatureRow, GroupingKind, GroupingTag};
