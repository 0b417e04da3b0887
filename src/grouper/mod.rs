//! # Isotope Grouper
//!
//! Collapses isotopic siblings among the features of one sample into single
//! representative rows.
//!
//! ## Algorithm
//!
//! 1. Features are stable-sorted by descending height.
//! 2. Each unconsumed feature, in that order, seeds a search. For every charge
//!    `z` in `1..=max_charge` the grouper walks isotope steps
//!    `seed.mz + n * spacing / z` (and, unless the shape is monotonic, the
//!    lighter side too). All unconsumed features matching step `n` in m/z,
//!    retention time and optionally ion mobility join the fit; the walk stops
//!    at the first empty step.
//! 3. The charge with the most fitted features wins, the lower charge on ties.
//! 4. A single-feature fit is copied through. Otherwise the group becomes one
//!    row carrying the representative feature, the assembled
//!    [`IsotopePattern`](crate::feature::IsotopePattern) and the fitted charge,
//!    keeping the seed row's id and annotations. All members are consumed.
//!
//! Consumption is global, so the result depends on the processing order; the
//! sort is the only ordering the grouper uses.

mod config;
mod control;
mod error;
mod fit;
mod grouper_impl;
mod stats;
mod types;

#[cfg(test)]
mod tests;

pub use config::{GrouperConfig, RepresentativeIsotope, DEFAULT_ISOTOPE_SPACING, DEFAULT_MAX_CHARGE};
pub use control::{TaskControl, TaskStatus};
pub use error::GrouperError;
pub use grouper_impl::{IsotopeGrouper, SeedOutcome};
pub use stats::GroupingStats;
pub use types::{GroupingResult, GroupingStatus, OutputRow, RowOrigin};

use crate::feature::FeatureRow;
use crate::tolerance::Tolerance;

/// Group the features of one sample in a single uninterruptible pass.
pub fn group<M: Tolerance, R: Tolerance>(
    rows: &[FeatureRow],
    config: &GrouperConfig<M, R>,
) -> Result<Vec<OutputRow>, GrouperError> {
    let grouper = IsotopeGrouper::new(rows, config)?;
    Ok(grouper.run(&TaskControl::new()).rows)
}
