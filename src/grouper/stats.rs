use std::collections::BTreeMap;
use std::fmt;

/// Counters collected during a grouping run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Number of input features
    pub features_in: usize,
    /// Seed slots visited, including already consumed ones
    pub seeds_visited: usize,
    /// Isotope groups with two or more members
    pub groups_formed: usize,
    /// Features copied through unchanged
    pub pass_through: usize,
    /// Features absorbed into groups, representatives included
    pub features_merged: usize,
    /// Number of groups per fitted charge state
    pub charge_counts: BTreeMap<i32, usize>,
}

impl GroupingStats {
    /// Number of rows emitted
    pub fn rows_out(&self) -> usize {
        self.groups_formed + self.pass_through
    }

    pub(crate) fn record_group(&mut self, charge: i32, size: usize) {
        self.groups_formed += 1;
        self.features_merged += size;
        *self.charge_counts.entry(charge).or_default() += 1;
    }
}

impl fmt::Display for GroupingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Grouped {} features into {} rows ({} isotope groups from {} features, {} unchanged)",
            self.features_in,
            self.rows_out(),
            self.groups_formed,
            self.features_merged,
            self.pass_through
        )?;
        for (charge, count) in &self.charge_counts {
            write!(f, "; z={}: {}", charge, count)?;
        }
        Ok(())
    }
}
