use std::slice;

use crate::feature::FeatureRow;

use super::stats::GroupingStats;

/// How an output row came to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOrigin {
    /// Copied unchanged from the input
    PassThrough {
        /// Index of the input row
        source: usize,
    },
    /// Built from an isotope group of two or more features
    Merged {
        /// Index of the input row whose feature seeded the group
        seed: usize,
        /// Index of the input row whose feature represents the group
        representative: usize,
        /// Indices of all member rows, in pattern order
        members: Vec<usize>,
    },
}

/// A row produced by the grouper, tagged with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    /// The resulting feature-list row
    pub row: FeatureRow,
    /// Where the row came from
    pub origin: RowOrigin,
}

impl OutputRow {
    /// Whether the row replaces an isotope group
    pub fn is_merged(&self) -> bool {
        matches!(self.origin, RowOrigin::Merged { .. })
    }

    /// Fitted charge of a merged row, or the carried charge of a pass-through
    pub fn charge(&self) -> Option<i32> {
        self.row.charge
    }

    /// Index of the input row that seeded this output row
    pub fn source(&self) -> usize {
        match &self.origin {
            RowOrigin::PassThrough { source } => *source,
            RowOrigin::Merged { seed, .. } => *seed,
        }
    }

    /// Indices of every input row covered by this output row
    pub fn members(&self) -> &[usize] {
        match &self.origin {
            RowOrigin::PassThrough { source } => slice::from_ref(source),
            RowOrigin::Merged { members, .. } => members,
        }
    }

    /// Drop the index-level origin. The row keeps its [`GroupingTag`].
    ///
    /// [`GroupingTag`]: crate::feature::GroupingTag
    pub fn into_row(self) -> FeatureRow {
        self.row
    }
}

/// Terminal state of a grouping run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingStatus {
    /// All seeds were processed
    Finished,
    /// The run stopped early; rows hold the groups committed so far
    Canceled,
}

/// Output of a grouping run
#[derive(Debug, Clone)]
pub struct GroupingResult {
    /// Whether the run completed
    pub status: GroupingStatus,
    /// Rows emitted, in seed order
    pub rows: Vec<OutputRow>,
    /// Indices of input rows never reached because of cancellation
    pub unvisited: Vec<usize>,
    /// Run statistics
    pub stats: GroupingStats,
}

impl GroupingResult {
    /// Whether the run completed
    pub fn is_finished(&self) -> bool {
        self.status == GroupingStatus::Finished
    }

    /// Return the emitted rows without their index-level origins
    pub fn into_rows(self) -> Vec<FeatureRow> {
        self.rows.into_iter().map(OutputRow::into_row).collect()
    }
}
