use log::{debug, info, warn};

use crate::feature::{Feature, FeatureRow, GroupingTag, IsotopeEntry, IsotopePattern};
use crate::tolerance::{MzTolerance, RtTolerance, Tolerance};

use super::config::GrouperConfig;
use super::control::{TaskControl, TaskStatus};
use super::error::GrouperError;
use super::fit::{best_fit, ChargeFit};
use super::stats::GroupingStats;
use super::types::{GroupingResult, GroupingStatus, OutputRow, RowOrigin};

/// What a single seed iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The slot was already absorbed by an earlier group
    AlreadyConsumed,
    /// The seed found no isotopes and was copied through
    PassThrough,
    /// The seed resolved into a group
    Merged {
        /// Winning charge state
        charge: i32,
        /// Number of features in the group
        size: usize,
    },
}

/// Greedy isotope grouper over the features of one sample.
///
/// Seeds are visited in descending height order. Each call to
/// [`step`](Self::step) processes exactly one seed slot and commits its
/// outcome, so a run can be stopped between any two seeds with every
/// committed group intact.
///
/// ```rust
/// use mzdeiso::feature::{Feature, FeatureRow};
/// use mzdeiso::grouper::{GrouperConfig, IsotopeGrouper, TaskControl};
/// use mzdeiso::tolerance::{MzTolerance, RtTolerance};
///
/// let rows = vec![
///     FeatureRow::new(1, Feature::new(500.0, 5.0, 1000.0)),
///     FeatureRow::new(2, Feature::new(501.0033, 5.0, 300.0)),
/// ];
/// let config = GrouperConfig::new(MzTolerance::absolute(0.01), RtTolerance::minutes(0.1));
///
/// let grouper = IsotopeGrouper::new(&rows, &config)?;
/// let result = grouper.run(&TaskControl::new());
/// assert_eq!(result.rows.len(), 1);
/// assert_eq!(result.rows[0].charge(), Some(1));
/// # Ok::<(), mzdeiso::grouper::GrouperError>(())
/// ```
#[derive(Debug)]
pub struct IsotopeGrouper<'a, M = MzTolerance, R = RtTolerance> {
    rows: &'a [FeatureRow],
    config: &'a GrouperConfig<M, R>,
    /// Row indices sorted by descending height
    order: Vec<usize>,
    /// Consumption marker per slot of `order`
    consumed: Vec<bool>,
    cursor: usize,
    output: Vec<OutputRow>,
    stats: GroupingStats,
}

impl<'a, M: Tolerance, R: Tolerance> IsotopeGrouper<'a, M, R> {
    /// Validate the configuration and prepare the height-sorted working order
    pub fn new(rows: &'a [FeatureRow], config: &'a GrouperConfig<M, R>) -> Result<Self, GrouperError> {
        config.validate()?;
        if rows.is_empty() {
            return Err(GrouperError::EmptyInput);
        }

        let mut order: Vec<usize> = (0..rows.len()).collect();
        // stable: equal heights keep input order
        order.sort_by(|&a, &b| rows[b].feature.height.total_cmp(&rows[a].feature.height));

        Ok(Self {
            rows,
            config,
            consumed: vec![false; order.len()],
            order,
            cursor: 0,
            output: Vec::new(),
            stats: GroupingStats {
                features_in: rows.len(),
                ..Default::default()
            },
        })
    }

    pub(crate) fn config(&self) -> &GrouperConfig<M, R> {
        self.config
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn feature_at(&self, slot: usize) -> &'a Feature {
        &self.rows[self.order[slot]].feature
    }

    pub(crate) fn is_consumed(&self, slot: usize) -> bool {
        self.consumed[slot]
    }

    /// Number of seed slots processed so far
    pub fn processed(&self) -> usize {
        self.cursor
    }

    /// Total number of seed slots
    pub fn total(&self) -> usize {
        self.order.len()
    }

    /// Whether every seed slot has been processed
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.order.len()
    }

    /// Rows committed so far
    pub fn rows(&self) -> &[OutputRow] {
        &self.output
    }

    /// Process the next seed slot. Returns `None` once all slots are done.
    pub fn step(&mut self) -> Option<SeedOutcome> {
        if self.is_exhausted() {
            return None;
        }
        let slot = self.cursor;
        self.cursor += 1;
        self.stats.seeds_visited += 1;

        if self.consumed[slot] {
            return Some(SeedOutcome::AlreadyConsumed);
        }

        let best = best_fit(self.fit_all_charges(slot)).unwrap_or(ChargeFit {
            charge: 1,
            slots: vec![slot],
        });

        if best.score() == 1 {
            self.consumed[slot] = true;
            let source = self.order[slot];
            let mut row = self.rows[source].clone();
            row.grouping = Some(GroupingTag::pass_through(row.id));
            self.output.push(OutputRow {
                row,
                origin: RowOrigin::PassThrough { source },
            });
            self.stats.pass_through += 1;
            return Some(SeedOutcome::PassThrough);
        }

        let charge = best.charge;
        let size = best.score();
        let merged = self.merge_group(&best);
        debug!(
            "{} -> z={} group of {} ({})",
            self.rows[self.order[slot]],
            charge,
            size,
            merged.row.feature
        );

        for &member in &best.slots {
            self.consumed[member] = true;
        }
        self.output.push(merged);
        self.stats.record_group(charge, size);

        Some(SeedOutcome::Merged { charge, size })
    }

    /// Build the representative row for a resolved group.
    fn merge_group(&self, fit: &ChargeFit) -> OutputRow {
        let seed_index = self.order[fit.slots[0]];
        let seed_row = &self.rows[seed_index];

        let mut members: Vec<usize> = fit.slots.iter().map(|&slot| self.order[slot]).collect();
        let policy = self.config.representative_isotope;
        members.sort_by(|&a, &b| policy.compare(&self.rows[a].feature, &self.rows[b].feature));
        let representative = members[0];
        let representative_row = &self.rows[representative];

        let entries = members
            .iter()
            .map(|&index| {
                let row = &self.rows[index];
                IsotopeEntry {
                    mz: row.feature.mz,
                    height: row.feature.height,
                    row_id: row.id,
                }
            })
            .collect::<Vec<_>>();
        let source_ids = entries.iter().map(|e| e.row_id).collect();
        let pattern = IsotopePattern::detected(entries, fit.charge, seed_row.feature.to_string());

        let fragment_scans = if self.config.keep_all_ms2 {
            let mut scans: Vec<i64> = Vec::new();
            for &index in &members {
                for &scan in &self.rows[index].fragment_scans {
                    if !scans.contains(&scan) {
                        scans.push(scan);
                    }
                }
            }
            scans
        } else {
            representative_row.fragment_scans.clone()
        };

        let row = FeatureRow {
            id: seed_row.id,
            feature: representative_row.feature,
            charge: Some(fit.charge),
            comment: seed_row.comment.clone(),
            identity: seed_row.identity.clone(),
            fragment_scans,
            isotope_pattern: Some(pattern),
            grouping: Some(GroupingTag::merged(source_ids)),
        };

        OutputRow {
            row,
            origin: RowOrigin::Merged {
                seed: seed_index,
                representative,
                members,
            },
        }
    }

    /// Run to completion or until `control` is canceled.
    ///
    /// Cancellation is checked before every seed. Progress is published to
    /// `control` after every seed.
    pub fn run(self, control: &TaskControl) -> GroupingResult {
        let result = self.run_seeds(control);
        if result.is_finished() {
            control.set_status(TaskStatus::Finished);
        }
        result
    }

    /// Like [`run`](Self::run), but a completed pass leaves `control` in
    /// `Processing` so the caller can publish `Finished` once the result is
    /// handed on.
    pub(crate) fn run_seeds(mut self, control: &TaskControl) -> GroupingResult {
        control.start(self.total(), self.processed());

        while !self.is_exhausted() {
            if control.is_canceled() {
                warn!(
                    "Isotope grouping canceled after {} of {} seeds",
                    self.processed(),
                    self.total()
                );
                control.set_status(TaskStatus::Canceled);
                return self.finish(GroupingStatus::Canceled);
            }
            self.step();
            control.set_processed(self.processed());
        }

        info!("{}", self.stats);
        self.finish(GroupingStatus::Finished)
    }

    fn finish(self, status: GroupingStatus) -> GroupingResult {
        let unvisited = self
            .order
            .iter()
            .zip(&self.consumed)
            .filter(|&(_, &consumed)| !consumed)
            .map(|(&index, _)| index)
            .collect();

        GroupingResult {
            status,
            rows: self.output,
            unvisited,
            stats: self.stats,
        }
    }
}
