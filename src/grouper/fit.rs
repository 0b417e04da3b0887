//! Charge-state fitting around a single seed feature.

use log::trace;

use crate::feature::Feature;
use crate::tolerance::Tolerance;

use super::grouper_impl::IsotopeGrouper;

/// Search direction along the m/z axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Heavier,
    Lighter,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Heavier => 1.0,
            Direction::Lighter => -1.0,
        }
    }
}

/// The features fitted under one charge hypothesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChargeFit {
    pub charge: i32,
    /// Slots in the height-sorted working order; the seed comes first
    pub slots: Vec<usize>,
}

impl ChargeFit {
    pub fn score(&self) -> usize {
        self.slots.len()
    }
}

/// Highest score wins; on equal scores the lower charge wins.
pub(crate) fn best_fit(fits: impl IntoIterator<Item = ChargeFit>) -> Option<ChargeFit> {
    fits.into_iter().fold(None, |best, fit| match best {
        None => Some(fit),
        Some(best) => {
            if fit.score() > best.score() || (fit.score() == best.score() && fit.charge < best.charge) {
                Some(fit)
            } else {
                Some(best)
            }
        }
    })
}

impl<M: Tolerance, R: Tolerance> IsotopeGrouper<'_, M, R> {
    /// Evaluate every charge hypothesis for the seed in `seed_slot`.
    ///
    /// Hypotheses only read the consumption state, so they may run concurrently.
    pub(crate) fn fit_all_charges(&self, seed_slot: usize) -> Vec<ChargeFit> {
        let max_charge = self.config().max_charge;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (1..=max_charge)
                .into_par_iter()
                .map(|charge| self.fit_charge(seed_slot, charge))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            (1..=max_charge)
                .map(|charge| self.fit_charge(seed_slot, charge))
                .collect()
        }
    }

    pub(crate) fn fit_charge(&self, seed_slot: usize, charge: i32) -> ChargeFit {
        let seed = self.feature_at(seed_slot);
        let mut slots = vec![seed_slot];

        self.fit_half_pattern(seed, charge, Direction::Heavier, &mut slots);
        if !self.config().monotonic_shape {
            self.fit_half_pattern(seed, charge, Direction::Lighter, &mut slots);
        }

        trace!(
            "seed {} z={} fitted {} features",
            seed,
            charge,
            slots.len()
        );
        ChargeFit { charge, slots }
    }

    /// Walk isotope steps away from the seed until a step finds nothing.
    ///
    /// Every unconsumed, not yet fitted feature matching step `n` is added.
    fn fit_half_pattern(
        &self,
        seed: &Feature,
        charge: i32,
        direction: Direction,
        fitted: &mut Vec<usize>,
    ) {
        let spacing = self.config().isotope_spacing;
        let mut n: u32 = 1;

        loop {
            let expected_mz =
                seed.mz + spacing * direction.sign() * f64::from(n) / f64::from(charge);
            let before = fitted.len();

            for slot in 0..self.slot_count() {
                if self.is_consumed(slot) || fitted.contains(&slot) {
                    continue;
                }
                if self.is_isotope_candidate(seed, self.feature_at(slot), expected_mz) {
                    fitted.push(slot);
                }
            }

            if fitted.len() == before {
                break;
            }
            n += 1;
        }
    }

    /// The m/z window is centred on the expected isotope position. The RT
    /// window is centred on the candidate, so a relative RT tolerance scales
    /// with the candidate's retention time.
    fn is_isotope_candidate(&self, seed: &Feature, candidate: &Feature, expected_mz: f64) -> bool {
        let config = self.config();
        if !config.mz_tolerance.within(expected_mz, candidate.mz) {
            return false;
        }
        if !config.rt_tolerance.within(candidate.rt, seed.rt) {
            return false;
        }
        match (&config.mobility_tolerance, seed.mobility, candidate.mobility) {
            (Some(tolerance), Some(seed_mobility), Some(candidate_mobility)) => {
                tolerance.within(seed_mobility, candidate_mobility)
            }
            _ => true,
        }
    }
}
