use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::feature::Feature;
use crate::tolerance::{MobilityTolerance, MzTolerance, RtTolerance, Tolerance};

use super::error::GrouperError;

/// Nominal mass difference between consecutive isotopes (13C - 12C), in Da
pub const DEFAULT_ISOTOPE_SPACING: f64 = 1.0033;

/// Default highest charge state tried for every seed
pub const DEFAULT_MAX_CHARGE: i32 = 2;

/// Which member of a resolved isotope group represents it in the output.
///
/// The choice also fixes the order of the assembled isotope pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepresentativeIsotope {
    /// The highest feature; pattern ordered by descending height
    #[default]
    MostIntense,
    /// The lightest feature; pattern ordered by ascending m/z
    LowestMz,
}

impl RepresentativeIsotope {
    /// Ordering of two features under this policy. The representative sorts first.
    pub fn compare(&self, a: &Feature, b: &Feature) -> Ordering {
        match self {
            RepresentativeIsotope::MostIntense => b.height.total_cmp(&a.height),
            RepresentativeIsotope::LowestMz => a.mz.total_cmp(&b.mz),
        }
    }
}

impl fmt::Display for RepresentativeIsotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepresentativeIsotope::MostIntense => write!(f, "most intense"),
            RepresentativeIsotope::LowestMz => write!(f, "lowest m/z"),
        }
    }
}

fn default_monotonic_shape() -> bool {
    true
}

fn default_max_charge() -> i32 {
    DEFAULT_MAX_CHARGE
}

fn default_isotope_spacing() -> f64 {
    DEFAULT_ISOTOPE_SPACING
}

/// Parameters of the isotope grouper.
///
/// The m/z and RT tolerances are generic so that callers can plug in their
/// own [`Tolerance`] predicates; the defaults are [`MzTolerance`] and
/// [`RtTolerance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrouperConfig<M = MzTolerance, R = RtTolerance> {
    /// m/z tolerance between an expected isotope position and a candidate
    pub mz_tolerance: M,

    /// Retention time tolerance between the seed and a candidate
    pub rt_tolerance: R,

    /// Only search for isotopes heavier than the seed
    #[serde(default = "default_monotonic_shape")]
    pub monotonic_shape: bool,

    /// Highest charge state to try
    #[serde(default = "default_max_charge")]
    pub max_charge: i32,

    /// Representative selection and pattern order
    #[serde(default)]
    pub representative_isotope: RepresentativeIsotope,

    /// Isotope spacing in Da, divided by the charge per hypothesis
    #[serde(default = "default_isotope_spacing")]
    pub isotope_spacing: f64,

    /// Optional ion mobility tolerance between the seed and a candidate
    #[serde(default)]
    pub mobility_tolerance: Option<MobilityTolerance>,

    /// Carry the fragment scans of every group member onto the representative
    #[serde(default)]
    pub keep_all_ms2: bool,
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self::new(MzTolerance::default(), RtTolerance::default())
    }
}

impl<M, R> GrouperConfig<M, R> {
    /// Create a configuration with the given tolerances and default options
    pub fn new(mz_tolerance: M, rt_tolerance: R) -> Self {
        Self {
            mz_tolerance,
            rt_tolerance,
            monotonic_shape: true,
            max_charge: DEFAULT_MAX_CHARGE,
            representative_isotope: RepresentativeIsotope::default(),
            isotope_spacing: DEFAULT_ISOTOPE_SPACING,
            mobility_tolerance: None,
            keep_all_ms2: false,
        }
    }

    /// Set the highest charge state
    pub fn with_max_charge(mut self, max_charge: i32) -> Self {
        self.max_charge = max_charge;
        self
    }

    /// Restrict the search to heavier isotopes (`true`) or search both ways
    pub fn with_monotonic_shape(mut self, monotonic_shape: bool) -> Self {
        self.monotonic_shape = monotonic_shape;
        self
    }

    /// Set the representative isotope policy
    pub fn with_representative(mut self, representative: RepresentativeIsotope) -> Self {
        self.representative_isotope = representative;
        self
    }

    /// Set the nominal isotope spacing
    pub fn with_isotope_spacing(mut self, spacing: f64) -> Self {
        self.isotope_spacing = spacing;
        self
    }

    /// Require candidates to match the seed's ion mobility
    pub fn with_mobility_tolerance(mut self, tolerance: MobilityTolerance) -> Self {
        self.mobility_tolerance = Some(tolerance);
        self
    }

    /// Keep fragment scans of all group members
    pub fn with_keep_all_ms2(mut self, keep_all_ms2: bool) -> Self {
        self.keep_all_ms2 = keep_all_ms2;
        self
    }

    /// Replace the m/z tolerance, possibly with a different predicate type
    pub fn with_mz_tolerance<M2>(self, mz_tolerance: M2) -> GrouperConfig<M2, R> {
        GrouperConfig {
            mz_tolerance,
            rt_tolerance: self.rt_tolerance,
            monotonic_shape: self.monotonic_shape,
            max_charge: self.max_charge,
            representative_isotope: self.representative_isotope,
            isotope_spacing: self.isotope_spacing,
            mobility_tolerance: self.mobility_tolerance,
            keep_all_ms2: self.keep_all_ms2,
        }
    }

    /// Replace the RT tolerance, possibly with a different predicate type
    pub fn with_rt_tolerance<R2>(self, rt_tolerance: R2) -> GrouperConfig<M, R2> {
        GrouperConfig {
            mz_tolerance: self.mz_tolerance,
            rt_tolerance,
            monotonic_shape: self.monotonic_shape,
            max_charge: self.max_charge,
            representative_isotope: self.representative_isotope,
            isotope_spacing: self.isotope_spacing,
            mobility_tolerance: self.mobility_tolerance,
            keep_all_ms2: self.keep_all_ms2,
        }
    }
}

impl<M: Tolerance, R: Tolerance> GrouperConfig<M, R> {
    /// Reject configurations the grouper cannot run with
    pub fn validate(&self) -> Result<(), GrouperError> {
        if self.max_charge < 1 {
            return Err(GrouperError::InvalidMaxCharge(self.max_charge));
        }
        if !self.isotope_spacing.is_finite() || self.isotope_spacing <= 0.0 {
            return Err(GrouperError::InvalidIsotopeSpacing(self.isotope_spacing));
        }
        self.mz_tolerance.validate()?;
        self.rt_tolerance.validate()?;
        if let Some(mobility) = &self.mobility_tolerance {
            mobility.validate()?;
        }
        Ok(())
    }
}
