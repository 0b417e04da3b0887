//! Tolerance predicates for m/z, retention time and ion mobility.
//!
//! The grouper never derives a tolerance window itself. It only asks a
//! [`Tolerance`] whether two values are equal within measurement uncertainty,
//! so inclusive/exclusive boundary behaviour is owned entirely by the
//! implementation used.
//!
//! All windows built here are closed intervals centred on the first argument:
//!
//! ```rust
//! use mzdeiso::tolerance::{MzTolerance, Tolerance};
//!
//! let tol = MzTolerance::new(0.003, 10.0);
//! // 10 ppm at m/z 500 is 0.005, which beats the 0.003 absolute floor
//! assert!(tol.within(500.0, 500.005));
//! assert!(!tol.within(500.0, 500.0051));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors raised when a tolerance is malformed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToleranceError {
    /// A tolerance width was negative
    #[error("{name} tolerance must not be negative (got {value})")]
    Negative {
        /// Which tolerance parameter failed
        name: &'static str,
        /// The offending value
        value: f64,
    },

    /// A tolerance width was NaN or infinite
    #[error("{name} tolerance must be finite (got {value})")]
    NotFinite {
        /// Which tolerance parameter failed
        name: &'static str,
        /// The offending value
        value: f64,
    },
}

/// A symmetric "equal within uncertainty" predicate.
pub trait Tolerance: Send + Sync {
    /// Returns true when `value` is within tolerance of `reference`.
    fn within(&self, reference: f64, value: f64) -> bool;

    /// Check that the tolerance is usable before any comparison is made.
    fn validate(&self) -> Result<(), ToleranceError> {
        Ok(())
    }
}

impl<F> Tolerance for F
where
    F: Fn(f64, f64) -> bool + Send + Sync,
{
    fn within(&self, reference: f64, value: f64) -> bool {
        self(reference, value)
    }
}

fn check_width(name: &'static str, value: f64) -> Result<(), ToleranceError> {
    if !value.is_finite() {
        return Err(ToleranceError::NotFinite { name, value });
    }
    if value < 0.0 {
        return Err(ToleranceError::Negative { name, value });
    }
    Ok(())
}

fn in_closed_window(center: f64, half_width: f64, value: f64) -> bool {
    value >= center - half_width && value <= center + half_width
}

/// m/z tolerance combining an absolute floor and a relative (ppm) width.
///
/// The half-width at a given m/z is the larger of the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MzTolerance {
    /// Absolute tolerance in m/z units
    #[serde(default)]
    pub absolute: f64,
    /// Relative tolerance in parts per million
    #[serde(default)]
    pub ppm: f64,
}

impl MzTolerance {
    /// Create a tolerance from an absolute and a ppm component
    pub fn new(absolute: f64, ppm: f64) -> Self {
        Self { absolute, ppm }
    }

    /// Purely absolute tolerance
    pub fn absolute(absolute: f64) -> Self {
        Self::new(absolute, 0.0)
    }

    /// Purely relative tolerance
    pub fn ppm(ppm: f64) -> Self {
        Self::new(0.0, ppm)
    }

    /// Half-width of the tolerance window at `mz`
    pub fn half_width(&self, mz: f64) -> f64 {
        self.absolute.max(mz.abs() * self.ppm / 1e6)
    }
}

impl Default for MzTolerance {
    fn default() -> Self {
        Self::new(0.003, 10.0)
    }
}

impl Tolerance for MzTolerance {
    fn within(&self, reference: f64, value: f64) -> bool {
        in_closed_window(reference, self.half_width(reference), value)
    }

    fn validate(&self) -> Result<(), ToleranceError> {
        check_width("m/z absolute", self.absolute)?;
        check_width("m/z ppm", self.ppm)
    }
}

impl fmt::Display for MzTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m/z or {} ppm", self.absolute, self.ppm)
    }
}

/// Retention time tolerance, in minutes or as a percentage of the reference RT.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RtTolerance {
    /// Fixed window in minutes
    Absolute(f64),
    /// Window proportional to the reference retention time, in percent
    Relative(f64),
}

impl RtTolerance {
    /// Absolute tolerance expressed in minutes
    pub fn minutes(minutes: f64) -> Self {
        Self::Absolute(minutes)
    }

    /// Absolute tolerance expressed in seconds
    pub fn seconds(seconds: f64) -> Self {
        Self::Absolute(seconds / 60.0)
    }

    /// Relative tolerance in percent of the reference RT
    pub fn percent(percent: f64) -> Self {
        Self::Relative(percent)
    }

    /// Half-width of the tolerance window at `rt`
    pub fn half_width(&self, rt: f64) -> f64 {
        match *self {
            RtTolerance::Absolute(minutes) => minutes,
            RtTolerance::Relative(percent) => rt.abs() * percent / 100.0,
        }
    }
}

impl Default for RtTolerance {
    fn default() -> Self {
        Self::Absolute(0.1)
    }
}

impl Tolerance for RtTolerance {
    fn within(&self, reference: f64, value: f64) -> bool {
        in_closed_window(reference, self.half_width(reference), value)
    }

    fn validate(&self) -> Result<(), ToleranceError> {
        match *self {
            RtTolerance::Absolute(v) => check_width("RT absolute", v),
            RtTolerance::Relative(v) => check_width("RT relative", v),
        }
    }
}

impl fmt::Display for RtTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RtTolerance::Absolute(v) => write!(f, "{} min", v),
            RtTolerance::Relative(v) => write!(f, "{} %", v),
        }
    }
}

/// Absolute ion mobility tolerance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MobilityTolerance(pub f64);

impl MobilityTolerance {
    /// Create a mobility tolerance with the given absolute width
    pub fn new(width: f64) -> Self {
        Self(width)
    }
}

impl Tolerance for MobilityTolerance {
    fn within(&self, reference: f64, value: f64) -> bool {
        in_closed_window(reference, self.0, value)
    }

    fn validate(&self) -> Result<(), ToleranceError> {
        check_width("mobility", self.0)
    }
}

impl fmt::Display for MobilityTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
