//! # mzdeiso - Isotope Pattern Grouping for LC-MS Feature Lists
//!
//! `mzdeiso` collapses the isotopic siblings of a feature list into single
//! representative rows. In LC-MS data every compound shows up as a series of
//! peaks spaced by roughly `1.0033 / z` in m/z (the 13C isotope step) that
//! co-elute; deisotoping keeps one row per compound, annotated with its charge
//! and the assembled isotope pattern.
//!
//! ## Key Features
//!
//! - **Greedy grouping**: features are visited from the most intense down; each
//!   unconsumed feature seeds a search over charges `1..=max_charge` and the
//!   charge explaining the most features wins.
//!
//! - **Pluggable tolerances**: m/z, retention time and ion mobility windows are
//!   [`Tolerance`](tolerance::Tolerance) implementations; any closure works too.
//!
//! - **Cooperative cancellation**: long runs report progress and stop cleanly
//!   through a shared [`TaskControl`](grouper::TaskControl).
//!
//! - **Provenance**: the deisotoped list carries the processing history of its
//!   input plus a record of the grouping parameters.
//!
//! ## Quick Start
//!
//! ```rust
//! use mzdeiso::prelude::*;
//!
//! let rows = vec![
//!     FeatureRow::new(1, Feature::new(500.0, 10.0, 1000.0)),
//!     FeatureRow::new(2, Feature::new(501.0033, 10.02, 400.0)),
//!     FeatureRow::new(3, Feature::new(502.0066, 9.98, 100.0)),
//! ];
//!
//! let grouped = group(&rows, &GrouperConfig::default())?;
//! assert_eq!(grouped.len(), 1);
//! assert_eq!(grouped[0].charge(), Some(1));
//! # Ok::<(), mzdeiso::grouper::GrouperError>(())
//! ```
//!
//! ## Running as a Job
//!
//! ```rust
//! use mzdeiso::prelude::*;
//!
//! let list = FeatureList::new(
//!     "sample_01",
//!     "sample_01.mzML",
//!     vec![FeatureRow::new(1, Feature::new(500.0, 10.0, 1000.0))],
//! );
//! let mut project = Project::new();
//!
//! let task = IsotopeGrouperTask::new(list, GrouperParameters::default());
//! let outcome = task.run(&mut project)?;
//! assert!(matches!(outcome, TaskOutcome::Finished { .. }));
//! assert!(project.get("sample_01 deisotoped").is_some());
//! # Ok::<(), mzdeiso::task::TaskError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`tolerance`]: the `Tolerance` trait and the m/z, RT and mobility windows
//! - [`feature`]: feature rows and isotope patterns
//! - [`grouper`]: the grouping algorithm, its configuration and progress control
//! - [`feature_list`]: named lists, processing history and result registration
//! - [`task`]: job wrapper tying a list, parameters and a result sink together
//! - [`io`]: CSV feature tables and JSON export

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod feature;
pub mod feature_list;
pub mod grouper;
pub mod io;
pub mod task;
pub mod tolerance;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::feature::{
        Feature, FeatureRow, GroupingKind, GroupingTag, IsotopeEntry, IsotopePattern, PatternStatus,
    };
    pub use crate::feature_list::{
        FeatureList, OriginalListHandling, ProcessingHistory, ProcessingStep, Project, ResultSink,
    };
    pub use crate::grouper::{
        group, GrouperConfig, GrouperError, GroupingResult, GroupingStats, IsotopeGrouper,
        OutputRow, RepresentativeIsotope, RowOrigin, TaskControl, TaskStatus,
    };
    pub use crate::io::{read_feature_table, save_grouped_table, IoError};
    pub use crate::task::{GrouperParameters, IsotopeGrouperTask, TaskError, TaskOutcome};
    pub use crate::tolerance::{MobilityTolerance, MzTolerance, RtTolerance, Tolerance};
}
