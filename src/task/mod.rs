//! # Grouping Job
//!
//! [`IsotopeGrouperTask`] wraps one grouping pass the way a job runner sees
//! it: it owns the input [`FeatureList`](crate::feature_list::FeatureList),
//! exposes progress and cancellation through a shared
//! [`TaskControl`](crate::grouper::TaskControl), and on success registers the
//! deisotoped list, with its provenance, in a
//! [`ResultSink`](crate::feature_list::ResultSink).

mod error;
mod parameters;
mod task_impl;


pub use error::TaskError;
pub use parameters::{GrouperParameters, DEFAULT_SUFFIX};
pub use task_impl::{IsotopeGrouperTask, TaskOutcome, PROCESSING_TYPE};
