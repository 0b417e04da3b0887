//! # Feature Lists and Result Registration
//!
//! A [`FeatureList`] holds the rows of one sample together with the
//! [`ProcessingHistory`] that produced them. Grouping jobs hand their output
//! to a [`ResultSink`], which registers the new list and, if requested,
//! retires the list it was derived from. [`Project`] is the in-memory sink
//! used by the command-line tool and the tests.

mod error;
mod list;
mod processing;
mod sink;


pub use error::FeatureListError;
pub use list::FeatureList;
pub use processing::{ProcessingHistory, ProcessingStep};
pub use sink::{OriginalListHandling, Project, ResultSink};
