use log::{debug, info, warn};
use std::sync::Arc;

use crate::feature_list::{FeatureList, OriginalListHandling, ProcessingStep, ResultSink};
use crate::grouper::{
    GroupingStats, GroupingStatus, IsotopeGrouper, OutputRow, TaskControl, TaskStatus,
};

use super::{GrouperParameters, TaskError};

/// Processing type recorded in the history of every deisotoped list
pub const PROCESSING_TYPE: &str = "isotopic peaks grouper";

/// How a grouping job ended
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    /// The deisotoped list was registered under `list_name`
    Finished {
        /// Name of the registered list
        list_name: String,
        /// Run statistics
        stats: GroupingStats,
    },
    /// The job was canceled; nothing was registered
    Canceled {
        /// Rows committed before cancellation
        rows: Vec<OutputRow>,
        /// Run statistics up to cancellation
        stats: GroupingStats,
    },
}

/// A deisotoping job over one feature list
#[derive(Debug)]
pub struct IsotopeGrouperTask {
    list: FeatureList,
    parameters: GrouperParameters,
    control: Arc<TaskControl>,
}

impl IsotopeGrouperTask {
    /// Create a job; nothing runs until [`run`](Self::run)
    pub fn new(list: FeatureList, parameters: GrouperParameters) -> Self {
        Self {
            list,
            parameters,
            control: Arc::new(TaskControl::new()),
        }
    }

    /// Shared progress/cancellation handle, safe to poll from other threads
    pub fn control(&self) -> Arc<TaskControl> {
        Arc::clone(&self.control)
    }

    /// Human-readable job description
    pub fn task_description(&self) -> String {
        format!("Isotopic peaks grouper on {}", self.list.name)
    }

    /// Fraction of seeds processed
    pub fn finished_percentage(&self) -> f64 {
        self.control.finished_percentage()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.control.cancel();
    }

    /// Current lifecycle state
    pub fn status(&self) -> TaskStatus {
        self.control.status()
    }

    /// Run the grouping pass and hand a completed result to `sink`.
    ///
    /// A rejected configuration or input leaves the job in the `Error` state.
    /// The job reports `Finished` only after `sink` accepted the result. On
    /// cancellation the committed rows are returned and `sink` is left
    /// untouched.
    pub fn run<S: ResultSink + ?Sized>(self, sink: &mut S) -> Result<TaskOutcome, TaskError> {
        info!("Started {}", self.task_description());

        let grouper = match IsotopeGrouper::new(&self.list.rows, &self.parameters.grouping) {
            Ok(grouper) => grouper,
            Err(e) => {
                self.control.set_status(TaskStatus::Error);
                return Err(e.into());
            }
        };

        let result = grouper.run_seeds(&self.control);
        let stats = result.stats.clone();

        if result.status == GroupingStatus::Canceled {
            warn!(
                "{} canceled, {} rows left unregistered",
                self.task_description(),
                result.rows.len()
            );
            return Ok(TaskOutcome::Canceled {
                rows: result.rows,
                stats,
            });
        }

        let mut history = self.list.history.clone();
        history.add_step(ProcessingStep::now(
            PROCESSING_TYPE,
            self.parameters.to_parameter_map(),
        ));

        let deisotoped = FeatureList {
            name: self.list.derived_name(&self.parameters.suffix),
            sample: self.list.sample.clone(),
            rows: result.into_rows(),
            history,
        };
        let list_name = deisotoped.name.clone();

        if let Err(e) = sink.register(deisotoped) {
            self.control.set_status(TaskStatus::Error);
            return Err(e.into());
        }

        if self.parameters.original_handling == OriginalListHandling::Remove
            && sink.retire(&self.list.name).is_none()
        {
            debug!("Original list '{}' was not registered in the sink", self.list.name);
        }

        self.control.set_status(TaskStatus::Finished);
        info!("Finished {}: {}", self.task_description(), stats);
        Ok(TaskOutcome::Finished { list_name, stats })
    }
}
