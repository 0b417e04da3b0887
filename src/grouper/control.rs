use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

/// Lifecycle state of a grouping run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskStatus {
    /// Not started yet
    Waiting = 0,
    /// Grouping is running
    Processing = 1,
    /// Every seed was processed
    Finished = 2,
    /// Stopped early on request
    Canceled = 3,
    /// Rejected or failed
    Error = 4,
}

impl TaskStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => TaskStatus::Waiting,
            1 => TaskStatus::Processing,
            2 => TaskStatus::Finished,
            3 => TaskStatus::Canceled,
            _ => TaskStatus::Error,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskStatus::Waiting => "waiting",
            TaskStatus::Processing => "processing",
            TaskStatus::Finished => "finished",
            TaskStatus::Canceled => "canceled",
            TaskStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Progress and cancellation shared between a grouping run and its observers.
///
/// Every field is atomic, so a UI or logging thread can poll
/// [`finished_percentage`](Self::finished_percentage) while the run advances
/// on a worker thread. Share it through an `Arc`.
#[derive(Debug, Default)]
pub struct TaskControl {
    total: AtomicUsize,
    processed: AtomicUsize,
    canceled: AtomicBool,
    status: AtomicU8,
}

impl TaskControl {
    /// Create a control block in the `Waiting` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cooperative cancellation. Takes effect at the next seed boundary.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }

    /// Fraction of seeds processed, in `[0, 1]`
    pub fn finished_percentage(&self) -> f64 {
        let total = self.total.load(Ordering::Acquire);
        if total == 0 {
            return 0.0;
        }
        let processed = self.processed.load(Ordering::Acquire).min(total);
        processed as f64 / total as f64
    }

    /// Number of seeds processed so far
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Acquire)
    }

    /// Current lifecycle state
    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub(crate) fn set_status(&self, status: TaskStatus) {
        self.status.store(status as u8, Ordering::Release);
    }

    pub(crate) fn start(&self, total: usize, already_processed: usize) {
        self.total.store(total, Ordering::Release);
        self.processed.store(already_processed, Ordering::Release);
        self.set_status(TaskStatus::Processing);
    }

    pub(crate) fn set_processed(&self, processed: usize) {
        self.processed.fetch_max(processed, Ordering::AcqRel);
    }
}
