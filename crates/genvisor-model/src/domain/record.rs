use std::time::Duration;

use time::OffsetDateTime;

/// Mutable record of an instance's most recent generation run.
///
/// Guarded by the owning instance's lock; all fields are rewritten as one
/// group when a run completes, so a reader holding the lock always sees the
/// outcome of a single run.
#[derive(Clone, Debug)]
pub struct RunRecord {
    /// Completion time of the last run, `None` until the first run finishes.
    pub last_run_at: Option<OffsetDateTime>,
    pub last_duration: Duration,
    pub success: bool,
    /// Combined output of the last failed run; empty while the last run
    /// succeeded.
    pub last_error: String,
    /// Set once when the record is created and never advanced afterwards.
    /// The scheduler timer, not this field, decides when runs happen.
    pub next_run_at: OffsetDateTime,
}

impl RunRecord {
    pub fn new(next_run_at: OffsetDateTime) -> Self {
        Self {
            last_run_at: None,
            last_duration: Duration::ZERO,
            success: false,
            last_error: String::new(),
            next_run_at,
        }
    }

    /// Overwrite the record with the outcome of a completed run.
    ///
    /// A successful run clears the error text.
    pub fn record_run(
        &mut self,
        finished_at: OffsetDateTime,
        duration: Duration,
        success: bool,
        output: &str,
    ) {
        self.last_run_at = Some(finished_at);
        self.last_duration = duration;
        self.success = success;
        self.last_error = if success {
            String::new()
        } else {
            output.to_string()
        };
    }
}
