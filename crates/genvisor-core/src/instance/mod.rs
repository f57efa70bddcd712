use std::sync::Mutex;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::Instant;
use tracing::{error, info};

use genvisor_model::{InstanceSpec, RunOutcome, RunRecord, StatusSnapshot};

use crate::generator::Generator;

/// One supervised instance: the immutable spec plus the lock-guarded record
/// of its most recent run.
///
/// The lock protects only this instance's record and is held only for the
/// duration of a field copy, never across a generation run.
pub struct Instance {
    spec: InstanceSpec,
    record: Mutex<RunRecord>,
}

impl Instance {
    pub fn new(spec: InstanceSpec) -> Self {
        Self {
            record: Mutex::new(RunRecord::new(OffsetDateTime::now_utc())),
            spec,
        }
    }

    pub fn spec(&self) -> &InstanceSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Execute one generation run and record its result.
    ///
    /// The generator call is awaited to completion; the record lock is taken
    /// only after it returns.
    pub async fn run_generation(&self, generator: &dyn Generator) {
        let started = Instant::now();
        let outcome = generator.generate(&self.spec).await;
        self.record_outcome(&outcome, started.elapsed());
    }

    fn record_outcome(&self, outcome: &RunOutcome, duration: Duration) {
        let finished_at = OffsetDateTime::now_utc();
        {
            let mut record = self.record.lock().unwrap();
            record.record_run(finished_at, duration, outcome.success, &outcome.output);
        }

        let elapsed_ms = duration.as_millis() as u64;
        if outcome.success {
            info!(instance = %self.spec.name, elapsed_ms, "generation run succeeded");
        } else {
            error!(
                instance = %self.spec.name,
                elapsed_ms,
                output = %outcome.output.trim_end(),
                "generation run failed"
            );
        }
    }

    /// Copy the record out under the lock and derive the wire snapshot.
    pub fn snapshot(&self) -> StatusSnapshot {
        let record = self.record.lock().unwrap().clone();
        StatusSnapshot::from_record(&self.spec.name, &record, OffsetDateTime::now_utc())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    fn spec(name: &str) -> InstanceSpec {
        InstanceSpec::new(name, Path::new("/tmp/genvisor-test"), Duration::from_secs(60))
    }

    #[test]
    fn failure_then_success_clears_error() {
        let instance = Instance::new(spec("alpha"));

        instance.record_outcome(&RunOutcome::failed("broken\n"), Duration::from_millis(10));
        let snap = instance.snapshot();
        assert!(!snap.success);
        assert_eq!(snap.last_error_snippet, "broken\n");

        instance.record_outcome(&RunOutcome::succeeded(""), Duration::from_millis(10));
        let snap = instance.snapshot();
        assert!(snap.success);
        assert!(snap.last_error_snippet.is_empty());
    }

    #[test]
    fn last_run_at_never_decreases() {
        let instance = Instance::new(spec("alpha"));
        let mut previous = None;

        for _ in 0..5 {
            instance.record_outcome(&RunOutcome::succeeded(""), Duration::ZERO);
            let at = instance.snapshot().last_run_at.unwrap();
            if let Some(prev) = previous {
                assert!(at >= prev);
            }
            previous = Some(at);
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn snapshot_before_first_run_is_blank() {
        let snap = Instance::new(spec("alpha")).snapshot();
        assert!(snap.last_run_at.is_none());
        assert!(!snap.success);
        assert!(snap.last_error_snippet.is_empty());
    }

    /// Readers hammering `snapshot` while a writer rewrites the record must
    /// never see fields from two different runs mixed together. Every failed
    /// write pairs the duration with an error text derived from it, so a torn
    /// read would show a mismatched pair.
    #[test]
    fn concurrent_snapshots_never_observe_mixed_records() {
        let instance = Arc::new(Instance::new(spec("alpha")));
        let stop = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let instance = Arc::clone(&instance);
                let stop = Arc::clone(&stop);
                std::thread::spawn(move || {
                    while !stop.load(Ordering::Relaxed) {
                        let snap = instance.snapshot();
                        if snap.success {
                            assert!(snap.last_error_snippet.is_empty());
                        } else if !snap.last_error_snippet.is_empty() {
                            assert_eq!(
                                snap.last_error_snippet,
                                format!("run {}", snap.last_duration_ms)
                            );
                        }
                    }
                })
            })
            .collect();

        for i in 0..2_000u64 {
            let duration = Duration::from_millis(i);
            if i % 2 == 0 {
                instance.record_outcome(&RunOutcome::succeeded(""), duration);
            } else {
                instance.record_outcome(&RunOutcome::failed(format!("run {i}")), duration);
            }
        }
        stop.store(true, Ordering::Relaxed);

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
