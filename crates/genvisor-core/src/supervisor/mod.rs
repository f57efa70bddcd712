use std::path::Path;
use std::sync::Arc;

use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use genvisor_model::InstanceSpec;

use crate::generator::Generator;
use crate::instance::Instance;
use crate::provision;
use crate::registry::InstanceSet;

/// Owns the instance set and the single cancellation signal shared by every
/// scheduler loop.
pub struct Supervisor {
    instances: InstanceSet,
    cancel: CancellationToken,
}

impl Supervisor {
    /// Provision and start every configured instance.
    ///
    /// A spec whose directories cannot be created is skipped with a warning;
    /// the remaining instances start normally. One scheduler loop task is
    /// spawned per surviving instance, so this must be called from within a
    /// tokio runtime.
    pub fn start(
        specs: Vec<InstanceSpec>,
        seed_dir: &Path,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let mut instances = Vec::with_capacity(specs.len());
        for spec in specs {
            if let Err(e) = provision::prepare(&spec, seed_dir) {
                warn!(instance = %spec.name, error = %e, "skipping instance: provisioning failed");
                continue;
            }
            instances.push(Arc::new(Instance::new(spec)));
        }

        let cancel = CancellationToken::new();
        for instance in &instances {
            info!(
                instance = %instance.name(),
                interval_secs = instance.spec().interval.as_secs(),
                "starting scheduler loop"
            );
            tokio::spawn(run_loop(
                Arc::clone(instance),
                Arc::clone(&generator),
                cancel.clone(),
            ));
        }

        Self {
            instances: InstanceSet::new(instances),
            cancel,
        }
    }

    pub fn instances(&self) -> &InstanceSet {
        &self.instances
    }

    /// Broadcast cancellation to all scheduler loops.
    ///
    /// Idempotent. Returns immediately: loops stop at their next tick
    /// boundary and a generation run already in flight is left to finish.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// One instance's periodic-execution loop: an immediate first run, then one
/// run per tick until cancellation.
///
/// The generation call is awaited outside the select, so cancellation is
/// observed only between runs; a run in flight when the broadcast arrives
/// completes and still records its result.
async fn run_loop(
    instance: Arc<Instance>,
    generator: Arc<dyn Generator>,
    cancel: CancellationToken,
) {
    instance.run_generation(generator.as_ref()).await;

    let period = instance.spec().interval;
    let mut ticker = interval_at(Instant::now() + period, period);
    // A run longer than the period waits for the next aligned tick instead
    // of bursting catch-up runs.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(instance = %instance.name(), "scheduler loop stopped");
                return;
            }
            _ = ticker.tick() => instance.run_generation(generator.as_ref()).await,
        }
    }
}
