use async_trait::async_trait;

use genvisor_model::{InstanceSpec, RunOutcome};

/// Seam between the scheduling core and whatever produces an instance's
/// content.
///
/// A generator runs one generation to completion and reports the outcome.
/// It never retries on its own and it is never interrupted: the scheduler
/// loop awaits the call to completion before looking at anything else.
#[async_trait]
pub trait Generator: Send + Sync + 'static {
    async fn generate(&self, spec: &InstanceSpec) -> RunOutcome;
}
