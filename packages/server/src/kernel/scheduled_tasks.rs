//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (RECONCILE_CRON, every 5 minutes by default)
//!     │
//!     └─► reconcile_unsynced(batch)
//!             └─► For each entry with synced = false → SyncPropagator::schedule
//! ```
//!
//! The sweep is what eventually catches up entries whose propagation failed,
//! timed out, or was lost in a restart.

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::SyncConfig;
use crate::domains::dictionary::actions::reconcile_unsynced;
use crate::kernel::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: ServerDeps, config: &SyncConfig) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let batch_size = config.reconcile_batch_size;
    let reconcile_job = Job::new_async(config.reconcile_cron.as_str(), move |_uuid, _lock| {
        let deps = deps.clone();
        Box::pin(async move {
            match reconcile_unsynced(&deps, batch_size).await {
                Ok(0) => tracing::debug!("Reconcile sweep found nothing to sync"),
                Ok(scheduled) => {
                    tracing::info!(scheduled, "Reconcile sweep re-queued unsynced entries")
                }
                Err(e) => tracing::error!("Reconcile sweep failed: {}", e),
            }
        })
    })?;

    scheduler.add(reconcile_job).await?;
    scheduler.start().await?;

    tracing::info!(
        cron = %config.reconcile_cron,
        batch_size,
        "Scheduled tasks started (search index reconciliation)"
    );
    Ok(scheduler)
}
