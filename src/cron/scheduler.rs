//! Cron scheduler for periodic background tasks.
//!
//! Runs jobs like:
//! - Regenerating every dashboard record kind (`refresh_all`)

use std::sync::Arc;

use anyhow::Result;
use log::{error, info};
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;

use crate::config::RefreshSettings;
use crate::service::RefreshOrchestrator;

use super::jobs;

/// Cron scheduler that manages periodic background jobs.
pub struct CronScheduler {
    orchestrator: Arc<RefreshOrchestrator>,
    settings: Arc<CronSettings>,
}

/// Configuration for cron job intervals
#[derive(Debug, Clone, Default)]
pub struct CronSettings {
    /// Interval for the full refresh job; 0 disables it
    pub refresh_all_interval_secs: u64,
}

impl From<&RefreshSettings> for CronSettings {
    fn from(settings: &RefreshSettings) -> Self {
        Self {
            refresh_all_interval_secs: settings.interval_secs,
        }
    }
}

impl CronSettings {
    pub fn job_count(&self) -> usize {
        usize::from(self.refresh_all_interval_secs > 0)
    }
}

impl CronScheduler {
    pub fn new(orchestrator: Arc<RefreshOrchestrator>, settings: CronSettings) -> Self {
        Self {
            orchestrator,
            settings: Arc::new(settings),
        }
    }

    /// Starts the cron scheduler and runs until cancellation.
    pub async fn run(&self, cancellation_token: CancellationToken) -> Result<()> {
        if self.settings.job_count() == 0 {
            info!("No cron jobs enabled");
            cancellation_token.cancelled().await;
            return Ok(());
        }

        let mut scheduler = JobScheduler::new().await?;

        self.register_refresh_all_job(&scheduler).await?;

        scheduler.start().await?;
        info!(
            "Cron scheduler started with {} jobs",
            self.settings.job_count()
        );

        // Wait for cancellation
        cancellation_token.cancelled().await;
        info!("Cron scheduler shutting down...");

        scheduler.shutdown().await?;
        Ok(())
    }

    async fn register_refresh_all_job(&self, scheduler: &JobScheduler) -> Result<()> {
        let orchestrator = self.orchestrator.clone();
        let interval = self.settings.refresh_all_interval_secs;

        let job = Job::new_repeated_async(
            std::time::Duration::from_secs(interval),
            move |_uuid, _lock| {
                let orchestrator = orchestrator.clone();
                Box::pin(async move {
                    if let Err(e) = jobs::refresh_all::run(&orchestrator).await {
                        error!("Failed to refresh all metrics: {:#}", e);
                    }
                })
            },
        )?;

        scheduler.add(job).await?;
        info!("Registered refresh_all job (every {}s)", interval);
        Ok(())
    }
}
