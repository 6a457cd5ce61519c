use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use crate::config::WindowSettings;
use crate::db::MetricsStore;
use crate::sources::MetricsSource;

/// Rows written by one full refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub point_metrics: usize,
    pub protocols: usize,
    pub wallet_flows: usize,
    pub volume_records: usize,
}

/// Unconditionally regenerates every record kind.
///
/// All four fetches run concurrently and must all succeed before anything is
/// written. Persistence itself cannot fail, so a failed refresh leaves the
/// store untouched.
pub struct RefreshOrchestrator {
    store: Arc<MetricsStore>,
    source: Arc<dyn MetricsSource>,
    windows: WindowSettings,
}

impl RefreshOrchestrator {
    pub fn new(
        store: Arc<MetricsStore>,
        source: Arc<dyn MetricsSource>,
        windows: WindowSettings,
    ) -> Self {
        Self {
            store,
            source,
            windows,
        }
    }

    pub async fn refresh_all(&self) -> Result<RefreshSummary> {
        let start = std::time::Instant::now();

        let (metric, protocols, flows, volumes) = tokio::try_join!(
            async {
                self.source
                    .point_metric()
                    .await
                    .context("Failed to fetch point metrics")
            },
            async {
                self.source
                    .protocol_snapshots()
                    .await
                    .context("Failed to fetch protocol snapshots")
            },
            async {
                self.source
                    .wallet_flows(self.windows.wallet_flow_days)
                    .await
                    .context("Failed to fetch wallet flows")
            },
            async {
                self.source
                    .volume_records(self.windows.volume_days)
                    .await
                    .context("Failed to fetch transaction volume")
            },
        )?;

        self.store.insert_point_metric(metric);

        let summary = RefreshSummary {
            point_metrics: 1,
            protocols: protocols.len(),
            wallet_flows: flows.len(),
            volume_records: volumes.len(),
        };

        for protocol in protocols {
            self.store.upsert_protocol_snapshot(protocol);
        }
        for flow in flows {
            self.store.insert_wallet_flow(flow);
        }
        for volume in volumes {
            self.store.insert_volume_record(volume);
        }

        info!(
            "Refreshed all metrics in {:?}: {} protocols, {} wallet flows, {} volume rows",
            start.elapsed(),
            summary.protocols,
            summary.wallet_flows,
            summary.volume_records
        );

        Ok(summary)
    }
}
