//! Read path with freshness-driven regeneration, plus the full refresh.
//!
//! Every endpoint follows the same shape: read the store, ask the cached
//! value whether it is stale under the kind's policy, and only then go to
//! the [`MetricsSource`] and persist what it returns.

pub mod freshness;
pub mod refresh;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use log::{debug, info};

use crate::config::FreshnessSettings;
use crate::db::models::{PointMetric, ProtocolSnapshot, VolumeRecord, WalletFlowRecord};
use crate::db::MetricsStore;
use crate::sources::MetricsSource;

pub use freshness::{is_stale, Freshness, StalenessPolicy, Timestamped};
pub use refresh::{RefreshOrchestrator, RefreshSummary};

/// Record kinds served by the dashboard API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsKind {
    PointMetric,
    Protocols,
    WalletFlows,
    TransactionVolume,
}

impl fmt::Display for MetricsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricsKind::PointMetric => "point metrics",
            MetricsKind::Protocols => "protocol snapshots",
            MetricsKind::WalletFlows => "wallet flows",
            MetricsKind::TransactionVolume => "transaction volume",
        };
        f.write_str(name)
    }
}

/// Serves cached records, regenerating them when stale.
pub struct MetricsService {
    store: Arc<MetricsStore>,
    source: Arc<dyn MetricsSource>,
    point_metric_max_age: Duration,
}

impl MetricsService {
    pub fn new(
        store: Arc<MetricsStore>,
        source: Arc<dyn MetricsSource>,
        freshness: &FreshnessSettings,
    ) -> Result<Self> {
        Ok(Self {
            store,
            source,
            point_metric_max_age: freshness.point_metric_max_age()?,
        })
    }

    pub fn store(&self) -> &Arc<MetricsStore> {
        &self.store
    }

    /// Return `read`'s result if fresh under `policy`, otherwise `regenerate`'s.
    ///
    /// Racing callers may each regenerate; the store tolerates the duplicates.
    pub async fn get_or_refresh<T, R, G, Fut>(
        &self,
        kind: MetricsKind,
        policy: StalenessPolicy,
        read: R,
        regenerate: G,
    ) -> Result<T>
    where
        T: Freshness,
        R: FnOnce(&MetricsStore) -> T,
        G: FnOnce(Arc<dyn MetricsSource>, Arc<MetricsStore>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let cached = read(&self.store);
        if !cached.is_stale(policy, Utc::now()) {
            debug!("Serving cached {}", kind);
            return Ok(cached);
        }

        info!("Cached {} stale or missing, regenerating", kind);
        regenerate(self.source.clone(), self.store.clone())
            .await
            .with_context(|| format!("Failed to regenerate {}", kind))
    }

    /// Latest point metric, regenerated when older than the configured max age.
    pub async fn point_metric(&self) -> Result<PointMetric> {
        let latest = self
            .get_or_refresh(
                MetricsKind::PointMetric,
                StalenessPolicy::MaxAge(self.point_metric_max_age),
                |store| store.latest_point_metric(),
                |source, store| async move {
                    let fresh = source.point_metric().await?;
                    Ok::<_, anyhow::Error>(Some(store.insert_point_metric(fresh)))
                },
            )
            .await?;

        latest.ok_or_else(|| anyhow!("No point metric available after regeneration"))
    }

    /// All protocol snapshots, generated from the catalog when none exist.
    pub async fn protocols(&self) -> Result<Vec<ProtocolSnapshot>> {
        self.get_or_refresh(
            MetricsKind::Protocols,
            StalenessPolicy::NonEmpty,
            |store| store.list_protocol_snapshots(),
            |source, store| async move {
                let fresh = source.protocol_snapshots().await?;
                let protocols: Vec<ProtocolSnapshot> = fresh
                    .into_iter()
                    .map(|p| store.upsert_protocol_snapshot(p))
                    .collect();
                Ok::<_, anyhow::Error>(protocols)
            },
        )
        .await
    }

    /// Wallet flows in the last `days` days, generated when the window is empty.
    pub async fn wallet_flows(&self, days: u32) -> Result<Vec<WalletFlowRecord>> {
        self.get_or_refresh(
            MetricsKind::WalletFlows,
            StalenessPolicy::NonEmpty,
            |store| store.list_wallet_flows(days),
            |source, store| async move {
                let fresh = source.wallet_flows(days).await?;
                let mut flows: Vec<WalletFlowRecord> = fresh
                    .into_iter()
                    .map(|f| store.insert_wallet_flow(f))
                    .collect();
                flows.sort_by_key(|f| (f.date, f.id));
                Ok::<_, anyhow::Error>(flows)
            },
        )
        .await
    }

    /// Volume rows in the last `days` days, generated when the window is empty.
    pub async fn transaction_volume(&self, days: u32) -> Result<Vec<VolumeRecord>> {
        self.get_or_refresh(
            MetricsKind::TransactionVolume,
            StalenessPolicy::NonEmpty,
            |store| store.list_volume_records(days),
            |source, store| async move {
                let fresh = source.volume_records(days).await?;
                let mut volumes: Vec<VolumeRecord> = fresh
                    .into_iter()
                    .map(|v| store.insert_volume_record(v))
                    .collect();
                volumes.sort_by_key(|v| (v.date, v.id));
                Ok::<_, anyhow::Error>(volumes)
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::NewWalletFlow;
    use crate::sources::{CoinGeckoFeed, Synthesizer, PROTOCOL_CATALOG};
    use crate::utils::decimal_from_units;
    use super::testing::FlakySource;

    fn service(source: Arc<FlakySource>) -> MetricsService {
        MetricsService::new(
            Arc::new(MetricsStore::new()),
            source,
            &FreshnessSettings::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_point_metric_generated_once_while_fresh() {
        let source = Arc::new(FlakySource::healthy());
        let service = service(source.clone());

        let first = service.point_metric().await.unwrap();
        let second = service.point_metric().await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(source.point_metric_calls(), 1);
        assert_eq!(service.store().counts().point_metrics, 1);
    }

    #[tokio::test]
    async fn test_stale_point_metric_regenerated() {
        let source = Arc::new(FlakySource::healthy());
        let service = service(source.clone());

        let old = service.store().insert_point_metric_at(
            crate::sources::synthesizer::synthesize_point_metric(&mut rand::thread_rng(), None),
            Utc::now() - Duration::minutes(6),
        );

        let served = service.point_metric().await.unwrap();

        assert_ne!(served.id, old.id);
        assert!(served.timestamp > old.timestamp);
        assert_eq!(source.point_metric_calls(), 1);
    }

    #[tokio::test]
    async fn test_protocols_generated_when_empty_only() {
        let source = Arc::new(FlakySource::healthy());
        let service = service(source.clone());

        let first = service.protocols().await.unwrap();
        let second = service.protocols().await.unwrap();

        assert_eq!(first.len(), PROTOCOL_CATALOG.len());
        assert_eq!(first, second);
        assert_eq!(source.protocol_calls(), 1);
    }

    #[tokio::test]
    async fn test_wallet_flows_generated_for_empty_window() {
        let source = Arc::new(FlakySource::healthy());
        let service = service(source.clone());

        // Old row outside the window does not count as fresh data.
        service.store().insert_wallet_flow(NewWalletFlow {
            date: Utc::now() - Duration::days(10),
            inflow: decimal_from_units(1, 2),
            outflow: decimal_from_units(1, 2),
        });

        let flows = service.wallet_flows(7).await.unwrap();
        assert_eq!(flows.len(), 7);
        assert!(flows.windows(2).all(|w| w[0].date <= w[1].date));

        let again = service.wallet_flows(7).await.unwrap();
        assert_eq!(again, flows);
        assert_eq!(source.wallet_flow_calls(), 1);
    }

    #[tokio::test]
    async fn test_transaction_volume_window() {
        let source = Arc::new(FlakySource::healthy());
        let service = service(source.clone());

        let volumes = service.transaction_volume(30).await.unwrap();
        assert_eq!(volumes.len(), 30);

        // Shorter window is served from the same rows.
        let week = service.transaction_volume(7).await.unwrap();
        assert!(week.len() >= 7);
        assert!(week.iter().all(|v| Utc::now() - v.date <= Duration::days(7)));
        assert_eq!(service.store().counts().volume_records, 30);
        assert_eq!(source.volume_calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let service = service(Arc::new(FlakySource::failing()));

        let err = service.point_metric().await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("point metrics"));
        assert!(message.contains("upstream unavailable"));
        assert!(service.store().latest_point_metric().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_price_feed_leaves_store_empty() {
        let feed =
            CoinGeckoFeed::new("http://127.0.0.1:1/price", std::time::Duration::from_secs(1))
                .unwrap();
        let service = MetricsService::new(
            Arc::new(MetricsStore::new()),
            Arc::new(Synthesizer::with_price_feed(feed)),
            &FreshnessSettings::default(),
        )
        .unwrap();

        let err = service.point_metric().await.unwrap_err();

        assert!(format!("{:#}", err).contains("Price feed request failed"));
        assert!(service.store().latest_point_metric().is_none());
        assert_eq!(service.store().counts(), Default::default());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MetricsKind::WalletFlows.to_string(), "wallet flows");
        assert_eq!(MetricsKind::TransactionVolume.to_string(), "transaction volume");
    }
}
