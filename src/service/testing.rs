//! Test double for [`MetricsSource`].

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::db::models::{NewPointMetric, NewProtocolSnapshot, NewVolumeRecord, NewWalletFlow};
use crate::sources::{MetricsSource, Synthesizer};

/// Synthetic source that counts calls and can be told to fail every fetch.
pub struct FlakySource {
    inner: Synthesizer,
    fail: bool,
    point_metric_calls: AtomicUsize,
    protocol_calls: AtomicUsize,
    wallet_flow_calls: AtomicUsize,
    volume_calls: AtomicUsize,
}

impl FlakySource {
    fn new(fail: bool) -> Self {
        Self {
            inner: Synthesizer::synthetic(),
            fail,
            point_metric_calls: AtomicUsize::new(0),
            protocol_calls: AtomicUsize::new(0),
            wallet_flow_calls: AtomicUsize::new(0),
            volume_calls: AtomicUsize::new(0),
        }
    }

    pub fn healthy() -> Self {
        Self::new(false)
    }

    pub fn failing() -> Self {
        Self::new(true)
    }

    pub fn point_metric_calls(&self) -> usize {
        self.point_metric_calls.load(Ordering::SeqCst)
    }

    pub fn protocol_calls(&self) -> usize {
        self.protocol_calls.load(Ordering::SeqCst)
    }

    pub fn wallet_flow_calls(&self) -> usize {
        self.wallet_flow_calls.load(Ordering::SeqCst)
    }

    pub fn volume_calls(&self) -> usize {
        self.volume_calls.load(Ordering::SeqCst)
    }

    fn check(&self, counter: &AtomicUsize) -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("upstream unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl MetricsSource for FlakySource {
    async fn point_metric(&self) -> Result<NewPointMetric> {
        self.check(&self.point_metric_calls)?;
        self.inner.point_metric().await
    }

    async fn protocol_snapshots(&self) -> Result<Vec<NewProtocolSnapshot>> {
        self.check(&self.protocol_calls)?;
        self.inner.protocol_snapshots().await
    }

    async fn wallet_flows(&self, days: u32) -> Result<Vec<NewWalletFlow>> {
        self.check(&self.wallet_flow_calls)?;
        self.inner.wallet_flows(days).await
    }

    async fn volume_records(&self, days: u32) -> Result<Vec<NewVolumeRecord>> {
        self.check(&self.volume_calls)?;
        self.inner.volume_records(days).await
    }
}
