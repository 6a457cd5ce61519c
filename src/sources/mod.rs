//! External data providers.
//!
//! Everything the service persists comes through [`MetricsSource`]. The
//! shipped implementation is the [`Synthesizer`]; a chain indexer or DeFi
//! API client can replace it behind the same trait.

pub mod catalog;
pub mod price_feed;
pub mod synthesizer;

use anyhow::Result;
use async_trait::async_trait;

use crate::db::models::{NewPointMetric, NewProtocolSnapshot, NewVolumeRecord, NewWalletFlow};

pub use catalog::{ProtocolBand, PROTOCOL_CATALOG};
pub use price_feed::{CoinGeckoFeed, SolQuote};
pub use synthesizer::Synthesizer;

/// Produces fresh, not-yet-stored records of each kind.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Current network-wide metrics.
    async fn point_metric(&self) -> Result<NewPointMetric>;

    /// One snapshot per tracked protocol.
    async fn protocol_snapshots(&self) -> Result<Vec<NewProtocolSnapshot>>;

    /// One flow per day for the last `days` days, oldest first.
    async fn wallet_flows(&self, days: u32) -> Result<Vec<NewWalletFlow>>;

    /// One volume row per day for the last `days` days, oldest first.
    async fn volume_records(&self, days: u32) -> Result<Vec<NewVolumeRecord>>;
}
