use chrono::{DateTime, Duration, Utc};

use crate::db::models::{PointMetric, ProtocolSnapshot, VolumeRecord, WalletFlowRecord};

/// When a cached read must be regenerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalenessPolicy {
    /// Stale when absent or older than the given age.
    MaxAge(Duration),
    /// Stale only when nothing qualifies.
    NonEmpty,
}

/// Records that carry the instant they describe.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for PointMetric {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for ProtocolSnapshot {
    fn timestamp(&self) -> DateTime<Utc> {
        self.last_updated
    }
}

impl Timestamped for WalletFlowRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.date
    }
}

impl Timestamped for VolumeRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.date
    }
}

/// A record is stale if absent, or if `now - timestamp > threshold`.
pub fn is_stale<T: Timestamped>(
    record: Option<&T>,
    threshold: Duration,
    now: DateTime<Utc>,
) -> bool {
    match record {
        None => true,
        Some(record) => now - record.timestamp() > threshold,
    }
}

/// Cached read results that can judge their own staleness.
pub trait Freshness {
    fn is_stale(&self, policy: StalenessPolicy, now: DateTime<Utc>) -> bool;
}

impl<T: Timestamped> Freshness for Option<T> {
    fn is_stale(&self, policy: StalenessPolicy, now: DateTime<Utc>) -> bool {
        match policy {
            StalenessPolicy::MaxAge(max_age) => is_stale(self.as_ref(), max_age, now),
            StalenessPolicy::NonEmpty => self.is_none(),
        }
    }
}

impl<T: Timestamped> Freshness for Vec<T> {
    fn is_stale(&self, policy: StalenessPolicy, now: DateTime<Utc>) -> bool {
        match policy {
            StalenessPolicy::MaxAge(max_age) => {
                let newest = self.iter().max_by_key(|r| r.timestamp());
                is_stale(newest, max_age, now)
            }
            StalenessPolicy::NonEmpty => self.is_empty(),
        }
    }
}
