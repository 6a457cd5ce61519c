use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::models::{
    NewPointMetric, NewProtocolSnapshot, NewVolumeRecord, NewWalletFlow, PointMetric,
    ProtocolSnapshot, RecordId, VolumeRecord, WalletFlowRecord,
};

/// Append-only arena of rows with an id → slot index.
struct Table<T> {
    rows: Vec<T>,
    slots: FxHashMap<RecordId, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            slots: FxHashMap::default(),
        }
    }
}

impl<T> Table<T> {
    fn push(&mut self, id: RecordId, row: T) -> &T {
        let slot = self.rows.len();
        self.rows.push(row);
        self.slots.insert(id, slot);
        &self.rows[slot]
    }

    fn get_mut(&mut self, id: RecordId) -> Option<&mut T> {
        let slot = *self.slots.get(&id)?;
        self.rows.get_mut(slot)
    }

    fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.iter()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Default)]
struct StoreInner {
    last_id: RecordId,
    point_metrics: Table<PointMetric>,
    protocols: Table<ProtocolSnapshot>,
    protocol_ids: FxHashMap<String, RecordId>,
    wallet_flows: Table<WalletFlowRecord>,
    volume_records: Table<VolumeRecord>,
}

impl StoreInner {
    fn next_id(&mut self) -> RecordId {
        self.last_id += 1;
        self.last_id
    }
}

/// Row counts per record kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub point_metrics: usize,
    pub protocols: usize,
    pub wallet_flows: usize,
    pub volume_records: usize,
}

/// Process-lifetime, in-memory store for every dashboard record kind.
///
/// - Ids come from a single counter shared by all kinds.
/// - Protocol snapshots are upserted by name.
/// - Wallet flows and volume records are append-only and listed by date window.
///
/// Nothing is ever evicted. Concurrent writers are serialized by one lock;
/// duplicate regeneration by racing readers is tolerated.
#[derive(Default)]
pub struct MetricsStore {
    inner: RwLock<StoreInner>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================
    // Point metrics
    // ============================================

    /// Row with the greatest timestamp; the highest id wins ties.
    pub fn latest_point_metric(&self) -> Option<PointMetric> {
        let inner = self.inner.read();
        inner
            .point_metrics
            .iter()
            .max_by_key(|m| (m.timestamp, m.id))
            .cloned()
    }

    pub fn insert_point_metric(&self, metric: NewPointMetric) -> PointMetric {
        self.insert_point_metric_at(metric, Utc::now())
    }

    /// Insert with an explicit timestamp instead of the current time.
    pub fn insert_point_metric_at(
        &self,
        metric: NewPointMetric,
        timestamp: DateTime<Utc>,
    ) -> PointMetric {
        let mut inner = self.inner.write();
        let id = inner.next_id();
        inner
            .point_metrics
            .push(id, metric.into_record(id, timestamp))
            .clone()
    }

    // ============================================
    // Protocol snapshots
    // ============================================

    /// All snapshots in first-insertion order.
    pub fn list_protocol_snapshots(&self) -> Vec<ProtocolSnapshot> {
        self.inner.read().protocols.iter().cloned().collect()
    }

    pub fn find_protocol_snapshot_by_name(&self, name: &str) -> Option<ProtocolSnapshot> {
        let inner = self.inner.read();
        let id = *inner.protocol_ids.get(name)?;
        let slot = *inner.protocols.slots.get(&id)?;
        inner.protocols.rows.get(slot).cloned()
    }

    pub fn upsert_protocol_snapshot(&self, snapshot: NewProtocolSnapshot) -> ProtocolSnapshot {
        self.upsert_protocol_snapshot_at(snapshot, Utc::now())
    }

    /// Insert a new snapshot, or overwrite the one with the same name.
    /// Either way `last_updated` is set from `now`.
    pub fn upsert_protocol_snapshot_at(
        &self,
        snapshot: NewProtocolSnapshot,
        now: DateTime<Utc>,
    ) -> ProtocolSnapshot {
        let mut inner = self.inner.write();

        if let Some(id) = inner.protocol_ids.get(&snapshot.name).copied() {
            if let Some(existing) = inner.protocols.get_mut(id) {
                existing.apply(snapshot, now);
                return existing.clone();
            }
        }

        let id = inner.next_id();
        inner.protocol_ids.insert(snapshot.name.clone(), id);
        inner
            .protocols
            .push(id, snapshot.into_record(id, now))
            .clone()
    }

    // ============================================
    // Wallet flows
    // ============================================

    /// Flows dated within the last `days` days, oldest first.
    pub fn list_wallet_flows(&self, days: u32) -> Vec<WalletFlowRecord> {
        self.list_wallet_flows_since(window_start(days, Utc::now()))
    }

    pub fn list_wallet_flows_since(&self, cutoff: DateTime<Utc>) -> Vec<WalletFlowRecord> {
        let inner = self.inner.read();
        let mut flows: Vec<WalletFlowRecord> = inner
            .wallet_flows
            .iter()
            .filter(|f| f.date >= cutoff)
            .cloned()
            .collect();
        flows.sort_by_key(|f| (f.date, f.id));
        flows
    }

    pub fn insert_wallet_flow(&self, flow: NewWalletFlow) -> WalletFlowRecord {
        let mut inner = self.inner.write();
        let id = inner.next_id();
        inner.wallet_flows.push(id, flow.into_record(id)).clone()
    }

    // ============================================
    // Transaction volume
    // ============================================

    /// Volume rows dated within the last `days` days, oldest first.
    pub fn list_volume_records(&self, days: u32) -> Vec<VolumeRecord> {
        self.list_volume_records_since(window_start(days, Utc::now()))
    }

    pub fn list_volume_records_since(&self, cutoff: DateTime<Utc>) -> Vec<VolumeRecord> {
        let inner = self.inner.read();
        let mut volumes: Vec<VolumeRecord> = inner
            .volume_records
            .iter()
            .filter(|v| v.date >= cutoff)
            .cloned()
            .collect();
        volumes.sort_by_key(|v| (v.date, v.id));
        volumes
    }

    pub fn insert_volume_record(&self, volume: NewVolumeRecord) -> VolumeRecord {
        let mut inner = self.inner.write();
        let id = inner.next_id();
        inner.volume_records.push(id, volume.into_record(id)).clone()
    }

    // ============================================
    // Introspection
    // ============================================

    pub fn counts(&self) -> StoreCounts {
        let inner = self.inner.read();
        StoreCounts {
            point_metrics: inner.point_metrics.len(),
            protocols: inner.protocols.len(),
            wallet_flows: inner.wallet_flows.len(),
            volume_records: inner.volume_records.len(),
        }
    }
}

/// Start of a `days`-long window ending at `now`.
///
/// Windows reaching past the representable range start at the earliest instant.
pub fn window_start(days: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(days.into()))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{decimal_from_units, parse_decimal};

    fn metric(daily_tx_count: u64) -> NewPointMetric {
        NewPointMetric {
            daily_tx_count,
            active_wallets: 1_000_000,
            total_volume: decimal_from_units(75_000_000_000, 2),
            sol_price: decimal_from_units(125_000_000, 6),
            price_change_24h: decimal_from_units(150, 2),
        }
    }

    fn protocol(name: &str, tvl: &str) -> NewProtocolSnapshot {
        NewProtocolSnapshot {
            name: name.to_string(),
            tvl: parse_decimal(tvl).unwrap(),
            volume_24h: parse_decimal("1000").unwrap(),
            change_24h: parse_decimal("1.5").unwrap(),
            users_24h: 10,
        }
    }

    fn flow(date: DateTime<Utc>) -> NewWalletFlow {
        NewWalletFlow {
            date,
            inflow: decimal_from_units(40_000_000_000, 2),
            outflow: decimal_from_units(30_000_000_000, 2),
        }
    }

    fn volume(date: DateTime<Utc>) -> NewVolumeRecord {
        NewVolumeRecord {
            date,
            volume: decimal_from_units(60_000_000_000, 2),
            tx_count: 2_500_000,
        }
    }

    #[test]
    fn test_latest_point_metric_empty() {
        let store = MetricsStore::new();
        assert!(store.latest_point_metric().is_none());
    }

    #[test]
    fn test_latest_point_metric_any_insertion_order() {
        let store = MetricsStore::new();
        let now = Utc::now();

        store.insert_point_metric_at(metric(1), now - Duration::minutes(10));
        store.insert_point_metric_at(metric(2), now);
        store.insert_point_metric_at(metric(3), now - Duration::hours(2));

        let latest = store.latest_point_metric().unwrap();
        assert_eq!(latest.daily_tx_count, 2);
        assert_eq!(latest.timestamp, now);
    }

    #[test]
    fn test_latest_point_metric_tie_prefers_highest_id() {
        let store = MetricsStore::new();
        let now = Utc::now();

        let first = store.insert_point_metric_at(metric(1), now);
        let second = store.insert_point_metric_at(metric(2), now);
        assert!(second.id > first.id);

        assert_eq!(store.latest_point_metric().unwrap().id, second.id);
    }

    #[test]
    fn test_ids_unique_across_kinds() {
        let store = MetricsStore::new();
        let now = Utc::now();

        let a = store.insert_point_metric(metric(1)).id;
        let b = store.upsert_protocol_snapshot(protocol("Orca", "1")).id;
        let c = store.insert_wallet_flow(flow(now)).id;
        let d = store.insert_volume_record(volume(now)).id;

        assert_eq!(vec![a, b, c, d], vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_upsert_protocol_overwrites_by_name() {
        let store = MetricsStore::new();

        let first = store.upsert_protocol_snapshot(protocol("Raydium", "100"));
        let second = store.upsert_protocol_snapshot(protocol("Raydium", "200"));

        assert_eq!(first.id, second.id);
        assert!(second.last_updated >= first.last_updated);

        let found = store.find_protocol_snapshot_by_name("Raydium").unwrap();
        assert_eq!(found.tvl, parse_decimal("200").unwrap());
        assert_eq!(found.tvl.to_string(), "200");

        let named: Vec<_> = store
            .list_protocol_snapshots()
            .into_iter()
            .filter(|p| p.name == "Raydium")
            .collect();
        assert_eq!(named.len(), 1);
    }

    #[test]
    fn test_upsert_last_updated_never_moves_backwards() {
        let store = MetricsStore::new();
        let now = Utc::now();

        store.upsert_protocol_snapshot_at(protocol("Orca", "1"), now);
        let updated =
            store.upsert_protocol_snapshot_at(protocol("Orca", "2"), now - Duration::hours(1));

        assert_eq!(updated.last_updated, now);
        assert_eq!(updated.tvl, parse_decimal("2").unwrap());
    }

    #[test]
    fn test_protocols_listed_in_insertion_order() {
        let store = MetricsStore::new();
        for name in ["Raydium", "Serum", "Marinade", "Orca"] {
            store.upsert_protocol_snapshot(protocol(name, "1"));
        }
        store.upsert_protocol_snapshot(protocol("Serum", "5"));

        let names: Vec<String> = store
            .list_protocol_snapshots()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Raydium", "Serum", "Marinade", "Orca"]);
        assert!(store.find_protocol_snapshot_by_name("Jupiter").is_none());
    }

    #[test]
    fn test_wallet_flow_window() {
        let store = MetricsStore::new();
        store.insert_wallet_flow(flow(Utc::now() - Duration::days(10)));

        assert!(store.list_wallet_flows(7).is_empty());
        assert_eq!(store.list_wallet_flows(14).len(), 1);
    }

    #[test]
    fn test_wallet_flows_ascending_by_date() {
        let store = MetricsStore::new();
        let now = Utc::now();

        for days_ago in [1, 5, 0, 3, 20] {
            store.insert_wallet_flow(flow(now - Duration::days(days_ago)));
        }

        let cutoff = window_start(7, now);
        let flows = store.list_wallet_flows_since(cutoff);
        assert_eq!(flows.len(), 4);
        assert!(flows.iter().all(|f| f.date >= cutoff));
        assert!(flows.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_volume_records_window_and_order() {
        let store = MetricsStore::new();
        let now = Utc::now();

        for days_ago in [29, 2, 40, 15] {
            store.insert_volume_record(volume(now - Duration::days(days_ago)));
        }

        let volumes = store.list_volume_records_since(window_start(30, now));
        let ages: Vec<i64> = volumes.iter().map(|v| (now - v.date).num_days()).collect();
        assert_eq!(ages, vec![29, 15, 2]);
    }

    #[test]
    fn test_window_beyond_calendar_range() {
        let store = MetricsStore::new();
        let now = Utc::now();

        store.insert_wallet_flow(flow(now - Duration::days(400)));
        store.insert_volume_record(volume(now));

        assert_eq!(window_start(u32::MAX, now), DateTime::<Utc>::MIN_UTC);
        assert_eq!(store.list_wallet_flows(u32::MAX).len(), 1);
        assert_eq!(store.list_volume_records(u32::MAX).len(), 1);
    }

    #[test]
    fn test_counts() {
        let store = MetricsStore::new();
        store.insert_point_metric(metric(1));
        store.upsert_protocol_snapshot(protocol("Orca", "1"));
        store.upsert_protocol_snapshot(protocol("Orca", "2"));

        assert_eq!(
            store.counts(),
            StoreCounts {
                point_metrics: 1,
                protocols: 1,
                wallet_flows: 0,
                volume_records: 0,
            }
        );
    }
}
