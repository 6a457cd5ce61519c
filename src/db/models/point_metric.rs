use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::utils::decimal_string;

/// Network-wide snapshot of Solana activity and SOL price.
///
/// Population: regenerated on read once the latest row is older than the
/// configured max age (5 minutes by default), and on every full refresh.
///
/// Query Patterns:
///   - "Get the latest metrics" (max timestamp, highest id on ties)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointMetric {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    pub daily_tx_count: u64,
    pub active_wallets: u64,
    #[serde(with = "decimal_string")]
    pub total_volume: BigDecimal,
    #[serde(with = "decimal_string")]
    pub sol_price: BigDecimal,
    #[serde(with = "decimal_string")]
    pub price_change_24h: BigDecimal,
}

/// Insert payload for [`PointMetric`]; id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPointMetric {
    pub daily_tx_count: u64,
    pub active_wallets: u64,
    #[serde(with = "decimal_string")]
    pub total_volume: BigDecimal,
    #[serde(with = "decimal_string")]
    pub sol_price: BigDecimal,
    #[serde(with = "decimal_string")]
    pub price_change_24h: BigDecimal,
}

impl NewPointMetric {
    pub fn into_record(self, id: RecordId, timestamp: DateTime<Utc>) -> PointMetric {
        PointMetric {
            id,
            timestamp,
            daily_tx_count: self.daily_tx_count,
            active_wallets: self.active_wallets,
            total_volume: self.total_volume,
            sol_price: self.sol_price,
            price_change_24h: self.price_change_24h,
        }
    }
}
