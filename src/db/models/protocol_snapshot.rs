use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::utils::decimal_string;

/// Current state of a DeFi protocol, keyed by protocol name.
///
/// Population: upserted by name. A refresh overwrites every field of the
/// existing row and bumps `last_updated`; no history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolSnapshot {
    pub id: RecordId,
    pub name: String,
    #[serde(with = "decimal_string")]
    pub tvl: BigDecimal,
    #[serde(with = "decimal_string")]
    pub volume_24h: BigDecimal,
    #[serde(with = "decimal_string")]
    pub change_24h: BigDecimal,
    pub users_24h: u64,
    pub last_updated: DateTime<Utc>,
}

/// Upsert payload for [`ProtocolSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProtocolSnapshot {
    pub name: String,
    #[serde(with = "decimal_string")]
    pub tvl: BigDecimal,
    #[serde(with = "decimal_string")]
    pub volume_24h: BigDecimal,
    #[serde(with = "decimal_string")]
    pub change_24h: BigDecimal,
    pub users_24h: u64,
}

impl NewProtocolSnapshot {
    pub fn into_record(self, id: RecordId, last_updated: DateTime<Utc>) -> ProtocolSnapshot {
        ProtocolSnapshot {
            id,
            name: self.name,
            tvl: self.tvl,
            volume_24h: self.volume_24h,
            change_24h: self.change_24h,
            users_24h: self.users_24h,
            last_updated,
        }
    }
}

impl ProtocolSnapshot {
    /// Overwrite all fields from `update`, keeping the id.
    ///
    /// `last_updated` never moves backwards, even if the wall clock does.
    pub fn apply(&mut self, update: NewProtocolSnapshot, now: DateTime<Utc>) {
        self.name = update.name;
        self.tvl = update.tvl;
        self.volume_24h = update.volume_24h;
        self.change_24h = update.change_24h;
        self.users_24h = update.users_24h;
        self.last_updated = now.max(self.last_updated);
    }
}
