use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::utils::decimal_string;

/// Daily transaction volume and count. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRecord {
    pub id: RecordId,
    pub date: DateTime<Utc>,
    #[serde(with = "decimal_string")]
    pub volume: BigDecimal,
    pub tx_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVolumeRecord {
    pub date: DateTime<Utc>,
    #[serde(with = "decimal_string")]
    pub volume: BigDecimal,
    pub tx_count: u64,
}

impl NewVolumeRecord {
    pub fn into_record(self, id: RecordId) -> VolumeRecord {
        VolumeRecord {
            id,
            date: self.date,
            volume: self.volume,
            tx_count: self.tx_count,
        }
    }
}
