use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::utils::decimal_string;

/// Daily USD inflow/outflow across tracked wallets. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletFlowRecord {
    pub id: RecordId,
    pub date: DateTime<Utc>,
    #[serde(with = "decimal_string")]
    pub inflow: BigDecimal,
    #[serde(with = "decimal_string")]
    pub outflow: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWalletFlow {
    pub date: DateTime<Utc>,
    #[serde(with = "decimal_string")]
    pub inflow: BigDecimal,
    #[serde(with = "decimal_string")]
    pub outflow: BigDecimal,
}

impl NewWalletFlow {
    pub fn into_record(self, id: RecordId) -> WalletFlowRecord {
        WalletFlowRecord {
            id,
            date: self.date,
            inflow: self.inflow,
            outflow: self.outflow,
        }
    }
}
