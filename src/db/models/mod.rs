mod point_metric;
mod protocol_snapshot;
mod volume_record;
mod wallet_flow;

pub use point_metric::{NewPointMetric, PointMetric};
pub use protocol_snapshot::{NewProtocolSnapshot, ProtocolSnapshot};
pub use volume_record::{NewVolumeRecord, VolumeRecord};
pub use wallet_flow::{NewWalletFlow, WalletFlowRecord};

/// Store-assigned identifier, unique across every record kind.
pub type RecordId = u64;
