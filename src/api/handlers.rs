//! API request handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use serde::Deserialize;

use super::{error::ApiError, responses::MessageResponse, ApiState};
use crate::db::models::{PointMetric, ProtocolSnapshot, VolumeRecord, WalletFlowRecord};
use crate::utils::resolve_days;

/// Query parameters for daily series.
///
/// `days` stays a raw string so unparseable values fall back to the default
/// instead of being rejected.
#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<String>,
}

impl DaysQuery {
    /// Raw `days` value; an undecodable query string counts as absent.
    fn days(query: Result<Query<Self>, QueryRejection>) -> Option<String> {
        query.ok().and_then(|Query(query)| query.days)
    }
}

/// Latest Solana network metrics
pub async fn get_solana_metrics(
    State(state): State<ApiState>,
) -> Result<Json<PointMetric>, ApiError> {
    let metric = state
        .service
        .point_metric()
        .await
        .map_err(ApiError::Metrics)?;
    Ok(Json(metric))
}

/// DeFi protocol snapshots
pub async fn get_defi_protocols(
    State(state): State<ApiState>,
) -> Result<Json<Vec<ProtocolSnapshot>>, ApiError> {
    let protocols = state
        .service
        .protocols()
        .await
        .map_err(ApiError::Protocols)?;
    Ok(Json(protocols))
}

/// Daily wallet inflow/outflow
pub async fn get_wallet_flows(
    State(state): State<ApiState>,
    query: Result<Query<DaysQuery>, QueryRejection>,
) -> Result<Json<Vec<WalletFlowRecord>>, ApiError> {
    let days = resolve_days(
        DaysQuery::days(query).as_deref(),
        state.windows.wallet_flow_days,
        state.windows.max_days,
    );

    let flows = state
        .service
        .wallet_flows(days)
        .await
        .map_err(ApiError::WalletFlows)?;
    Ok(Json(flows))
}

/// Daily transaction volume
pub async fn get_transaction_volume(
    State(state): State<ApiState>,
    query: Result<Query<DaysQuery>, QueryRejection>,
) -> Result<Json<Vec<VolumeRecord>>, ApiError> {
    let days = resolve_days(
        DaysQuery::days(query).as_deref(),
        state.windows.volume_days,
        state.windows.max_days,
    );

    let volumes = state
        .service
        .transaction_volume(days)
        .await
        .map_err(ApiError::TransactionVolume)?;
    Ok(Json(volumes))
}

/// Regenerate every record kind
pub async fn refresh_all(
    State(state): State<ApiState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .orchestrator
        .refresh_all()
        .await
        .map_err(ApiError::Refresh)?;

    Ok(Json(MessageResponse {
        message: "Data refreshed successfully".to_string(),
    }))
}
