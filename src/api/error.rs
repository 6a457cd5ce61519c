use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use thiserror::Error;

use super::responses::ErrorResponse;

/// Failures surfaced by the dashboard API.
///
/// Every variant renders as HTTP 500 with a generic `{"error": ...}` body;
/// the underlying cause is only logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to fetch Solana metrics")]
    Metrics(#[source] anyhow::Error),
    #[error("Failed to fetch DeFi protocols data")]
    Protocols(#[source] anyhow::Error),
    #[error("Failed to fetch wallet flows data")]
    WalletFlows(#[source] anyhow::Error),
    #[error("Failed to fetch transaction volume data")]
    TransactionVolume(#[source] anyhow::Error),
    #[error("Failed to refresh data")]
    Refresh(#[source] anyhow::Error),
}

impl ApiError {
    fn cause(&self) -> &anyhow::Error {
        match self {
            ApiError::Metrics(e)
            | ApiError::Protocols(e)
            | ApiError::WalletFlows(e)
            | ApiError::TransactionVolume(e)
            | ApiError::Refresh(e) => e,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("{}: {:#}", self, self.cause());

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
